use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A time-bounded price/fee offer returned by the quote endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub id: String,
    pub price: Decimal,
    pub fee: Decimal,
    pub received_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Where to send funds for one asset. Either field may be missing;
/// some assets expose only a memo, some neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositInfo {
    pub address: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
}

impl DepositInfo {
    /// An asset with neither address nor memo cannot receive deposits yet.
    pub fn is_available(&self) -> bool {
        self.address.is_some() || self.memo.is_some()
    }
}

/// Summary of an executed convert, shown on the success screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedConvert {
    pub amount: Decimal,
    pub from_asset: String,
    pub to_asset: String,
    pub received_amount: Decimal,
}

/// Fixed-width crypto amount used across the balance views.
pub fn format_crypto_balance(value: Decimal) -> String {
    format!("{:.3}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn deposit_availability() {
        let none = DepositInfo { address: None, memo: None };
        let addr = DepositInfo { address: Some("n4VQ".into()), memo: None };
        let memo = DepositInfo { address: None, memo: Some("1035".into()) };
        assert!(!none.is_available());
        assert!(addr.is_available());
        assert!(memo.is_available());
    }

    #[test]
    fn balance_formatting_pads_and_truncates() {
        assert_eq!(format_crypto_balance(Decimal::from_str("1.5").unwrap()), "1.500");
        assert_eq!(format_crypto_balance(Decimal::from_str("0.12345").unwrap()), "0.123");
        assert_eq!(format_crypto_balance(Decimal::ZERO), "0.000");
    }
}
