//! Stub exchange backend.
//!
//! Stands in for the real backend binding: fixed balances, fake deposit
//! addresses, a fixed quote and simulated latency. Individual calls can be
//! scripted to fail, which the coordinator tests rely on.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use cli_log::*;
use rust_decimal::Decimal;

use crate::config::AUTH_EXCHANGE_DELAY_MS;
use crate::data::{DepositInfo, Quote};

use super::{ConnectorError, ExchangeConnector};

/// Account balances presented while no real backend is wired in.
const BALANCES_JSON: &str = r#"{
    "BTC": "1.512",
    "ETH": "10.52",
    "XRP": "0",
    "BNB": "0",
    "BCH": "0",
    "BUSD": "0",
    "BAT": "0",
    "LINK": "0",
    "LTC": "0"
}"#;

/// Deposit records; assets missing an address and memo report as unavailable.
const DEPOSIT_INFOS_JSON: &str = r#"{
    "BTC": { "address": "n4VQ5YdHf7hLQ2gWQYYrcxoE5B7nWuDFNF" },
    "ETH": { "address": "0x3f5ce5fbfe3e9af3971dd833d26ba9b5c936f0be" },
    "XRP": { "address": "rEb8TK3gBgk5auZkwc6sHnwrGVJH8DuaLh", "memo": "1035214" },
    "BNB": { "address": "bnb136ns6lfw4zs5hg4n85vdthaad7hq5m4gtkgf23", "memo": "101177741" },
    "LTC": { "address": "MBvZ8a4mDBbTLJvfK1nGXkyfXSSDrNXloB" },
    "BAT": { "address": null }
}"#;

const QUOTE_PRICE: &str = "9372.23";
const QUOTE_FEE: &str = "20.99";

pub struct MockConnector {
    latency: Duration,
    auth_delay: Duration,
    balances: HashMap<String, Decimal>,
    deposit_infos: HashMap<String, DepositInfo>,
    quote_counter: AtomicU64,
    // Scripted responses; when set they override the default behavior.
    auth_result: Mutex<Option<Result<(), ConnectorError>>>,
    balances_result: Mutex<Option<ConnectorError>>,
    quote_result: Mutex<Option<Result<Quote, ConnectorError>>>,
    execute_result: Mutex<Option<Result<(), ConnectorError>>>,
    revoke_result: Mutex<Option<Result<(), ConnectorError>>>,
    reported: Mutex<Vec<(String, String)>>,
}

impl MockConnector {
    pub fn new(latency: Duration) -> Self {
        let balances = serde_json::from_str(BALANCES_JSON).expect("balance fixture");
        let deposit_infos =
            serde_json::from_str(DEPOSIT_INFOS_JSON).expect("deposit info fixture");
        Self {
            latency,
            auth_delay: Duration::from_millis(AUTH_EXCHANGE_DELAY_MS),
            balances,
            deposit_infos,
            quote_counter: AtomicU64::new(1),
            auth_result: Mutex::new(None),
            balances_result: Mutex::new(None),
            quote_result: Mutex::new(None),
            execute_result: Mutex::new(None),
            revoke_result: Mutex::new(None),
            reported: Mutex::new(Vec::new()),
        }
    }

    /// Zero-delay connector for tests.
    pub fn instant() -> Self {
        let mut mock = Self::new(Duration::ZERO);
        mock.auth_delay = Duration::ZERO;
        mock
    }

    pub fn set_auth_result(&self, result: Result<(), ConnectorError>) {
        *self.auth_result.lock().unwrap() = Some(result);
    }

    pub fn fail_balances(&self, error: ConnectorError) {
        *self.balances_result.lock().unwrap() = Some(error);
    }

    pub fn set_quote_result(&self, result: Result<Quote, ConnectorError>) {
        *self.quote_result.lock().unwrap() = Some(result);
    }

    pub fn set_execute_result(&self, result: Result<(), ConnectorError>) {
        *self.execute_result.lock().unwrap() = Some(result);
    }

    pub fn set_revoke_result(&self, result: Result<(), ConnectorError>) {
        *self.revoke_result.lock().unwrap() = Some(result);
    }

    /// Errors reported through the diagnostic sink, oldest first.
    pub fn reported(&self) -> Vec<(String, String)> {
        self.reported.lock().unwrap().clone()
    }

    async fn simulate(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    fn asset_balance(&self, ticker: &str) -> Decimal {
        self.balances.get(ticker).copied().unwrap_or(Decimal::ZERO)
    }
}

#[async_trait]
impl ExchangeConnector for MockConnector {
    async fn exchange_token(&self) -> Result<(), ConnectorError> {
        self.simulate(self.auth_delay).await;
        if let Some(result) = self.auth_result.lock().unwrap().clone() {
            return result;
        }
        Ok(())
    }

    async fn fetch_account_balances(&self) -> Result<HashMap<String, Decimal>, ConnectorError> {
        self.simulate(self.latency).await;
        if let Some(error) = self.balances_result.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.balances.clone())
    }

    async fn fetch_deposit_infos(&self) -> Result<HashMap<String, DepositInfo>, ConnectorError> {
        self.simulate(self.latency).await;
        Ok(self.deposit_infos.clone())
    }

    async fn fetch_quote(
        &self,
        from: &str,
        _to: &str,
        amount: Decimal,
    ) -> Result<Quote, ConnectorError> {
        self.simulate(self.latency).await;
        if let Some(result) = self.quote_result.lock().unwrap().clone() {
            return result;
        }
        // Fees apply on top, so an amount equal to the balance is already short.
        if amount >= self.asset_balance(from) {
            return Err(ConnectorError::InsufficientFunds);
        }
        let price: Decimal = QUOTE_PRICE.parse().expect("quote price fixture");
        let fee: Decimal = QUOTE_FEE.parse().expect("quote fee fixture");
        let id = self.quote_counter.fetch_add(1, Ordering::Relaxed);
        Ok(Quote {
            id: format!("Q{id:06}"),
            price,
            fee,
            received_amount: (amount * price).round_dp(2),
            created_at: Utc::now(),
        })
    }

    async fn execute_convert(&self, quote_id: &str) -> Result<(), ConnectorError> {
        self.simulate(self.latency).await;
        if let Some(result) = self.execute_result.lock().unwrap().clone() {
            return result;
        }
        info!("mock convert executed for quote {quote_id}");
        Ok(())
    }

    async fn revoke_credentials(&self) -> Result<(), ConnectorError> {
        self.simulate(self.latency).await;
        if let Some(result) = self.revoke_result.lock().unwrap().clone() {
            return result;
        }
        Ok(())
    }

    fn report_error(&self, context: &str, message: &str) {
        warn!("[{context}] {message}");
        self.reported
            .lock()
            .unwrap()
            .push((context.to_string(), message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_quote_uses_fixture_pricing() {
        let mock = MockConnector::instant();
        let quote = mock
            .fetch_quote("BTC", "BNB", "1".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(quote.price, QUOTE_PRICE.parse::<Decimal>().unwrap());
        assert_eq!(quote.fee, QUOTE_FEE.parse::<Decimal>().unwrap());
        assert!(quote.id.starts_with('Q'));
    }

    #[tokio::test]
    async fn quote_over_balance_is_insufficient() {
        let mock = MockConnector::instant();
        let result = mock.fetch_quote("BTC", "BNB", "999999".parse().unwrap()).await;
        assert_eq!(result, Err(ConnectorError::InsufficientFunds));
    }

    #[tokio::test]
    async fn deposit_fixture_covers_memo_and_unavailable() {
        let mock = MockConnector::instant();
        let infos = mock.fetch_deposit_infos().await.unwrap();
        assert!(infos["XRP"].memo.is_some());
        assert!(!infos["BAT"].is_available());
    }
}
