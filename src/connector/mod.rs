//! Collaborator ports consumed by the exchange widget.
//!
//! The widget never talks to an exchange backend directly; every side effect
//! goes through [`ExchangeConnector`]. The binary wires in the stub
//! implementation from [`mock`]; a real backend binding would implement the
//! same trait.

pub mod mock;

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::data::{DepositInfo, Quote};

/// Failure taxonomy reported by connector calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// The account cannot cover the requested amount.
    InsufficientFunds,
    /// The stored credential was rejected by the exchange.
    InvalidCredentials,
    /// The exchange could not be reached.
    Unavailable(String),
    /// The exchange understood the request and refused it.
    Rejected(String),
}

impl std::fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InsufficientFunds => write!(f, "insufficient funds"),
            Self::InvalidCredentials => write!(f, "credentials no longer valid"),
            Self::Unavailable(e) => write!(f, "exchange unavailable: {e}"),
            Self::Rejected(e) => write!(f, "request rejected: {e}"),
        }
    }
}

impl std::error::Error for ConnectorError {}

#[async_trait]
pub trait ExchangeConnector: Send + Sync {
    /// Exchange the pending auth code for a usable credential.
    async fn exchange_token(&self) -> Result<(), ConnectorError>;

    /// Per-asset balances, keyed by ticker.
    async fn fetch_account_balances(&self) -> Result<HashMap<String, Decimal>, ConnectorError>;

    /// Per-asset deposit address/memo records.
    async fn fetch_deposit_infos(&self) -> Result<HashMap<String, DepositInfo>, ConnectorError>;

    /// Request a time-bounded convert quote.
    async fn fetch_quote(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<Quote, ConnectorError>;

    /// Execute a previously quoted convert.
    async fn execute_convert(&self, quote_id: &str) -> Result<(), ConnectorError>;

    /// Revoke the stored credential.
    async fn revoke_credentials(&self) -> Result<(), ConnectorError>;

    /// Fire-and-forget diagnostic sink.
    fn report_error(&self, context: &str, message: &str);
}
