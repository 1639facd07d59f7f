//! Coordinator state and construction

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use cli_log::*;
use rust_decimal::Decimal;

use crate::connector::ExchangeConnector;
use crate::data::{CompletedConvert, DepositInfo};

use super::events::PortEvent;
use super::timer::TimerGuard;
use super::types::{TransitionError, ViewState};

/// Convert-flow collaborator call currently awaited. Carries the request
/// context so the result can be applied without re-reading form state.
#[derive(Debug, Clone)]
pub(crate) enum ConvertPhase {
    Quote {
        from: String,
        to: String,
        amount: Decimal,
    },
    Execute {
        summary: CompletedConvert,
    },
}

/// Single source of truth for what the exchange widget is showing.
///
/// All display decisions flow from [`ViewState`], which only the transition
/// operations mutate. Collaborator calls are spawned on the runtime and
/// their results re-enter through the shared event queue, so every state
/// change happens on the host event loop.
pub struct ExchangeWidget {
    pub(crate) state: ViewState,
    pub(crate) connector: Arc<dyn ExchangeConnector>,
    pub(crate) events: Arc<Mutex<Vec<PortEvent>>>,

    // Session state
    pub authed: bool,
    pub auth_in_progress: bool,
    pub hide_balance: bool,
    pub expanded: bool,

    // Fetched account data
    pub balances: HashMap<String, Decimal>,
    pub deposit_infos: HashMap<String, DepositInfo>,
    pub last_refresh: Option<DateTime<Utc>>,

    // Form inputs
    pub search_mode: bool,
    pub list_cursor: usize,
    pub buy_amount: String,
    pub buy_asset: String,
    pub convert_amount: String,
    pub convert_from: String,
    pub convert_to: String,

    // Async bookkeeping; requests tagged with a stale epoch are discarded.
    pub(crate) convert_seq: u64,
    pub(crate) session_seq: u64,
    pub(crate) convert_in_flight: Option<ConvertPhase>,
    pub(crate) revoke_in_flight: bool,
    pub(crate) countdown: Option<TimerGuard>,
    pub(crate) balance_poll: Option<TimerGuard>,
    pub(crate) poll_period: Duration,

    pub needs_redraw: bool,
}

impl ExchangeWidget {
    pub fn new(
        connector: Arc<dyn ExchangeConnector>,
        authenticated: bool,
        poll_period: Duration,
    ) -> Self {
        Self {
            state: ViewState::new(authenticated),
            connector,
            events: Arc::new(Mutex::new(Vec::new())),
            authed: authenticated,
            auth_in_progress: false,
            hide_balance: false,
            expanded: true,
            balances: HashMap::new(),
            deposit_infos: HashMap::new(),
            last_refresh: None,
            search_mode: false,
            list_cursor: 0,
            buy_amount: String::new(),
            buy_asset: "BTC".to_string(),
            convert_amount: String::new(),
            convert_from: "BTC".to_string(),
            convert_to: "BNB".to_string(),
            convert_seq: 0,
            session_seq: 0,
            convert_in_flight: None,
            revoke_in_flight: false,
            countdown: None,
            balance_poll: None,
            poll_period,
            needs_redraw: true,
        }
    }

    /// Initial fetches and the balance poll, run once at widget mount.
    pub fn mount(&mut self) {
        if self.authed {
            self.refresh_balances();
            self.fetch_deposit_infos();
            self.start_balance_poll();
        }
    }

    /// Read-only snapshot for the render layer.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn quote_pending(&self) -> bool {
        matches!(self.convert_in_flight, Some(ConvertPhase::Quote { .. }))
    }

    pub fn execute_pending(&self) -> bool {
        matches!(self.convert_in_flight, Some(ConvertPhase::Execute { .. }))
    }

    pub fn revoke_pending(&self) -> bool {
        self.revoke_in_flight
    }

    /// Whether the preview countdown is still running.
    pub fn countdown_active(&self) -> bool {
        self.countdown.is_some()
    }

    /// Whether the recurring balance refresh is running.
    pub fn poll_active(&self) -> bool {
        self.balance_poll.is_some()
    }

    pub fn asset_balance(&self, ticker: &str) -> Decimal {
        self.balances.get(ticker).copied().unwrap_or(Decimal::ZERO)
    }

    /// Release every recurring activity and in-flight request. Called on
    /// widget unmount; dropping the guards covers abnormal exits.
    pub fn teardown(&mut self) {
        self.countdown = None;
        self.balance_poll = None;
        self.convert_in_flight = None;
        self.revoke_in_flight = false;
    }

    /// Surface a rejected transition without applying it.
    pub(crate) fn report_rejection(&self, context: &'static str, err: &TransitionError) {
        debug!("rejected {context}: {err}");
        self.connector.report_error(context, &err.to_string());
    }
}
