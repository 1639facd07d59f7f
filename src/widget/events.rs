//! Async collaborator results re-entering the coordinator as transitions.

use std::collections::HashMap;
use std::mem;
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;

use crate::config::MAX_PENDING_PORT_EVENTS;
use crate::connector::ConnectorError;
use crate::data::{DepositInfo, Quote};

use super::core::ExchangeWidget;

#[derive(Debug)]
pub enum PortEvent {
    AuthExchanged {
        seq: u64,
        result: Result<(), ConnectorError>,
    },
    BalancesFetched {
        result: Result<HashMap<String, Decimal>, ConnectorError>,
    },
    DepositInfosFetched {
        result: Result<HashMap<String, DepositInfo>, ConnectorError>,
    },
    QuoteReady {
        seq: u64,
        result: Result<Quote, ConnectorError>,
    },
    ConvertExecuted {
        seq: u64,
        result: Result<(), ConnectorError>,
    },
    CredentialsRevoked {
        seq: u64,
        result: Result<(), ConnectorError>,
    },
    CountdownTick,
    PollBalances,
}

/// Queue an event for the next drain, trimming the backlog if the loop
/// stalls.
pub(crate) fn push_event(events: &Arc<Mutex<Vec<PortEvent>>>, event: PortEvent) {
    if let Ok(mut queue) = events.lock() {
        queue.push(event);
        if queue.len() > MAX_PENDING_PORT_EVENTS {
            queue.drain(0..MAX_PENDING_PORT_EVENTS / 2);
        }
    }
}

/// Drain pending collaborator results and apply them as transitions.
/// Returns the number of events applied.
pub fn process_port_events(app: &mut ExchangeWidget) -> usize {
    let events = match app.events.try_lock() {
        Ok(mut guard) if !guard.is_empty() => mem::take(&mut *guard),
        _ => return 0,
    };

    let count = events.len();
    for event in events {
        apply_port_event(app, event);
    }
    count
}

pub(crate) fn apply_port_event(app: &mut ExchangeWidget, event: PortEvent) {
    match event {
        PortEvent::AuthExchanged { seq, result } => app.apply_auth_result(seq, result),
        PortEvent::BalancesFetched { result } => app.apply_balances(result),
        PortEvent::DepositInfosFetched { result } => app.apply_deposit_infos(result),
        PortEvent::QuoteReady { seq, result } => app.apply_quote_result(seq, result),
        PortEvent::ConvertExecuted { seq, result } => app.apply_execute_result(seq, result),
        PortEvent::CredentialsRevoked { seq, result } => app.apply_revoke_result(seq, result),
        PortEvent::CountdownTick => app.tick_countdown(),
        PortEvent::PollBalances => app.refresh_balances(),
    }
}
