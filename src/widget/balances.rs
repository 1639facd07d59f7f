//! Account balances: refresh, recurring poll, privacy toggle

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use cli_log::*;
use rust_decimal::Decimal;

use crate::data::DepositInfo;

use super::core::ExchangeWidget;
use super::events::{PortEvent, push_event};
use super::timer::spawn_balance_poll;

impl ExchangeWidget {
    /// Fetch fresh balances. Fired by the header refresh action and by the
    /// poll timer; a no-op while disconnected.
    pub fn refresh_balances(&mut self) {
        if !self.authed {
            return;
        }
        let connector = Arc::clone(&self.connector);
        let events = Arc::clone(&self.events);
        tokio::spawn(async move {
            let result = connector.fetch_account_balances().await;
            push_event(&events, PortEvent::BalancesFetched { result });
        });
    }

    pub(crate) fn fetch_deposit_infos(&mut self) {
        if !self.authed {
            return;
        }
        let connector = Arc::clone(&self.connector);
        let events = Arc::clone(&self.events);
        tokio::spawn(async move {
            let result = connector.fetch_deposit_infos().await;
            push_event(&events, PortEvent::DepositInfosFetched { result });
        });
    }

    pub(crate) fn apply_balances(
        &mut self,
        result: Result<HashMap<String, Decimal>, crate::connector::ConnectorError>,
    ) {
        if !self.authed {
            debug!("discarding balances for a disconnected session");
            return;
        }
        match result {
            Ok(balances) => {
                self.balances = balances;
                self.last_refresh = Some(Utc::now());
                self.needs_redraw = true;
            }
            Err(crate::connector::ConnectorError::InvalidCredentials) => {
                // The stored credential no longer works; tell the user.
                let _ = self.show_auth_invalid();
            }
            Err(e) => {
                self.connector.report_error("balances", &e.to_string());
            }
        }
    }

    pub(crate) fn apply_deposit_infos(
        &mut self,
        result: Result<HashMap<String, DepositInfo>, crate::connector::ConnectorError>,
    ) {
        if !self.authed {
            return;
        }
        match result {
            Ok(infos) => {
                self.deposit_infos = infos;
                self.needs_redraw = true;
            }
            Err(e) => {
                self.connector.report_error("deposit-infos", &e.to_string());
            }
        }
    }

    /// Ensure exactly one recurring refresh is running.
    pub(crate) fn start_balance_poll(&mut self) {
        if self.balance_poll.is_none() {
            self.balance_poll = Some(spawn_balance_poll(
                Arc::clone(&self.events),
                self.poll_period,
            ));
        }
    }

    pub fn toggle_hide_balance(&mut self) {
        self.hide_balance = !self.hide_balance;
        self.needs_redraw = true;
    }

    /// Collapse the widget card to its title tab and back.
    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
        self.needs_redraw = true;
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{connected_widget, settle};
    use crate::connector::ConnectorError;
    use crate::widget::types::Overlay;

    #[tokio::test]
    async fn refresh_updates_balances_and_timestamp() {
        let (mut widget, _mock) = connected_widget();
        assert!(widget.last_refresh.is_none());
        widget.refresh_balances();
        settle(&mut widget).await;

        assert!(widget.last_refresh.is_some());
        assert_eq!(widget.asset_balance("BTC"), "1.512".parse().unwrap());
        assert_eq!(widget.asset_balance("DOGE"), "0".parse().unwrap());
    }

    #[tokio::test]
    async fn invalid_credentials_raise_the_auth_notice() {
        let (mut widget, mock) = connected_widget();
        mock.fail_balances(ConnectorError::InvalidCredentials);
        widget.refresh_balances();
        settle(&mut widget).await;

        assert_eq!(widget.state().overlay(), Some(&Overlay::AuthInvalid));
    }

    #[tokio::test]
    async fn fetch_failure_is_reported_not_shown() {
        let (mut widget, mock) = connected_widget();
        mock.fail_balances(ConnectorError::Unavailable("http 503".into()));
        widget.refresh_balances();
        settle(&mut widget).await;

        assert_eq!(widget.state().overlay(), None);
        assert_eq!(mock.reported()[0].0, "balances");
    }

    #[tokio::test]
    async fn poll_started_once() {
        let (mut widget, _mock) = connected_widget();
        widget.mount();
        assert!(widget.poll_active());
        widget.start_balance_poll();
        assert!(widget.poll_active());
        settle(&mut widget).await;
    }

    #[test]
    fn hide_balance_toggles() {
        let (mut widget, _mock) = connected_widget();
        assert!(!widget.hide_balance);
        widget.toggle_hide_balance();
        assert!(widget.hide_balance);
        widget.toggle_hide_balance();
        assert!(!widget.hide_balance);
    }
}
