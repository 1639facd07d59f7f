//! Session lifecycle: connect, disconnect confirmation, credential validity

use std::sync::Arc;

use cli_log::*;

use crate::assets;

use super::core::ExchangeWidget;
use super::events::{PortEvent, push_event};
use super::types::{Overlay, TransitionError, ViewState};

impl ExchangeWidget {
    // Buy view form

    pub fn push_buy_amount_char(&mut self, ch: char) {
        // Digits only, as the original fiat input accepts.
        if ch.is_ascii_digit() {
            self.buy_amount.push(ch);
            self.needs_redraw = true;
        }
    }

    pub fn pop_buy_amount_char(&mut self) {
        self.buy_amount.pop();
        self.needs_redraw = true;
    }

    pub fn select_buy_asset(&mut self, ticker: &str) -> Result<(), TransitionError> {
        if !assets::is_supported(ticker) {
            return Err(TransitionError::UnknownAsset(ticker.to_string()));
        }
        self.buy_asset = ticker.to_string();
        self.needs_redraw = true;
        Ok(())
    }

    // Connect flow

    /// Begin authentication with the exchange. The widget stays on the buy
    /// view until the token exchange resolves.
    pub fn connect(&mut self) -> Result<(), TransitionError> {
        if self.authed {
            return Err(TransitionError::WrongState("while disconnected"));
        }
        if self.auth_in_progress {
            return Err(TransitionError::RequestInFlight);
        }
        self.auth_in_progress = true;
        self.session_seq += 1;

        let seq = self.session_seq;
        let connector = Arc::clone(&self.connector);
        let events = Arc::clone(&self.events);
        tokio::spawn(async move {
            let result = connector.exchange_token().await;
            push_event(&events, PortEvent::AuthExchanged { seq, result });
        });
        self.needs_redraw = true;
        Ok(())
    }

    pub(crate) fn apply_auth_result(
        &mut self,
        seq: u64,
        result: Result<(), crate::connector::ConnectorError>,
    ) {
        if seq != self.session_seq {
            debug!("discarding stale auth result (seq {seq})");
            return;
        }
        self.auth_in_progress = false;
        match result {
            Ok(()) => {
                info!("exchange account connected");
                self.authed = true;
                self.state = ViewState::new(true);
                self.buy_amount.clear();
                self.mount();
            }
            Err(e) => {
                self.connector.report_error("connect", &e.to_string());
            }
        }
        self.needs_redraw = true;
    }

    // Disconnect flow

    pub fn begin_disconnect(&mut self) -> Result<(), TransitionError> {
        if !self.authed {
            return Err(TransitionError::NotAuthenticated);
        }
        if self.state.overlay.is_some() {
            return Err(TransitionError::OverlayActive);
        }
        // A quote still in flight would otherwise pop its preview over the
        // confirmation dialog.
        if self.convert_in_flight.is_some() {
            return Err(TransitionError::RequestInFlight);
        }
        self.state.overlay = Some(Overlay::Disconnecting);
        self.needs_redraw = true;
        Ok(())
    }

    /// Leave the confirmation overlay. Also abandons an in-flight revoke;
    /// its late result is discarded.
    pub fn cancel_disconnect(&mut self) -> Result<(), TransitionError> {
        if !matches!(self.state.overlay, Some(Overlay::Disconnecting)) {
            return Err(TransitionError::WrongState("while disconnecting"));
        }
        if self.revoke_in_flight {
            self.session_seq += 1;
            self.revoke_in_flight = false;
        }
        self.state.overlay = None;
        self.needs_redraw = true;
        Ok(())
    }

    /// Revoke the stored credential. The overlay stays up until the
    /// collaborator resolves; on failure it remains, with the error
    /// reported through the sink.
    pub fn confirm_disconnect(&mut self) -> Result<(), TransitionError> {
        if !matches!(self.state.overlay, Some(Overlay::Disconnecting)) {
            return Err(TransitionError::WrongState("while disconnecting"));
        }
        if self.revoke_in_flight {
            return Err(TransitionError::RequestInFlight);
        }
        self.revoke_in_flight = true;
        self.session_seq += 1;

        let seq = self.session_seq;
        let connector = Arc::clone(&self.connector);
        let events = Arc::clone(&self.events);
        tokio::spawn(async move {
            let result = connector.revoke_credentials().await;
            push_event(&events, PortEvent::CredentialsRevoked { seq, result });
        });
        self.needs_redraw = true;
        Ok(())
    }

    pub(crate) fn apply_revoke_result(
        &mut self,
        seq: u64,
        result: Result<(), crate::connector::ConnectorError>,
    ) {
        if seq != self.session_seq {
            debug!("discarding stale revoke result (seq {seq})");
            return;
        }
        self.revoke_in_flight = false;
        match result {
            Ok(()) => {
                info!("exchange account disconnected");
                self.reset_to_unauthenticated();
            }
            Err(e) => {
                self.connector.report_error("disconnect", &e.to_string());
            }
        }
        self.needs_redraw = true;
    }

    /// Back to the pristine unauthenticated widget.
    fn reset_to_unauthenticated(&mut self) {
        self.authed = false;
        self.state = ViewState::new(false);
        self.balances.clear();
        self.deposit_infos.clear();
        self.last_refresh = None;
        self.hide_balance = false;
        self.search_mode = false;
        self.list_cursor = 0;
        self.buy_amount.clear();
        self.convert_amount.clear();
        self.convert_from = "BTC".to_string();
        self.convert_to = "BNB".to_string();
        self.teardown();
    }

    // Credential validity

    /// Driven by the credential-validation collaborator reporting the
    /// stored credential as invalid.
    pub fn show_auth_invalid(&mut self) -> Result<(), TransitionError> {
        if !self.authed {
            return Err(TransitionError::NotAuthenticated);
        }
        if matches!(self.state.overlay, Some(Overlay::AuthInvalid)) {
            return Ok(());
        }
        // An invalid credential preempts whatever flow was running.
        self.countdown = None;
        self.convert_seq += 1;
        self.convert_in_flight = None;
        self.state.overlay = Some(Overlay::AuthInvalid);
        self.needs_redraw = true;
        Ok(())
    }

    pub fn dismiss_auth_invalid(&mut self) -> Result<(), TransitionError> {
        if !matches!(self.state.overlay, Some(Overlay::AuthInvalid)) {
            return Err(TransitionError::WrongState("while the credential notice is up"));
        }
        self.state.overlay = None;
        self.needs_redraw = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{connected_widget, settle, unauthenticated_widget};
    use super::*;
    use crate::connector::ConnectorError;
    use crate::widget::types::TopView;

    #[test]
    fn cancel_disconnect_has_no_side_effect() {
        let (mut widget, _mock) = connected_widget();
        widget.select_top_view(TopView::Trade).unwrap();
        widget.begin_disconnect().unwrap();
        assert_eq!(widget.state().overlay(), Some(&Overlay::Disconnecting));

        widget.cancel_disconnect().unwrap();
        assert_eq!(widget.state().overlay(), None);
        assert_eq!(widget.state().top_view(), TopView::Trade);
        assert!(widget.authed);
    }

    #[tokio::test]
    async fn confirmed_disconnect_resets_everything() {
        let (mut widget, _mock) = connected_widget();
        widget.mount();
        settle(&mut widget).await;
        assert!(!widget.balances.is_empty());
        assert!(widget.poll_active());

        widget.begin_disconnect().unwrap();
        widget.confirm_disconnect().unwrap();
        // Overlay stays up while the revoke is in flight.
        assert_eq!(widget.state().overlay(), Some(&Overlay::Disconnecting));
        settle(&mut widget).await;

        assert!(!widget.authed);
        assert_eq!(widget.state().top_view(), TopView::Buy);
        assert_eq!(widget.state().overlay(), None);
        assert!(widget.balances.is_empty());
        assert!(!widget.poll_active());
    }

    #[tokio::test]
    async fn failed_revoke_keeps_overlay_and_reports() {
        let (mut widget, mock) = connected_widget();
        mock.set_revoke_result(Err(ConnectorError::Unavailable("timeout".into())));
        widget.begin_disconnect().unwrap();
        widget.confirm_disconnect().unwrap();
        settle(&mut widget).await;

        assert!(widget.authed);
        assert_eq!(widget.state().overlay(), Some(&Overlay::Disconnecting));
        let reported = mock.reported();
        assert_eq!(reported.len(), 1);
        assert_eq!(reported[0].0, "disconnect");
    }

    #[tokio::test]
    async fn revoke_result_after_cancel_is_discarded() {
        let (mut widget, _mock) = connected_widget();
        widget.begin_disconnect().unwrap();
        widget.confirm_disconnect().unwrap();
        widget.cancel_disconnect().unwrap();
        settle(&mut widget).await;

        assert!(widget.authed);
        assert_eq!(widget.state().overlay(), None);
    }

    #[tokio::test]
    async fn connect_flow_lands_on_summary() {
        let (mut widget, _mock) = unauthenticated_widget();
        widget.connect().unwrap();
        assert!(widget.auth_in_progress);
        assert_eq!(widget.connect(), Err(TransitionError::RequestInFlight));
        settle(&mut widget).await;

        assert!(widget.authed);
        assert!(!widget.auth_in_progress);
        assert_eq!(widget.state().top_view(), TopView::Summary);
        assert!(!widget.balances.is_empty());
        assert!(widget.poll_active());
    }

    #[tokio::test]
    async fn failed_connect_stays_on_buy() {
        let (mut widget, mock) = unauthenticated_widget();
        mock.set_auth_result(Err(ConnectorError::Unavailable("oauth down".into())));
        widget.connect().unwrap();
        settle(&mut widget).await;

        assert!(!widget.authed);
        assert_eq!(widget.state().top_view(), TopView::Buy);
        assert_eq!(mock.reported()[0].0, "connect");
    }

    #[test]
    fn auth_invalid_notice_round_trip() {
        let (mut widget, _mock) = connected_widget();
        widget.show_auth_invalid().unwrap();
        assert_eq!(widget.state().overlay(), Some(&Overlay::AuthInvalid));
        widget.dismiss_auth_invalid().unwrap();
        assert_eq!(widget.state().overlay(), None);
    }

    #[test]
    fn buy_amount_rejects_non_digits() {
        let (mut widget, _mock) = unauthenticated_widget();
        for ch in ['5', '0', 'x', '.', '1'] {
            widget.push_buy_amount_char(ch);
        }
        assert_eq!(widget.buy_amount, "501");
        widget.pop_buy_amount_char();
        assert_eq!(widget.buy_amount, "50");
    }
}
