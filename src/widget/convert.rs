//! The convert flow: quote request, preview countdown, execution

use std::sync::Arc;

use cli_log::*;
use rust_decimal::Decimal;

use crate::assets;
use crate::config::QUOTE_EXPIRY_SECS;
use crate::data::CompletedConvert;

use super::core::{ConvertPhase, ExchangeWidget};
use super::events::{PortEvent, push_event};
use super::timer::spawn_countdown;
use super::types::{Overlay, TransitionError};

impl ExchangeWidget {
    // Convert form

    pub fn push_convert_amount_char(&mut self, ch: char) {
        let valid = ch.is_ascii_digit() || (ch == '.' && !self.convert_amount.contains('.'));
        if valid {
            self.convert_amount.push(ch);
            self.needs_redraw = true;
        }
    }

    pub fn pop_convert_amount_char(&mut self) {
        self.convert_amount.pop();
        self.needs_redraw = true;
    }

    pub fn select_convert_from(&mut self, ticker: &str) -> Result<(), TransitionError> {
        if !assets::is_convertible(ticker) {
            return Err(TransitionError::UnknownAsset(ticker.to_string()));
        }
        if ticker == self.convert_to {
            return Err(TransitionError::SameAsset);
        }
        self.convert_from = ticker.to_string();
        self.needs_redraw = true;
        Ok(())
    }

    pub fn select_convert_to(&mut self, ticker: &str) -> Result<(), TransitionError> {
        if !assets::is_convertible(ticker) {
            return Err(TransitionError::UnknownAsset(ticker.to_string()));
        }
        if ticker == self.convert_from {
            return Err(TransitionError::SameAsset);
        }
        self.convert_to = ticker.to_string();
        self.needs_redraw = true;
        Ok(())
    }

    fn reset_convert_form(&mut self) {
        self.convert_amount.clear();
        self.convert_from = "BTC".to_string();
        self.convert_to = "BNB".to_string();
    }

    // Flow transitions

    /// Ask the exchange for a quote. The preview opens when the result
    /// arrives; until then the flow accepts only [`Self::cancel_convert`].
    pub fn request_convert_quote(
        &mut self,
        from: &str,
        to: &str,
        amount: &str,
    ) -> Result<(), TransitionError> {
        if !self.authed {
            return Err(TransitionError::NotAuthenticated);
        }
        if self.state.overlay.is_some() {
            return Err(TransitionError::OverlayActive);
        }
        if self.convert_in_flight.is_some() {
            return Err(TransitionError::RequestInFlight);
        }
        if !assets::is_supported(from) {
            return Err(TransitionError::UnknownAsset(from.to_string()));
        }
        if !assets::is_supported(to) {
            return Err(TransitionError::UnknownAsset(to.to_string()));
        }
        if from == to {
            return Err(TransitionError::SameAsset);
        }
        let parsed: Decimal = amount
            .parse()
            .map_err(|_| TransitionError::InvalidAmount(amount.to_string()))?;
        if parsed <= Decimal::ZERO {
            return Err(TransitionError::InvalidAmount(amount.to_string()));
        }

        self.convert_seq += 1;
        self.convert_in_flight = Some(ConvertPhase::Quote {
            from: from.to_string(),
            to: to.to_string(),
            amount: parsed,
        });

        let seq = self.convert_seq;
        let connector = Arc::clone(&self.connector);
        let events = Arc::clone(&self.events);
        let (from, to) = (from.to_string(), to.to_string());
        tokio::spawn(async move {
            let result = connector.fetch_quote(&from, &to, parsed).await;
            push_event(&events, PortEvent::QuoteReady { seq, result });
        });
        self.needs_redraw = true;
        Ok(())
    }

    pub(crate) fn apply_quote_result(
        &mut self,
        seq: u64,
        result: Result<crate::data::Quote, crate::connector::ConnectorError>,
    ) {
        if seq != self.convert_seq {
            debug!("discarding stale quote result (seq {seq})");
            return;
        }
        let Some(ConvertPhase::Quote { from, to, amount }) = self.convert_in_flight.take() else {
            debug!("quote result without a pending request");
            return;
        };
        match result {
            Ok(quote) => {
                self.state.overlay = Some(Overlay::ConvertPreview(super::types::PendingConvert {
                    amount,
                    from_asset: from,
                    to_asset: to,
                    quote_id: quote.id,
                    price: quote.price,
                    fee: quote.fee,
                    received_amount: quote.received_amount,
                    quoted_at: quote.created_at,
                    expiry_secs: QUOTE_EXPIRY_SECS,
                }));
                // Replacing the slot aborts any previous countdown first.
                self.countdown = Some(spawn_countdown(Arc::clone(&self.events)));
            }
            Err(crate::connector::ConnectorError::InsufficientFunds) => {
                self.state.overlay = Some(Overlay::InsufficientFunds);
            }
            Err(e) => {
                self.state.overlay = Some(Overlay::ConvertFailed {
                    message: Some(e.to_string()),
                });
            }
        }
        self.needs_redraw = true;
    }

    /// One elapsed second of the preview countdown. A no-op outside the
    /// preview or once execution has been requested.
    pub fn tick_countdown(&mut self) {
        if self.countdown.is_none() {
            return;
        }
        let Some(Overlay::ConvertPreview(pending)) = &mut self.state.overlay else {
            return;
        };
        pending.expiry_secs = pending.expiry_secs.saturating_sub(1);
        if pending.expiry_secs == 0 {
            // The quote aged out; treat it like a user cancellation.
            info!("convert quote expired");
            self.countdown = None;
            self.state.overlay = None;
        }
        self.needs_redraw = true;
    }

    /// Execute the quoted convert. The cancellation window closes here: the
    /// countdown stops before the collaborator call is issued.
    pub fn confirm_convert(&mut self) -> Result<(), TransitionError> {
        if self.convert_in_flight.is_some() {
            return Err(TransitionError::RequestInFlight);
        }
        let Some(Overlay::ConvertPreview(pending)) = &self.state.overlay else {
            return Err(TransitionError::WrongState("while a convert preview is up"));
        };

        self.countdown = None;
        self.convert_seq += 1;
        let quote_id = pending.quote_id.clone();
        self.convert_in_flight = Some(ConvertPhase::Execute {
            summary: CompletedConvert {
                amount: pending.amount,
                from_asset: pending.from_asset.clone(),
                to_asset: pending.to_asset.clone(),
                received_amount: pending.received_amount,
            },
        });

        let seq = self.convert_seq;
        let connector = Arc::clone(&self.connector);
        let events = Arc::clone(&self.events);
        tokio::spawn(async move {
            let result = connector.execute_convert(&quote_id).await;
            push_event(&events, PortEvent::ConvertExecuted { seq, result });
        });
        self.needs_redraw = true;
        Ok(())
    }

    pub(crate) fn apply_execute_result(
        &mut self,
        seq: u64,
        result: Result<(), crate::connector::ConnectorError>,
    ) {
        if seq != self.convert_seq {
            debug!("discarding stale convert result (seq {seq})");
            return;
        }
        let Some(ConvertPhase::Execute { summary }) = self.convert_in_flight.take() else {
            debug!("convert result without a pending execution");
            return;
        };
        match result {
            Ok(()) => {
                self.state.overlay = Some(Overlay::ConvertSuccess(summary));
            }
            Err(e) => {
                self.state.overlay = Some(Overlay::ConvertFailed {
                    message: Some(e.to_string()),
                });
            }
        }
        self.needs_redraw = true;
    }

    /// Abandon the convert flow from the preview, a failure overlay, or
    /// while a collaborator call is still in flight. A result that arrives
    /// afterwards is discarded, not applied.
    pub fn cancel_convert(&mut self) -> Result<(), TransitionError> {
        let in_convert_overlay = matches!(
            self.state.overlay,
            Some(Overlay::ConvertPreview(_))
                | Some(Overlay::InsufficientFunds)
                | Some(Overlay::ConvertFailed { .. })
        );
        if !in_convert_overlay && self.convert_in_flight.is_none() {
            return Err(TransitionError::WrongState("during a convert flow"));
        }
        self.countdown = None;
        self.convert_seq += 1;
        self.convert_in_flight = None;
        self.state.overlay = None;
        self.needs_redraw = true;
        Ok(())
    }

    /// Leave the success screen for the summary view.
    pub fn acknowledge_convert_success(&mut self) -> Result<(), TransitionError> {
        if !matches!(self.state.overlay, Some(Overlay::ConvertSuccess(_))) {
            return Err(TransitionError::WrongState("after a successful convert"));
        }
        self.state.overlay = None;
        self.state.top_view = super::types::TopView::Summary;
        self.state.deposit_selection = None;
        self.state.search_filter.clear();
        self.reset_convert_form();
        self.refresh_balances();
        self.needs_redraw = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{connected_widget, settle};
    use super::*;
    use crate::connector::ConnectorError;
    use crate::widget::types::TopView;

    #[tokio::test]
    async fn quote_success_opens_preview_with_countdown() {
        let (mut widget, _mock) = connected_widget();
        widget.request_convert_quote("BTC", "BNB", "1").unwrap();
        assert!(widget.quote_pending());
        settle(&mut widget).await;

        let pending = widget.state().pending_convert().expect("preview");
        assert_eq!(pending.expiry_secs, QUOTE_EXPIRY_SECS);
        assert_eq!(pending.from_asset, "BTC");
        assert_eq!(pending.to_asset, "BNB");
        assert!(widget.countdown_active());
        assert!(!widget.quote_pending());
    }

    #[tokio::test]
    async fn tick_expiry_clears_preview() {
        let (mut widget, _mock) = connected_widget();
        widget.request_convert_quote("BTC", "BNB", "1").unwrap();
        settle(&mut widget).await;

        for remaining in (1..QUOTE_EXPIRY_SECS).rev() {
            widget.tick_countdown();
            assert_eq!(
                widget.state().pending_convert().expect("still up").expiry_secs,
                remaining
            );
        }
        // expiry_secs == 1; the next tick expires the quote.
        widget.tick_countdown();
        assert_eq!(widget.state().overlay(), None);
        assert_eq!(widget.state().pending_convert(), None);
        assert!(!widget.countdown_active());
    }

    #[test]
    fn tick_outside_preview_is_noop() {
        let (mut widget, _mock) = connected_widget();
        let before = widget.state().clone();
        widget.tick_countdown();
        assert_eq!(*widget.state(), before);
    }

    #[tokio::test]
    async fn confirm_stops_countdown_before_executing() {
        let (mut widget, _mock) = connected_widget();
        widget.request_convert_quote("BTC", "BNB", "1").unwrap();
        settle(&mut widget).await;

        for _ in 0..15 {
            widget.tick_countdown();
        }
        assert_eq!(widget.state().pending_convert().unwrap().expiry_secs, 15);

        widget.confirm_convert().unwrap();
        assert!(!widget.countdown_active());
        // Late ticks must not touch the pending quote anymore.
        widget.tick_countdown();
        assert_eq!(widget.state().pending_convert().unwrap().expiry_secs, 15);

        settle(&mut widget).await;
        match widget.state().overlay() {
            Some(Overlay::ConvertSuccess(summary)) => {
                assert_eq!(summary.from_asset, "BTC");
                assert_eq!(summary.to_asset, "BNB");
            }
            other => panic!("expected success overlay, got {other:?}"),
        }
        assert_eq!(widget.state().pending_convert(), None);
    }

    #[tokio::test]
    async fn insufficient_funds_path() {
        let (mut widget, _mock) = connected_widget();
        widget.request_convert_quote("BTC", "BNB", "999999").unwrap();
        settle(&mut widget).await;

        assert_eq!(widget.state().overlay(), Some(&Overlay::InsufficientFunds));
        widget.cancel_convert().unwrap();
        assert_eq!(widget.state().overlay(), None);
        assert_eq!(widget.state().pending_convert(), None);
    }

    #[tokio::test]
    async fn quote_failure_keeps_collaborator_message() {
        let (mut widget, mock) = connected_widget();
        mock.set_quote_result(Err(ConnectorError::Unavailable("maintenance".into())));
        widget.request_convert_quote("BTC", "BNB", "1").unwrap();
        settle(&mut widget).await;

        match widget.state().overlay() {
            Some(Overlay::ConvertFailed { message: Some(m) }) => {
                assert!(m.contains("maintenance"))
            }
            other => panic!("expected failure overlay, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn execute_failure_reports_reason() {
        let (mut widget, mock) = connected_widget();
        mock.set_execute_result(Err(ConnectorError::Rejected("quote expired".into())));
        widget.request_convert_quote("BTC", "BNB", "1").unwrap();
        settle(&mut widget).await;
        widget.confirm_convert().unwrap();
        settle(&mut widget).await;

        match widget.state().overlay() {
            Some(Overlay::ConvertFailed { message: Some(m) }) => {
                assert!(m.contains("quote expired"))
            }
            other => panic!("expected failure overlay, got {other:?}"),
        }
        widget.cancel_convert().unwrap();
        assert_eq!(widget.state().overlay(), None);
    }

    #[tokio::test]
    async fn quote_loading_blocks_navigation_until_cancelled() {
        let (mut widget, _mock) = connected_widget();
        widget.select_top_view(TopView::Convert).unwrap();
        widget.request_convert_quote("BTC", "BNB", "1").unwrap();
        assert_eq!(
            widget.select_top_view(TopView::Summary),
            Err(TransitionError::RequestInFlight)
        );
        widget.cancel_convert().unwrap();
        widget.select_top_view(TopView::Summary).unwrap();
    }

    #[tokio::test]
    async fn cancel_discards_inflight_quote() {
        let (mut widget, _mock) = connected_widget();
        widget.request_convert_quote("BTC", "BNB", "1").unwrap();
        // Cancel before the spawned call resolves.
        widget.cancel_convert().unwrap();
        settle(&mut widget).await;

        assert_eq!(widget.state().overlay(), None);
        assert_eq!(widget.state().pending_convert(), None);
        assert!(!widget.quote_pending());
    }

    #[tokio::test]
    async fn request_preconditions() {
        let (mut widget, _mock) = connected_widget();
        assert_eq!(
            widget.request_convert_quote("BTC", "BTC", "1"),
            Err(TransitionError::SameAsset)
        );
        assert_eq!(
            widget.request_convert_quote("DOGE", "BNB", "1"),
            Err(TransitionError::UnknownAsset("DOGE".into()))
        );
        assert_eq!(
            widget.request_convert_quote("BTC", "BNB", "0"),
            Err(TransitionError::InvalidAmount("0".into()))
        );
        assert_eq!(
            widget.request_convert_quote("BTC", "BNB", "-1"),
            Err(TransitionError::InvalidAmount("-1".into()))
        );
        assert_eq!(
            widget.request_convert_quote("BTC", "BNB", "one"),
            Err(TransitionError::InvalidAmount("one".into()))
        );

        widget.request_convert_quote("BTC", "BNB", "1").unwrap();
        assert_eq!(
            widget.request_convert_quote("BTC", "BNB", "1"),
            Err(TransitionError::RequestInFlight)
        );
    }

    #[tokio::test]
    async fn request_rejected_while_overlay_up() {
        let (mut widget, _mock) = connected_widget();
        widget.request_convert_quote("BTC", "BNB", "1").unwrap();
        settle(&mut widget).await;
        assert_eq!(
            widget.request_convert_quote("BTC", "BNB", "1"),
            Err(TransitionError::OverlayActive)
        );
    }

    #[test]
    fn confirm_without_preview_is_rejected() {
        let (mut widget, _mock) = connected_widget();
        assert!(matches!(
            widget.confirm_convert(),
            Err(TransitionError::WrongState(_))
        ));
    }

    #[tokio::test]
    async fn acknowledge_navigates_to_summary() {
        let (mut widget, _mock) = connected_widget();
        widget.select_top_view(TopView::Convert).unwrap();
        widget.request_convert_quote("BTC", "BNB", "1").unwrap();
        settle(&mut widget).await;
        widget.confirm_convert().unwrap();
        settle(&mut widget).await;

        widget.acknowledge_convert_success().unwrap();
        assert_eq!(widget.state().overlay(), None);
        assert_eq!(widget.state().top_view(), TopView::Summary);
        assert_eq!(widget.convert_amount, "");
    }

    #[test]
    fn convert_amount_input_accepts_one_decimal_point() {
        let (mut widget, _mock) = connected_widget();
        for ch in ['1', '.', '5', '.', 'x', '2'] {
            widget.push_convert_amount_char(ch);
        }
        assert_eq!(widget.convert_amount, "1.52");
        widget.pop_convert_amount_char();
        assert_eq!(widget.convert_amount, "1.5");
    }

    #[test]
    fn convert_endpoints_must_differ() {
        let (mut widget, _mock) = connected_widget();
        assert_eq!(widget.select_convert_to("BNB").is_ok(), true);
        assert_eq!(widget.select_convert_from("BNB"), Err(TransitionError::SameAsset));
        widget.select_convert_to("ETH").unwrap();
        widget.select_convert_from("BNB").unwrap();
    }
}
