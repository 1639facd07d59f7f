//! Navigation between the primary views, deposit drill-down and filtering

use crate::assets::{self, AssetInfo};

use super::core::ExchangeWidget;
use super::types::{Overlay, TopView, TransitionError};

impl ExchangeWidget {
    /// Switch the primary view. Rejected while any overlay is up; those are
    /// left through their own exit transitions first. The quote-loading
    /// phase counts as part of the preview flow and blocks navigation too.
    pub fn select_top_view(&mut self, view: TopView) -> Result<(), TransitionError> {
        if self.state.overlay.is_some() {
            return Err(TransitionError::OverlayActive);
        }
        if self.convert_in_flight.is_some() {
            return Err(TransitionError::RequestInFlight);
        }
        if !self.authed && view != TopView::Buy {
            return Err(TransitionError::NotAuthenticated);
        }
        if self.authed && view == TopView::Buy {
            return Err(TransitionError::WrongState("while disconnected"));
        }
        if self.state.top_view == view {
            return Ok(());
        }
        self.state.top_view = view;
        self.state.deposit_selection = None;
        self.state.search_filter.clear();
        self.search_mode = false;
        self.list_cursor = 0;
        self.needs_redraw = true;
        Ok(())
    }

    pub fn next_view(&mut self) -> Result<(), TransitionError> {
        self.select_top_view(self.state.top_view.next())
    }

    pub fn previous_view(&mut self) -> Result<(), TransitionError> {
        self.select_top_view(self.state.top_view.previous())
    }

    /// Drill into one asset's deposit detail.
    pub fn select_deposit_asset(&mut self, ticker: &str) -> Result<(), TransitionError> {
        if self.state.overlay.is_some() {
            return Err(TransitionError::OverlayActive);
        }
        if self.state.top_view != TopView::Deposit {
            return Err(TransitionError::WrongState("on the deposit view"));
        }
        if !assets::is_supported(ticker) {
            return Err(TransitionError::UnknownAsset(ticker.to_string()));
        }
        self.state.deposit_selection = Some(ticker.to_string());
        self.search_mode = false;
        self.needs_redraw = true;
        Ok(())
    }

    /// Back out of the deposit detail; the list filter resets with it.
    pub fn clear_deposit_asset(&mut self) -> Result<(), TransitionError> {
        if self.state.overlay.is_some() {
            return Err(TransitionError::OverlayActive);
        }
        if self.state.top_view != TopView::Deposit {
            return Err(TransitionError::WrongState("on the deposit view"));
        }
        if self.state.deposit_selection.take().is_some() {
            self.state.search_filter.clear();
        }
        self.list_cursor = 0;
        self.needs_redraw = true;
        Ok(())
    }

    pub fn show_qr(&mut self, ticker: &str) -> Result<(), TransitionError> {
        if self.state.overlay.is_some() {
            return Err(TransitionError::OverlayActive);
        }
        if self.state.deposit_selection.as_deref() != Some(ticker) {
            return Err(TransitionError::WrongState("for the selected deposit asset"));
        }
        self.state.overlay = Some(Overlay::QrDisplay { asset: ticker.to_string() });
        self.needs_redraw = true;
        Ok(())
    }

    pub fn dismiss_qr(&mut self) -> Result<(), TransitionError> {
        if !matches!(self.state.overlay, Some(Overlay::QrDisplay { .. })) {
            return Err(TransitionError::WrongState("while the QR overlay is up"));
        }
        self.state.overlay = None;
        self.needs_redraw = true;
        Ok(())
    }

    // Search over the deposit/trade asset lists

    pub fn toggle_search_mode(&mut self) {
        if self.state.overlay.is_some()
            || !matches!(self.state.top_view, TopView::Deposit | TopView::Trade)
            || self.state.deposit_selection.is_some()
        {
            return;
        }
        self.search_mode = !self.search_mode;
        if !self.search_mode {
            self.clear_search();
        }
        self.needs_redraw = true;
    }

    pub fn push_search_char(&mut self, ch: char) {
        if !self.search_mode {
            return;
        }
        self.state.search_filter.push(ch);
        self.list_cursor = 0;
        self.needs_redraw = true;
    }

    pub fn pop_search_char(&mut self) {
        if !self.search_mode {
            return;
        }
        self.state.search_filter.pop();
        self.list_cursor = 0;
        self.needs_redraw = true;
    }

    pub fn clear_search(&mut self) {
        self.state.search_filter.clear();
        self.list_cursor = 0;
        self.needs_redraw = true;
    }

    /// The asset list for the deposit/trade views with the filter applied.
    /// Matches against ticker and display name, case-insensitively.
    pub fn filtered_assets(&self) -> Vec<&'static AssetInfo> {
        let query = self.state.search_filter.to_lowercase();
        assets::SUPPORTED_ASSETS
            .iter()
            .filter(|a| {
                query.is_empty()
                    || a.ticker.to_lowercase().contains(&query)
                    || a.name.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn next_list_item(&mut self) {
        let len = self.filtered_assets().len();
        if len > 0 {
            self.list_cursor = (self.list_cursor + 1) % len;
            self.needs_redraw = true;
        }
    }

    pub fn previous_list_item(&mut self) {
        let len = self.filtered_assets().len();
        if len > 0 {
            self.list_cursor = if self.list_cursor == 0 {
                len - 1
            } else {
                self.list_cursor - 1
            };
            self.needs_redraw = true;
        }
    }

    pub fn selected_list_asset(&self) -> Option<&'static AssetInfo> {
        self.filtered_assets().get(self.list_cursor).copied()
    }
}
