use anyhow::Result;
use crossterm::event::KeyCode;

use crate::assets;

use super::core::ExchangeWidget;
use super::types::{Overlay, TopView};

impl ExchangeWidget {
    /// Map a key press onto coordinator operations. Returns `false` when the
    /// user asked to quit.
    pub fn handle_key_input(&mut self, key_code: KeyCode) -> Result<bool> {
        // Search mode captures printable characters first.
        if self.search_mode {
            match key_code {
                KeyCode::Esc => self.toggle_search_mode(),
                KeyCode::Enter => {
                    // Keep the filter, leave input mode.
                    self.search_mode = false;
                    self.needs_redraw = true;
                }
                KeyCode::Backspace => self.pop_search_char(),
                KeyCode::Up => self.previous_list_item(),
                KeyCode::Down => self.next_list_item(),
                KeyCode::Char(ch) => self.push_search_char(ch),
                _ => {}
            }
            return Ok(true);
        }

        match key_code {
            KeyCode::Char('q') => return Ok(false),
            KeyCode::Char('w') => {
                self.toggle_expanded();
                return Ok(true);
            }
            _ => {}
        }

        // A collapsed card only reacts to expand and quit.
        if !self.expanded {
            return Ok(true);
        }

        if self.state.overlay.is_some() {
            self.handle_overlay_key(key_code);
            return Ok(true);
        }

        match key_code {
            KeyCode::Left => {
                if let Err(e) = self.previous_view() {
                    self.report_rejection("navigate", &e);
                }
            }
            KeyCode::Right | KeyCode::Tab => {
                if let Err(e) = self.next_view() {
                    self.report_rejection("navigate", &e);
                }
            }
            KeyCode::Char('r') => self.refresh_balances(),
            KeyCode::Char('h') => self.toggle_hide_balance(),
            KeyCode::Char('d') => {
                if let Err(e) = self.begin_disconnect() {
                    self.report_rejection("disconnect", &e);
                }
            }
            KeyCode::Char('/') => self.toggle_search_mode(),
            _ => self.handle_view_key(key_code),
        }
        Ok(true)
    }

    fn handle_overlay_key(&mut self, key_code: KeyCode) {
        let confirm = matches!(key_code, KeyCode::Enter);
        if !confirm && !matches!(key_code, KeyCode::Esc) {
            return;
        }
        let result = match &self.state.overlay {
            Some(Overlay::Disconnecting) => {
                if confirm {
                    self.confirm_disconnect()
                } else {
                    self.cancel_disconnect()
                }
            }
            Some(Overlay::ConvertPreview(_)) => {
                if confirm {
                    self.confirm_convert()
                } else {
                    self.cancel_convert()
                }
            }
            Some(Overlay::ConvertSuccess(_)) => self.acknowledge_convert_success(),
            Some(Overlay::InsufficientFunds) | Some(Overlay::ConvertFailed { .. }) => {
                self.cancel_convert()
            }
            Some(Overlay::AuthInvalid) => self.dismiss_auth_invalid(),
            Some(Overlay::QrDisplay { .. }) => self.dismiss_qr(),
            None => Ok(()),
        };
        if let Err(e) = result {
            self.report_rejection("overlay", &e);
        }
    }

    fn handle_view_key(&mut self, key_code: KeyCode) {
        match self.state.top_view {
            TopView::Deposit => self.handle_deposit_key(key_code),
            TopView::Trade => self.handle_trade_key(key_code),
            TopView::Convert => self.handle_convert_key(key_code),
            TopView::Summary => {}
            TopView::Buy => self.handle_buy_key(key_code),
        }
    }

    fn handle_deposit_key(&mut self, key_code: KeyCode) {
        if let Some(selected) = self.state.deposit_selection.clone() {
            match key_code {
                KeyCode::Esc | KeyCode::Backspace => {
                    if let Err(e) = self.clear_deposit_asset() {
                        self.report_rejection("deposit", &e);
                    }
                }
                KeyCode::Char('v') => {
                    if let Err(e) = self.show_qr(&selected) {
                        self.report_rejection("deposit-qr", &e);
                    }
                }
                _ => {}
            }
            return;
        }
        match key_code {
            KeyCode::Up => self.previous_list_item(),
            KeyCode::Down => self.next_list_item(),
            KeyCode::Enter => {
                if let Some(asset) = self.selected_list_asset() {
                    if let Err(e) = self.select_deposit_asset(asset.ticker) {
                        self.report_rejection("deposit", &e);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_trade_key(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Up => self.previous_list_item(),
            KeyCode::Down => self.next_list_item(),
            KeyCode::Enter => {
                // Jump into the convert flow with the highlighted asset.
                let Some(asset) = self.selected_list_asset() else {
                    return;
                };
                if !assets::is_convertible(asset.ticker) {
                    return;
                }
                if asset.ticker == self.convert_to {
                    self.convert_to = assets::next_convertible(asset.ticker).to_string();
                }
                self.convert_from = asset.ticker.to_string();
                if let Err(e) = self.select_top_view(TopView::Convert) {
                    self.report_rejection("trade", &e);
                }
            }
            _ => {}
        }
    }

    fn handle_convert_key(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Char('f') => {
                let mut next = assets::next_convertible(&self.convert_from);
                if next == self.convert_to {
                    next = assets::next_convertible(next);
                }
                if let Err(e) = self.select_convert_from(next) {
                    self.report_rejection("convert-from", &e);
                }
            }
            KeyCode::Up | KeyCode::Down => {
                let mut next = assets::next_convertible(&self.convert_to);
                if next == self.convert_from {
                    next = assets::next_convertible(next);
                }
                if let Err(e) = self.select_convert_to(next) {
                    self.report_rejection("convert-to", &e);
                }
            }
            KeyCode::Backspace => self.pop_convert_amount_char(),
            KeyCode::Enter => {
                let (from, to, amount) = (
                    self.convert_from.clone(),
                    self.convert_to.clone(),
                    self.convert_amount.clone(),
                );
                if let Err(e) = self.request_convert_quote(&from, &to, &amount) {
                    self.report_rejection("convert-quote", &e);
                }
            }
            KeyCode::Char(ch) => self.push_convert_amount_char(ch),
            _ => {}
        }
    }

    fn handle_buy_key(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Up | KeyCode::Down => {
                let tickers: Vec<_> = assets::SUPPORTED_ASSETS.iter().map(|a| a.ticker).collect();
                let idx = tickers
                    .iter()
                    .position(|t| *t == self.buy_asset)
                    .unwrap_or(0);
                let next = match key_code {
                    KeyCode::Up => tickers[(idx + tickers.len() - 1) % tickers.len()],
                    _ => tickers[(idx + 1) % tickers.len()],
                };
                if let Err(e) = self.select_buy_asset(next) {
                    self.report_rejection("buy-asset", &e);
                }
            }
            KeyCode::Backspace => self.pop_buy_amount_char(),
            KeyCode::Enter => {
                if let Err(e) = self.connect() {
                    self.report_rejection("connect", &e);
                }
            }
            KeyCode::Char(ch) => self.push_buy_amount_char(ch),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::connected_widget;
    use super::*;

    #[test]
    fn quit_key_stops_the_loop() {
        let (mut widget, _mock) = connected_widget();
        assert!(!widget.handle_key_input(KeyCode::Char('q')).unwrap());
        assert!(widget.handle_key_input(KeyCode::Char('h')).unwrap());
    }

    #[test]
    fn collapsed_card_ignores_view_keys() {
        let (mut widget, _mock) = connected_widget();
        widget.handle_key_input(KeyCode::Char('w')).unwrap();
        assert!(!widget.expanded);

        let view = widget.state().top_view();
        widget.handle_key_input(KeyCode::Tab).unwrap();
        assert_eq!(widget.state().top_view(), view);

        widget.handle_key_input(KeyCode::Char('w')).unwrap();
        assert!(widget.expanded);
    }

    #[test]
    fn search_mode_captures_characters() {
        let (mut widget, _mock) = connected_widget();
        widget.select_top_view(TopView::Deposit).unwrap();
        widget.handle_key_input(KeyCode::Char('/')).unwrap();
        assert!(widget.search_mode);
        // 'q' must not quit while typing a filter.
        assert!(widget.handle_key_input(KeyCode::Char('q')).unwrap());
        assert_eq!(widget.state().search_filter(), "q");
        widget.handle_key_input(KeyCode::Esc).unwrap();
        assert!(!widget.search_mode);
        assert_eq!(widget.state().search_filter(), "");
    }

    #[test]
    fn escape_cancels_the_disconnect_overlay() {
        let (mut widget, _mock) = connected_widget();
        widget.handle_key_input(KeyCode::Char('d')).unwrap();
        assert_eq!(widget.state().overlay(), Some(&Overlay::Disconnecting));
        widget.handle_key_input(KeyCode::Esc).unwrap();
        assert_eq!(widget.state().overlay(), None);
    }
}
