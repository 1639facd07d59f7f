use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::widget::{ExchangeWidget, Overlay};

use super::overlays::render_overlay;
use super::views::render_view;

pub fn render_ui(f: &mut Frame, app: &ExchangeWidget) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Dashboard header
            Constraint::Min(10),   // Widget card
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    let clock = Local::now().format("%H:%M");
    let header = Paragraph::new(format!("tabdeck  {clock}"))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    render_exchange_card(f, app, chunks[1]);

    let footer = Paragraph::new(footer_text(app))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[2]);
}

/// The exchange card, collapsed to its title tab or fully drawn, with any
/// active overlay on top.
fn render_exchange_card(f: &mut Frame, app: &ExchangeWidget, area: Rect) {
    if !app.expanded {
        let tab_area = Rect { height: area.height.min(3), ..area };
        let tab = Paragraph::new("Exchange")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(tab, tab_area);
        return;
    }

    render_view(f, app, area);
    if app.state().overlay().is_some() {
        render_overlay(f, app, area);
    }
}

fn footer_text(app: &ExchangeWidget) -> String {
    if !app.expanded {
        return "w: Expand | q: Quit".to_string();
    }
    if app.search_mode {
        return format!(
            "Search: {} | ↑↓: Navigate | Enter: Keep filter | Esc: Clear | Backspace: Delete",
            app.state().search_filter()
        );
    }
    match app.state().overlay() {
        Some(Overlay::Disconnecting) => "Enter: Disconnect | Esc: Keep account".to_string(),
        Some(Overlay::ConvertPreview(_)) => "Enter: Execute | Esc: Cancel".to_string(),
        Some(Overlay::ConvertSuccess(_)) => "Enter: Continue".to_string(),
        Some(Overlay::InsufficientFunds) | Some(Overlay::ConvertFailed { .. }) => {
            "Enter/Esc: Back".to_string()
        }
        Some(Overlay::AuthInvalid) => "Enter: Done".to_string(),
        Some(Overlay::QrDisplay { .. }) => "Esc: Done".to_string(),
        None => match app.state().top_view() {
            crate::widget::TopView::Buy => {
                "↑↓: Asset | 0-9: Amount | Enter: Connect | q: Quit".to_string()
            }
            crate::widget::TopView::Deposit if app.state().deposit_selection().is_some() => {
                "v: QR code | Esc: Back | q: Quit".to_string()
            }
            crate::widget::TopView::Deposit | crate::widget::TopView::Trade => {
                "◄►: Switch tabs | ↑↓: Navigate | Enter: Select | /: Search | d: Disconnect | q: Quit"
                    .to_string()
            }
            crate::widget::TopView::Convert => {
                "f: From | ↑↓: To | Enter: Get a quote | d: Disconnect | q: Quit".to_string()
            }
            crate::widget::TopView::Summary => {
                "◄►: Switch tabs | r: Refresh | h: Hide balances | d: Disconnect | q: Quit"
                    .to_string()
            }
        },
    }
}
