use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Tabs},
};
use rust_decimal::Decimal;
use strum::IntoEnumIterator;

use crate::data::format_crypto_balance;
use crate::widget::{ExchangeWidget, TopView};

pub fn render_nav_bar(f: &mut Frame, app: &ExchangeWidget, area: Rect) {
    let titles: Vec<String> = TopView::iter()
        .filter(|view| *view != TopView::Buy)
        .map(|view| view.to_string())
        .collect();
    let selected = TopView::iter()
        .filter(|view| *view != TopView::Buy)
        .position(|view| view == app.state().top_view())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Exchange"))
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .select(selected)
        .divider("|");

    f.render_widget(tabs, area);
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Balance text, blurred when the privacy toggle is on.
pub fn balance_display(value: Decimal, hide: bool) -> String {
    if hide {
        "•••••".to_string()
    } else {
        format_crypto_balance(value)
    }
}
