use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::assets;
use crate::data::format_crypto_balance;
use crate::widget::{ExchangeWidget, TopView};

use super::components::{balance_display, render_nav_bar};

/// Draw the active top view. Overlays are painted separately on top.
pub fn render_view(f: &mut Frame, app: &ExchangeWidget, area: Rect) {
    if app.state().top_view() == TopView::Buy {
        render_buy(f, app, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Navigation bar
            Constraint::Min(0),    // View content
        ])
        .split(area);

    render_nav_bar(f, app, chunks[0]);

    match app.state().top_view() {
        TopView::Deposit => render_deposit(f, app, chunks[1]),
        TopView::Trade => render_trade(f, app, chunks[1]),
        TopView::Convert => render_convert(f, app, chunks[1]),
        TopView::Summary | TopView::Buy => render_summary(f, app, chunks[1]),
    }
}

fn render_summary(f: &mut Frame, app: &ExchangeWidget, area: Rect) {
    let items: Vec<ListItem> = assets::SUPPORTED_ASSETS
        .iter()
        .map(|asset| {
            let balance = balance_display(app.asset_balance(asset.ticker), app.hide_balance);
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<22}", asset.name),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{balance} {}", asset.ticker),
                    Style::default().fg(Color::Green),
                ),
            ]))
        })
        .collect();

    let title = match app.last_refresh {
        Some(at) => format!("Balances (updated {})", at.format("%H:%M:%S UTC")),
        None => "Balances".to_string(),
    };

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn asset_list_title(app: &ExchangeWidget, label: &str) -> String {
    if app.search_mode || !app.state().search_filter().is_empty() {
        format!(
            "{label} - Search: '{}' ({}/{})",
            app.state().search_filter(),
            app.filtered_assets().len(),
            assets::SUPPORTED_ASSETS.len()
        )
    } else {
        format!("{label} ({} assets)", assets::SUPPORTED_ASSETS.len())
    }
}

fn render_asset_list(f: &mut Frame, app: &ExchangeWidget, area: Rect, label: &str, with_balances: bool) {
    let filtered = app.filtered_assets();
    if filtered.is_empty() {
        let empty = List::new(vec![ListItem::new("No assets match")])
            .block(Block::default().borders(Borders::ALL).title(asset_list_title(app, label)));
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = filtered
        .iter()
        .enumerate()
        .map(|(i, asset)| {
            let style = if i == app.list_cursor {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = vec![Span::styled(format!("{:<6}", asset.ticker), style)];
            spans.push(Span::styled(format!("{:<24}", asset.name), style));
            if with_balances {
                spans.push(Span::styled(
                    balance_display(app.asset_balance(asset.ticker), app.hide_balance),
                    style.fg(Color::Green),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(asset_list_title(app, label)));
    f.render_widget(list, area);
}

fn render_deposit(f: &mut Frame, app: &ExchangeWidget, area: Rect) {
    let Some(ticker) = app.state().deposit_selection() else {
        render_asset_list(f, app, area, "Deposit", false);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{ticker} ({})", assets::display_name(ticker)),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    match app.deposit_infos.get(ticker) {
        Some(info) if info.is_available() => {
            if let Some(address) = &info.address {
                lines.push(Line::from(Span::styled(
                    format!("{ticker} deposit address"),
                    Style::default().fg(Color::Gray),
                )));
                lines.push(Line::from(address.clone()));
                lines.push(Line::from(""));
            }
            if let Some(memo) = &info.memo {
                lines.push(Line::from(Span::styled(
                    format!("{ticker} deposit memo"),
                    Style::default().fg(Color::Gray),
                )));
                lines.push(Line::from(memo.clone()));
            }
        }
        _ => {
            lines.push(Line::from("Address unavailable at this time"));
        }
    }

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Deposit"));
    f.render_widget(detail, area);
}

fn render_trade(f: &mut Frame, app: &ExchangeWidget, area: Rect) {
    render_asset_list(f, app, area, "Trade", true);
}

fn render_convert(f: &mut Frame, app: &ExchangeWidget, area: Rect) {
    let available = format_crypto_balance(app.asset_balance(&app.convert_from));
    let amount = if app.convert_amount.is_empty() {
        "I want to trade...".to_string()
    } else {
        app.convert_amount.clone()
    };

    let mut lines = vec![
        Line::from(format!("Available {available} {}", app.convert_from)),
        Line::from(""),
        Line::from(vec![
            Span::raw("Amount: "),
            Span::styled(amount, Style::default().fg(Color::Yellow)),
        ]),
        Line::from(format!("From:   {}", app.convert_from)),
        Line::from(format!("To:     {}", app.convert_to)),
        Line::from(""),
    ];
    if app.quote_pending() {
        lines.push(Line::from(Span::styled(
            "Requesting quote...",
            Style::default().fg(Color::Cyan),
        )));
    } else {
        lines.push(Line::from("Press Enter to get a quote"));
    }

    let form = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Convert"));
    f.render_widget(form, area);
}

fn render_buy(f: &mut Frame, app: &ExchangeWidget, area: Rect) {
    let amount = if app.buy_amount.is_empty() {
        "I want to spend...".to_string()
    } else {
        format!("{} USD", app.buy_amount)
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "Purchase and trade crypto",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from("Connect an exchange account to view balances and trade."),
        Line::from(""),
        Line::from(vec![
            Span::raw("Spend: "),
            Span::styled(amount, Style::default().fg(Color::Yellow)),
        ]),
        Line::from(format!("Buy:   {}", app.buy_asset)),
        Line::from(""),
    ];
    if app.auth_in_progress {
        lines.push(Line::from(Span::styled(
            "Connecting...",
            Style::default().fg(Color::Cyan),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!("Press Enter to connect and buy {}", app.buy_asset),
            Style::default().fg(Color::Green),
        )));
    }

    let prompt = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Exchange"));
    f.render_widget(prompt, area);
}
