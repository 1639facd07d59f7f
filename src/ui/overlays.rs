use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::assets;
use crate::data::format_crypto_balance;
use crate::widget::{ExchangeWidget, Overlay};

use super::components::centered_rect;

/// Paint the active overlay over the base view.
pub fn render_overlay(f: &mut Frame, app: &ExchangeWidget, area: Rect) {
    let Some(overlay) = app.state().overlay() else {
        return;
    };

    let popup = centered_rect(70, 60, area);
    f.render_widget(Clear, popup);

    match overlay {
        Overlay::Disconnecting => render_disconnect(f, app, popup),
        Overlay::AuthInvalid => render_auth_invalid(f, popup),
        Overlay::InsufficientFunds => render_notice(
            f,
            popup,
            "Unable to convert",
            "The account balance cannot cover that amount.",
            Color::Red,
        ),
        Overlay::ConvertFailed { message } => render_notice(
            f,
            popup,
            "Unable to convert",
            message.as_deref().unwrap_or("The conversion could not be completed."),
            Color::Red,
        ),
        Overlay::ConvertPreview(_) => render_convert_preview(f, app, popup),
        Overlay::ConvertSuccess(done) => {
            let text = format!(
                "Converted {} {} to {} {}!",
                format_crypto_balance(done.amount),
                done.from_asset,
                format_crypto_balance(done.received_amount),
                done.to_asset
            );
            render_notice(f, popup, "Success", &text, Color::Green)
        }
        Overlay::QrDisplay { asset } => render_qr(f, app, popup, asset),
    }
}

fn render_disconnect(f: &mut Frame, app: &ExchangeWidget, area: Rect) {
    let body = if app.revoke_pending() {
        "Disconnecting..."
    } else {
        "Disconnect your exchange account from this dashboard? \
         You can reconnect at any time."
    };
    render_notice(f, area, "Disconnect account", body, Color::Yellow);
}

fn render_auth_invalid(f: &mut Frame, area: Rect) {
    render_notice(
        f,
        area,
        "Account disconnected",
        "Your credentials are no longer valid. Reconnect to continue trading.",
        Color::Red,
    );
}

fn render_convert_preview(f: &mut Frame, app: &ExchangeWidget, area: Rect) {
    let Some(pending) = app.state().pending_convert() else {
        return;
    };

    let execute_label = if app.execute_pending() {
        "Executing...".to_string()
    } else {
        format!("Execute ({}s)", pending.expiry_secs)
    };

    let lines = vec![
        Line::from(Span::styled(
            "Confirm conversion",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "To sell:      {} {}",
            format_crypto_balance(pending.amount),
            pending.from_asset
        )),
        Line::from(format!("Fee:          {} USD", pending.fee)),
        Line::from(format!(
            "Will receive: {} {}",
            format_crypto_balance(pending.received_amount),
            pending.to_asset
        )),
        Line::from(format!(
            "Quoted at:    {}",
            pending.quoted_at.format("%H:%M:%S UTC")
        )),
        Line::from(""),
        Line::from(Span::styled(
            execute_label,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
    ];

    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Convert")
                .style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(popup, area);
}

fn render_qr(f: &mut Frame, app: &ExchangeWidget, area: Rect, asset: &str) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{asset} ({})", assets::display_name(asset)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    match app.deposit_infos.get(asset).and_then(|info| info.address.clone()) {
        Some(address) => {
            lines.push(Line::from("Scan or copy the deposit address:"));
            lines.push(Line::from(Span::styled(
                address,
                Style::default().fg(Color::Cyan),
            )));
        }
        None => lines.push(Line::from("Address unavailable at this time")),
    }

    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Deposit QR"));
    f.render_widget(popup, area);
}

fn render_notice(f: &mut Frame, area: Rect, title: &str, body: &str, color: Color) {
    let notice = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .style(Style::default().fg(color)),
        );
    f.render_widget(notice, area);
}
