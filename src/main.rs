use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dotenv::dotenv;
use futures_util::FutureExt;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::{
    env, io,
    panic::AssertUnwindSafe,
    sync::Arc,
    time::{Duration, Instant},
};
use cli_log::*;
use clap::Parser;

use tabdeck::{Cli, ExchangeWidget, MockConnector, process_port_events, render_ui};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    init_cli_log!();
    info!("Starting tabdeck...");

    let cli = Cli::parse();

    // Gracefully handle panics and restore the terminal
    let result = AssertUnwindSafe(run_tui_app(cli)).catch_unwind().await;

    // Restore terminal state
    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture).ok();

    match result {
        Ok(res) => res,
        Err(panic) => {
            eprintln!("\n\nApplication panicked: {panic:?}\n\n");
            Err(anyhow::anyhow!("Application panicked"))
        }
    }
}

async fn run_tui_app(cli: Cli) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create the widget; a present auth token means the session starts connected.
    let connector = Arc::new(MockConnector::new(Duration::from_millis(cli.latency)));
    let authed = env::var(&cli.auth_token_env).is_ok();
    let mut widget = ExchangeWidget::new(
        connector,
        authed,
        Duration::from_secs_f64(cli.interval),
    );
    widget.mount();

    // Main loop
    let res = run_app(&mut terminal, &mut widget).await;

    widget.teardown();

    // Restore terminal before returning
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        info!("App error: {err:?}");
    }

    res
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    widget: &mut ExchangeWidget,
) -> Result<()> {
    let tick_rate = Duration::from_millis(tabdeck::config::TICK_RATE_MS);
    let ui_update_rate = Duration::from_millis(tabdeck::config::UI_UPDATE_RATE_MS);
    let mut last_ui_update = Instant::now();

    loop {
        if crossterm::event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if !widget.handle_key_input(key.code)? {
                    return Ok(()); // Exit requested
                }
            }
        }

        // Apply collaborator results that arrived since the last pass.
        process_port_events(widget);

        // Force a redraw at least once per second for the clock and countdown.
        let force_redraw = last_ui_update.elapsed() >= ui_update_rate;

        if widget.needs_redraw || force_redraw {
            terminal.draw(|f| render_ui(f, widget))?;
            widget.needs_redraw = false;
            if force_redraw {
                last_ui_update = Instant::now();
            }
        }
    }
}
