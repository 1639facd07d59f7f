use clap::Parser;
use crate::config::{DEFAULT_AUTH_TOKEN_ENV, DEFAULT_BALANCE_POLL_SECS, DEFAULT_CONNECTOR_LATENCY_MS};

#[derive(Parser)]
#[command(name = "tabdeck")]
#[command(about = "New-tab style dashboard with an exchange widget")]
pub struct Cli {
    /// Balance refresh interval in seconds
    #[arg(short, long, default_value_t = DEFAULT_BALANCE_POLL_SECS)]
    pub interval: f64,

    /// Simulated connector latency in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_CONNECTOR_LATENCY_MS)]
    pub latency: u64,

    /// Auth token environment variable name; when set the widget starts connected
    #[arg(long, default_value = DEFAULT_AUTH_TOKEN_ENV)]
    pub auth_token_env: String,
}
