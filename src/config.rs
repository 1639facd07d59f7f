// Configuration constants for the application

/// Convert quote lifetime; the preview countdown starts here.
pub const QUOTE_EXPIRY_SECS: u32 = 30;

/// Update intervals (in milliseconds)
pub const TICK_RATE_MS: u64 = 50;
pub const UI_UPDATE_RATE_MS: u64 = 1000;

/// Simulated connector timings (in milliseconds)
pub const AUTH_EXCHANGE_DELAY_MS: u64 = 1_500;

/// Application limits
pub const MAX_PENDING_PORT_EVENTS: usize = 64;

/// Default CLI values
pub const DEFAULT_BALANCE_POLL_SECS: f64 = 30.0;
pub const DEFAULT_CONNECTOR_LATENCY_MS: u64 = 400;
pub const DEFAULT_AUTH_TOKEN_ENV: &str = "TABDECK_AUTH_TOKEN";
