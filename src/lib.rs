// Library exports for the tabdeck dashboard
pub mod assets;
pub mod cli;
pub mod config;
pub mod connector;
pub mod data;
pub mod ui;
pub mod widget;

// Re-export commonly used types
pub use cli::Cli;
pub use connector::mock::MockConnector;
pub use connector::{ConnectorError, ExchangeConnector};
pub use data::{CompletedConvert, DepositInfo, Quote};
pub use ui::render_ui;
pub use widget::{ExchangeWidget, Overlay, TopView, TransitionError, ViewState, process_port_events};
