// Widget module structure for the exchange card

pub mod balances;
pub mod convert;
pub mod core;
pub mod events;
pub mod input;
pub mod navigation;
pub mod session;
pub(crate) mod timer;
pub mod types;

// Re-export the coordinator and its public types
pub use self::core::ExchangeWidget;
pub use events::{PortEvent, process_port_events};
pub use types::{Overlay, PendingConvert, TopView, TransitionError, ViewState};

#[cfg(test)]
pub(crate) mod testutil {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::connector::mock::MockConnector;

    use super::core::ExchangeWidget;
    use super::events::process_port_events;

    pub(crate) fn connected_widget() -> (ExchangeWidget, Arc<MockConnector>) {
        let mock = Arc::new(MockConnector::instant());
        let widget = ExchangeWidget::new(mock.clone(), true, Duration::from_secs(30));
        (widget, mock)
    }

    pub(crate) fn unauthenticated_widget() -> (ExchangeWidget, Arc<MockConnector>) {
        let mock = Arc::new(MockConnector::instant());
        let widget = ExchangeWidget::new(mock.clone(), false, Duration::from_secs(30));
        (widget, mock)
    }

    /// Let spawned collaborator calls finish and apply their results. The
    /// single-threaded test runtime polls spawned futures at every yield.
    pub(crate) async fn settle(widget: &mut ExchangeWidget) -> usize {
        let mut applied = 0;
        for _ in 0..32 {
            tokio::task::yield_now().await;
            applied += process_port_events(widget);
        }
        applied
    }
}
