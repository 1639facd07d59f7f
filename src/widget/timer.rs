//! Scoped ownership of the widget's recurring activities.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::events::{PortEvent, push_event};

/// Background task handle released on drop.
///
/// The coordinator holds at most one guard per activity; replacing or
/// clearing the slot aborts the task, so no timer outlives its owner.
pub(crate) struct TimerGuard {
    handle: JoinHandle<()>,
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// One tick per elapsed second while the convert preview is up.
pub(crate) fn spawn_countdown(events: Arc<Mutex<Vec<PortEvent>>>) -> TimerGuard {
    spawn_periodic(events, Duration::from_secs(1), || PortEvent::CountdownTick)
}

/// Recurring balance refresh while the session is authenticated.
pub(crate) fn spawn_balance_poll(
    events: Arc<Mutex<Vec<PortEvent>>>,
    period: Duration,
) -> TimerGuard {
    spawn_periodic(events, period, || PortEvent::PollBalances)
}

fn spawn_periodic(
    events: Arc<Mutex<Vec<PortEvent>>>,
    period: Duration,
    event: impl Fn() -> PortEvent + Send + 'static,
) -> TimerGuard {
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            push_event(&events, event());
        }
    });
    TimerGuard { handle }
}
