use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::session_loop::{SessionEvent, SessionHandle};

/// Repeating once-per-second timer feeding `SessionEvent::Tick` into the
/// session loop.
///
/// Each tick is stamped with the token from the latest snapshot, so ticks
/// racing a session reset are recognized as stale and dropped by the driver.
/// The task is aborted on `stop` or drop; tearing down a view must not leak
/// a repeating timer.
pub struct Ticker {
    task: JoinHandle<()>,
}

impl Ticker {
    pub const PERIOD: Duration = Duration::from_secs(1);

    /// Spawns the timer task at the default one-second period.
    #[must_use]
    pub fn spawn(handle: &SessionHandle) -> Self {
        Self::spawn_with_period(handle, Self::PERIOD)
    }

    /// Spawns the timer task with an explicit period (shortened in tests).
    #[must_use]
    pub fn spawn_with_period(handle: &SessionHandle, period: Duration) -> Self {
        let events = handle.sender();
        let snapshots = handle.watch();

        let task = tokio::spawn(async move {
            let mut clock = interval(period);
            clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // interval fires immediately; swallow the first tick so the
            // countdown starts a full period after spawn.
            clock.tick().await;
            loop {
                clock.tick().await;
                let token = snapshots.borrow().tick_token;
                if events.send(SessionEvent::Tick(token)).await.is_err() {
                    break;
                }
            }
        });

        Self { task }
    }

    /// Cancels the repeating timer.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
