use std::future::Future;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Handle to a running occupancy poll.
///
/// Owned by exactly one `ActiveSession`. Cancelling is idempotent and also happens on
/// drop, so destroying the session always stops the poll.
#[derive(Debug)]
pub struct PollHandle {
    token: CancellationToken,
}

impl PollHandle {
    /// Stops the poll. The task exits before its next tick.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Handle with no task behind it, for registry tests.
    #[cfg(test)]
    pub fn idle() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Starts a recurring recheck on the current tokio runtime.
///
/// The first check runs one full `interval` after the call, then every `interval`
/// until the returned handle is cancelled or dropped. Ticks missed while a check is
/// still running are delayed rather than bunched.
///
/// # Arguments
/// - `interval` - Time between checks
/// - `check` - Produces the future to run on every tick
///
/// # Returns
/// - `PollHandle` - Cancels the task when cancelled or dropped
pub fn start_occupancy_poll<F, Fut>(interval: Duration, check: F) -> PollHandle
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let token = CancellationToken::new();
    let task_token = token.clone();

    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = task_token.cancelled() => break,
                _ = ticker.tick() => check().await,
            }
        }

        tracing::debug!("Occupancy poll stopped");
    });

    PollHandle { token }
}
