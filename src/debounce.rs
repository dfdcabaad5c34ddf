//! Debouncing for rapidly edited input such as a search box.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Shortest idle interval accepted
pub const MIN_INTERVAL: Duration = Duration::from_millis(300);

/// Lets only the latest of a burst of calls through.
///
/// Each [`Debouncer::settle`] call waits out the interval and then yields its
/// value only if no newer call started in the meantime. Superseded calls
/// resolve to `None` without doing the work; work already under way is not
/// cancelled.
#[derive(Debug)]
pub struct Debouncer {
    interval: Duration,
    latest: AtomicU64,
}

impl Debouncer {
    /// Intervals below [`MIN_INTERVAL`] are raised to it.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            latest: AtomicU64::new(0),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn settle<T>(&self, value: T) -> Option<T> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.interval).await;
        (self.latest.load(Ordering::SeqCst) == ticket).then_some(value)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(MIN_INTERVAL)
    }
}
