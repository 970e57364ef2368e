use core::time::Duration;
use std::{
    sync::{Arc, OnceLock},
    thread::{self, JoinHandle},
    time::Instant,
};

use portable_atomic::{AtomicU64, Ordering};

use crate::{SystemClock, TimeSource};

/// Shared ticker thread that updates every millisecond.
#[derive(Debug)]
struct SharedTickerInner {
    current: AtomicU64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A wall-clock-aligned time source that never moves backward.
///
/// The wall clock is sampled once at construction. From then on a background
/// thread measures elapsed time with [`Instant`] and publishes it once per
/// millisecond, so NTP steps or manual clock changes after startup cannot
/// produce a regression. Reads are a single atomic load.
///
/// Clones share one ticker thread. The thread exits once the last clone is
/// dropped.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use blog_id::{MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::new();
/// let before = clock.current_millis();
/// std::thread::sleep(Duration::from_millis(5));
///
/// // The ticker may lag by a tick, but never goes backward.
/// assert!(clock.current_millis() >= before);
/// ```
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    inner: Arc<SharedTickerInner>,
    start_unix_ms: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Starts a ticker aligned to the current wall-clock time.
    pub fn new() -> Self {
        Self::starting_at(SystemClock.current_millis())
    }

    /// Starts a ticker whose first reading is `start_unix_ms`.
    pub fn starting_at(start_unix_ms: u64) -> Self {
        let start = Instant::now();

        let inner = Arc::new(SharedTickerInner {
            current: AtomicU64::new(0),
            _handle: OnceLock::new(),
        });

        let weak_inner = Arc::downgrade(&inner);
        let handle = thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(inner_ref) = weak_inner.upgrade() else {
                    break;
                };

                // Absolute target time of the next tick
                let target = start + Duration::from_millis(tick);

                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                inner_ref.current.store(now_ms, Ordering::Relaxed);

                // Align to the next tick after the actual time
                tick = now_ms + 1;
            }
        });

        // Freshly created above, so the cell is always empty.
        let _ = inner._handle.set(handle);

        Self {
            inner,
            start_unix_ms,
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.start_unix_ms + self.inner.current.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_moves_backward() {
        let clock = MonotonicClock::starting_at(1_000);
        let mut last = clock.current_millis();
        assert!(last >= 1_000);

        for _ in 0..10_000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn advances_with_real_time() {
        let clock = MonotonicClock::starting_at(0);
        thread::sleep(Duration::from_millis(20));
        assert!(clock.current_millis() >= 1);
    }
}
