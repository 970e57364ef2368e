use std::sync::Arc;

use portable_atomic::{AtomicU64, Ordering};

use crate::{Epoch, TimeSource};

/// A clock that only moves when told to.
///
/// Clones share the same reading, so a test can hand one clone to a generator
/// and keep another to step time forward or backward.
///
/// # Example
///
/// ```
/// use blog_id::{Epoch, ManualClock, TimeSource};
///
/// let clock = ManualClock::at(Epoch::BLOG, 5_000);
/// let handle = clock.clone();
/// handle.advance(1);
/// assert_eq!(clock.current_millis(), Epoch::BLOG.as_unix_millis() + 5_001);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock frozen at `unix_millis`.
    pub fn new(unix_millis: u64) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(unix_millis)),
        }
    }

    /// Creates a clock frozen `offset_ms` after `epoch`.
    pub fn at(epoch: Epoch, offset_ms: u64) -> Self {
        Self::new(epoch.as_unix_millis() + offset_ms)
    }

    pub fn set(&self, unix_millis: u64) {
        self.millis.store(unix_millis, Ordering::Release);
    }

    pub fn advance(&self, ms: u64) {
        self.millis.fetch_add(ms, Ordering::AcqRel);
    }

    /// Steps the clock backward, saturating at zero.
    pub fn rewind(&self, ms: u64) {
        let _ = self
            .millis
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |now| {
                Some(now.saturating_sub(ms))
            });
    }
}

impl TimeSource for ManualClock {
    fn current_millis(&self) -> u64 {
        self.millis.load(Ordering::Acquire)
    }
}
