use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// The operating system's wall clock.
///
/// Every call is a `SystemTime::now()` syscall. The wall clock can be stepped
/// backward by NTP or an operator; generators report that as
/// [`Error::ClockRegression`](crate::Error::ClockRegression). Prefer
/// [`MonotonicClock`](crate::MonotonicClock) when IDs are minted at a high
/// rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        // A clock set before 1970 reads as 0 and is rejected by the
        // generator as being before its epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}
