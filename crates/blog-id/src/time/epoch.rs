use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{Error, Result};

/// The zero point for the timestamp field of every ID.
///
/// Stored as milliseconds since the Unix epoch. An epoch is fixed for the
/// lifetime of a deployment: changing it reinterprets the creation time of
/// every ID already issued.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch {
    unix_millis: u64,
}

impl Epoch {
    /// Wednesday, January 1, 2025 00:00:00 UTC.
    pub const BLOG: Self = Self::from_unix_millis(1_735_689_600_000);

    /// Thursday, January 1, 1970 00:00:00 UTC.
    pub const UNIX: Self = Self::from_unix_millis(0);

    pub const fn from_unix_millis(unix_millis: u64) -> Self {
        Self { unix_millis }
    }

    pub const fn as_unix_millis(&self) -> u64 {
        self.unix_millis
    }

    /// Builds an epoch from a duration since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEpoch`] if the duration does not fit in `u64`
    /// milliseconds.
    pub fn from_duration(since_unix: Duration) -> Result<Self> {
        u64::try_from(since_unix.as_millis())
            .map(Self::from_unix_millis)
            .map_err(|_| Error::InvalidEpoch)
    }

    /// Builds an epoch from an absolute point in time.
    ///
    /// Sub-millisecond precision is truncated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEpoch`] if `time` is before 1970 or too far in
    /// the future to express in `u64` milliseconds.
    pub fn from_system_time(time: SystemTime) -> Result<Self> {
        let since_unix = time
            .duration_since(UNIX_EPOCH)
            .map_err(|_| Error::InvalidEpoch)?;
        Self::from_duration(since_unix)
    }

    /// Milliseconds elapsed between this epoch and `now_unix_ms`, or `None`
    /// if `now_unix_ms` is earlier.
    pub const fn elapsed_at(&self, now_unix_ms: u64) -> Option<u64> {
        now_unix_ms.checked_sub(self.unix_millis)
    }

    /// Converts a timestamp field back into an absolute time.
    pub fn to_system_time(&self, timestamp_ms: u64) -> SystemTime {
        UNIX_EPOCH
            + Duration::from_millis(self.unix_millis)
            + Duration::from_millis(timestamp_ms)
    }
}

impl Default for Epoch {
    fn default() -> Self {
        Self::BLOG
    }
}

impl From<Epoch> for SystemTime {
    fn from(epoch: Epoch) -> Self {
        epoch.to_system_time(0)
    }
}

impl TryFrom<SystemTime> for Epoch {
    type Error = Error;

    fn try_from(time: SystemTime) -> Result<Self> {
        Self::from_system_time(time)
    }
}
