/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors `blog-id` can produce.
///
/// Variants fall into three groups:
///
/// - **configuration** errors are raised while constructing a generator and
///   are fatal: the process should refuse to start.
/// - **clock** errors mean the injected [`TimeSource`] reported a time the ID
///   layout cannot represent.
/// - [`Error::ClockRegression`] means the clock moved backward after an ID was
///   issued. Callers should log it and refuse to mint rather than guess.
///
/// Sequence exhaustion is not an error. It surfaces as
/// [`Poll::Pending`](crate::Poll::Pending) and is waited out.
///
/// [`TimeSource`]: crate::TimeSource
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The machine ID does not fit the layout's machine ID field.
    #[error("machine id {machine_id} is out of range (max = {max})")]
    InvalidMachineId { machine_id: u64, max: u64 },

    /// The custom epoch lies after the clock's current time.
    #[error("custom epoch {epoch_ms}ms is in the future (now = {now_ms}ms)")]
    EpochInFuture { epoch_ms: u64, now_ms: u64 },

    /// The custom epoch cannot be expressed as milliseconds since the Unix
    /// epoch.
    #[error("custom epoch is not representable as milliseconds since 1970-01-01")]
    InvalidEpoch,

    /// The clock reports a time earlier than the custom epoch.
    #[error("clock reads {now_ms}ms, which is before the custom epoch {epoch_ms}ms")]
    ClockBeforeEpoch { now_ms: u64, epoch_ms: u64 },

    /// The elapsed time no longer fits the timestamp field.
    #[error("elapsed time {elapsed_ms}ms exceeds the timestamp field (max = {max})")]
    TimestampOverflow { elapsed_ms: u64, max: u64 },

    /// The clock moved backward relative to the last issued ID.
    #[error("clock moved backward: last issued at {last_ms}ms, now {now_ms}ms")]
    ClockRegression { last_ms: u64, now_ms: u64 },

    /// A thread panicked while holding the generator lock.
    ///
    /// Never produced with the `parking-lot` feature, whose mutexes do not
    /// poison.
    #[error("generator lock poisoned")]
    LockPoisoned,

    /// A raw value has bits set outside the ID layout.
    #[error("value {raw:#x} sets reserved bits")]
    ReservedBitsSet { raw: u64 },
}

impl Error {
    /// Returns true for errors raised while constructing a generator.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidMachineId { .. } | Self::EpochInFuture { .. } | Self::InvalidEpoch
        )
    }

    /// Returns true when the clock reading cannot be encoded at all.
    pub fn is_clock(&self) -> bool {
        matches!(
            self,
            Self::ClockBeforeEpoch { .. } | Self::TimestampOverflow { .. }
        )
    }

    /// Returns true when the clock moved backward between two calls.
    pub fn is_clock_regression(&self) -> bool {
        matches!(self, Self::ClockRegression { .. })
    }
}

#[cfg(not(feature = "parking-lot"))]
use std::sync::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_groups_are_disjoint() {
        let config = Error::InvalidMachineId {
            machine_id: 2048,
            max: 1023,
        };
        let clock = Error::ClockBeforeEpoch {
            now_ms: 0,
            epoch_ms: 1,
        };
        let regression = Error::ClockRegression {
            last_ms: 10,
            now_ms: 9,
        };

        assert!(config.is_configuration() && !config.is_clock());
        assert!(clock.is_clock() && !clock.is_clock_regression());
        assert!(regression.is_clock_regression() && !regression.is_configuration());
    }

    #[test]
    fn display_names_the_offending_values() {
        let err = Error::ClockRegression {
            last_ms: 5000,
            now_ms: 4999,
        };
        assert_eq!(
            err.to_string(),
            "clock moved backward: last issued at 5000ms, now 4999ms"
        );
    }
}
