use std::time::SystemTime;

use crate::{DecodedId, Epoch, Poll, Result, SnowflakeId, TimeSource};

/// A thread-safe source of unique, time-ordered Snowflake IDs.
///
/// Construct one generator per process (per machine ID) at the composition
/// root and pass it by reference to whatever mints entities. The generator
/// owns no persisted state; callers store the returned integer as their
/// primary key.
pub trait SnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    /// Creates a new generator.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `machine_id` does not fit the layout
    /// or `epoch` lies after the clock's current time.
    fn new(machine_id: u64, epoch: Epoch, time: T) -> Result<Self>
    where
        Self: Sized;

    /// The machine ID encoded into every ID from this generator.
    fn machine_id(&self) -> u64;

    /// The custom epoch timestamps are measured from.
    fn epoch(&self) -> Epoch;

    /// Attempts to generate the next ID without blocking.
    ///
    /// # Errors
    ///
    /// - clock errors if the clock is before the epoch or past the layout's
    ///   timestamp range
    /// - [`Error::ClockRegression`] if the clock moved backward
    /// - [`Error::LockPoisoned`] if a lock-based generator's mutex is poisoned
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    fn try_poll_id(&self) -> Result<Poll<ID>>;

    /// Generates the next ID, calling `backoff` with the suggested wait (in
    /// milliseconds) every time the generator is pending.
    ///
    /// The wait is bounded by wall-clock time: at most until the clock ticks
    /// over to the next millisecond.
    ///
    /// # Errors
    ///
    /// Propagates every error from [`Self::try_poll_id`]. Pending states are
    /// never surfaced as errors.
    fn next_id_with(&self, mut backoff: impl FnMut(u64)) -> Result<ID> {
        loop {
            match self.try_poll_id()? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { yield_for } => backoff(yield_for),
            }
        }
    }

    /// Generates the next ID, yielding the thread while the sequence for the
    /// current millisecond is exhausted.
    ///
    /// # Errors
    ///
    /// See [`Self::try_poll_id`].
    fn next_id(&self) -> Result<ID> {
        self.next_id_with(|_| std::thread::yield_now())
    }

    /// Unpacks any 64-bit value according to this generator's layout.
    ///
    /// Never fails: out-of-range input decodes to whatever bits it carries.
    fn decode_id(&self, id: u64) -> DecodedId {
        ID::from_raw(id).decode()
    }

    /// Recovers the absolute time an ID was minted at.
    fn timestamp_from_id(&self, id: u64) -> SystemTime {
        self.epoch().to_system_time(ID::from_raw(id).timestamp())
    }
}
