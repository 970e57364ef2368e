#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Epoch, Poll, Result, SnowflakeGenerator, SnowflakeId, TimeSource,
    generator::{
        mutex::Mutex,
        state::{elapsed_millis, next_state, validate_config},
    },
};

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The last issued ID lives behind a [`Mutex`], and the clock is read inside
/// the critical section. Two callers therefore can never observe the same
/// `(timestamp, sequence)` pair, and a caller can never see a clock reading
/// older than an ID another thread already issued unless the clock really
/// moved backward.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Fair access across threads
/// - ✅ Works on targets without 64-bit atomics
///
/// ## See Also
/// - [`AtomicSnowflakeGenerator`]
///
/// [`Mutex`]: std::sync::Mutex
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
///
/// # Example
/// ```
/// use blog_id::{BlogId, Epoch, LockSnowflakeGenerator, SnowflakeGenerator, SystemClock};
///
/// let generator: LockSnowflakeGenerator<BlogId, _> =
///     LockSnowflakeGenerator::new(1, Epoch::BLOG, SystemClock).unwrap();
///
/// let id = generator.next_id().unwrap();
/// assert_eq!(generator.decode_id(id.to_raw()).machine_id, 1);
/// ```
pub struct LockSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<Option<ID>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<Option<ID>>,
    machine_id: u64,
    epoch: Epoch,
    time: T,
}

impl<ID, T> LockSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    /// Creates a new [`LockSnowflakeGenerator`].
    ///
    /// # Parameters
    ///
    /// - `machine_id`: A unique identifier for the node or process generating
    ///   IDs. It is encoded into every generated ID.
    /// - `epoch`: The zero point of the timestamp field.
    /// - `time`: The [`TimeSource`] consulted on every call.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidMachineId`] if `machine_id` does not fit the layout
    /// - [`Error::EpochInFuture`] if `epoch` is after `time`'s current reading
    ///
    /// [`Error::InvalidMachineId`]: crate::Error::InvalidMachineId
    /// [`Error::EpochInFuture`]: crate::Error::EpochInFuture
    pub fn new(machine_id: u64, epoch: Epoch, time: T) -> Result<Self> {
        validate_config::<ID>(machine_id, epoch, &time)?;
        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(None)),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(None),
            machine_id,
            epoch,
            time,
        })
    }

    /// Attempts to generate the next available ID.
    ///
    /// # Returns
    /// - `Ok(Poll::Ready { id })`: a new ID is available
    /// - `Ok(Poll::Pending { yield_for })`: the sequence for this millisecond
    ///   is exhausted; retry after `yield_for` milliseconds
    /// - `Err(e)`: the clock is unusable or the lock was poisoned
    ///
    /// # Errors
    /// See [`SnowflakeGenerator::try_poll_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<Poll<ID>> {
        let mut last = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        let now = elapsed_millis::<ID>(self.epoch, self.time.current_millis())?;
        let status = next_state(*last, self.machine_id, now)?;
        if let Poll::Ready { id } = status {
            *last = Some(id);
        }
        Ok(status)
    }
}

impl<ID, T> SnowflakeGenerator<ID, T> for LockSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    fn new(machine_id: u64, epoch: Epoch, time: T) -> Result<Self> {
        Self::new(machine_id, epoch, time)
    }

    fn machine_id(&self) -> u64 {
        self.machine_id
    }

    fn epoch(&self) -> Epoch {
        self.epoch
    }

    fn try_poll_id(&self) -> Result<Poll<ID>> {
        self.try_poll_id()
    }
}
