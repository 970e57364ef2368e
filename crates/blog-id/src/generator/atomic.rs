use core::marker::PhantomData;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Epoch, Poll, Result, SnowflakeGenerator, SnowflakeId, TimeSource,
    generator::state::{elapsed_millis, next_state, validate_config},
};

/// Marks a generator that has not issued an ID yet. Sets the reserved bits,
/// so no valid ID can collide with it.
const UNSET: u64 = u64::MAX;

/// A lock-free Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The last issued ID is stored in an [`AtomicU64`] and advanced with a
/// compare-and-swap. A caller that loses the race gets
/// [`Poll::Pending`] with `yield_for == 0` and retries immediately.
///
/// ## Features
/// - ✅ Thread-safe
/// - ❌ Fair access (fast threads can starve slow ones under contention)
///
/// ## Caveats
/// The layout must reserve at least one high bit; the generator uses an
/// all-ones value to mark "nothing issued yet". This is enforced at compile
/// time.
///
/// ## See Also
/// - [`LockSnowflakeGenerator`]
///
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
///
/// # Example
/// ```
/// use blog_id::{
///     AtomicSnowflakeGenerator, BlogId, Epoch, MonotonicClock, SnowflakeGenerator,
/// };
///
/// let generator: AtomicSnowflakeGenerator<BlogId, _> =
///     AtomicSnowflakeGenerator::new(7, Epoch::BLOG, MonotonicClock::new()).unwrap();
///
/// let first = generator.next_id().unwrap();
/// let second = generator.next_id().unwrap();
/// assert!(first < second);
/// ```
pub struct AtomicSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    machine_id: u64,
    epoch: Epoch,
    time: T,
    _id: PhantomData<ID>,
}

impl<ID, T> AtomicSnowflakeGenerator<ID, T>
where
    ID: SnowflakeId,
    T: TimeSource,
{
    /// Creates a new [`AtomicSnowflakeGenerator`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidMachineId`] if `machine_id` does not fit the layout
    /// - [`Error::EpochInFuture`] if `epoch` is after `time`'s current reading
    ///
    /// [`Error::InvalidMachineId`]: crate::Error::InvalidMachineId
    /// [`Error::EpochInFuture`]: crate::Error::EpochInFuture
    pub fn new(machine_id: u64, epoch: Epoch, time: T) -> Result<Self> {
        const {
            assert!(
                ID::RESERVED_BITS > 0,
                "AtomicSnowflakeGenerator needs a layout with a reserved bit"
            );
        }
        validate_config::<ID>(machine_id, epoch, &time)?;
        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(UNSET)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(UNSET),
            machine_id,
            epoch,
            time,
            _id: PhantomData,
        })
    }

    /// Attempts to generate the next available ID.
    ///
    /// # Returns
    /// - `Ok(Poll::Ready { id })`: a new ID is available
    /// - `Ok(Poll::Pending { yield_for })`: the sequence is exhausted
    ///   (`yield_for == 1`) or another thread won the race (`yield_for == 0`)
    /// - `Err(e)`: the clock is unusable
    ///
    /// # Errors
    /// See [`SnowflakeGenerator::try_poll_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<Poll<ID>> {
        // Load before reading the clock: any ID we observe was minted from a
        // reading that happened earlier than ours.
        let current_raw = self.state.load(Ordering::Acquire);
        let now = elapsed_millis::<ID>(self.epoch, self.time.current_millis())?;

        let last = (current_raw != UNSET).then(|| ID::from_raw(current_raw));
        let next_id = match next_state(last, self.machine_id, now)? {
            Poll::Ready { id } => id,
            pending @ Poll::Pending { .. } => return Ok(pending),
        };

        if self
            .state
            .compare_exchange(
                current_raw,
                next_id.to_raw(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
        {
            Ok(Poll::Ready { id: next_id })
        } else {
            Ok(Poll::Pending { yield_for: 0 })
        }
    }
}

impl<ID, T> SnowflakeGenerator<ID, T> for AtomicSnowflakeGenerator<ID, T>
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
