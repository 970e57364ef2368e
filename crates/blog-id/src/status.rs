use crate::SnowflakeId;

/// Outcome of a single non-blocking generation attempt.
///
/// Returned by [`SnowflakeGenerator::try_poll_id`]:
///
/// - [`Poll::Ready`] carries a freshly minted ID.
/// - [`Poll::Pending`] means no ID can be issued right now. Either the
///   sequence for the current millisecond is exhausted, or (for the atomic
///   generator) another thread won the race. Back off for `yield_for`
///   milliseconds and try again; `0` means retry immediately.
///
/// # Example
///
/// ```
/// use blog_id::{
///     AtomicSnowflakeGenerator, BlogId, Epoch, ManualClock, Poll, SnowflakeGenerator,
/// };
///
/// let clock = ManualClock::at(Epoch::BLOG, 1);
/// let generator: AtomicSnowflakeGenerator<BlogId, _> =
///     AtomicSnowflakeGenerator::new(3, Epoch::BLOG, clock).unwrap();
///
/// match generator.try_poll_id().unwrap() {
///     Poll::Ready { id } => assert_eq!(id.machine_id(), 3),
///     Poll::Pending { yield_for } => println!("back off for {yield_for}ms"),
/// }
/// ```
///
/// [`SnowflakeGenerator::try_poll_id`]: crate::SnowflakeGenerator::try_poll_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll<ID: SnowflakeId> {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: ID,
    },
    /// No ID could be generated on this attempt.
    Pending {
        /// Milliseconds to wait before trying again.
        yield_for: u64,
    },
}

impl<ID: SnowflakeId> Poll<ID> {
    /// Returns the ID if one was produced.
    pub fn ready(self) -> Option<ID> {
        match self {
            Self::Ready { id } => Some(id),
            Self::Pending { .. } => None,
        }
    }

    /// Returns true if the attempt must be retried.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}
