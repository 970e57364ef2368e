use std::sync::Arc;

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// Generators never read the system clock directly; they ask their injected
/// `TimeSource`. Plug in [`SystemClock`] or [`MonotonicClock`] in production
/// and a [`ManualClock`] (or any mock) in tests.
///
/// # Example
///
/// ```
/// use blog_id::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_735_689_605_000
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1_735_689_605_000);
/// ```
///
/// [`SystemClock`]: crate::SystemClock
/// [`MonotonicClock`]: crate::MonotonicClock
/// [`ManualClock`]: crate::ManualClock
pub trait TimeSource {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
