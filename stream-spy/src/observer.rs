/// Receives the signals a [`Source`](crate::Source) pushes.
///
/// All methods have default no-op implementations, so you only need to
/// override the ones you care about.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use stream_spy::Observer;
///
/// #[derive(Default)]
/// struct Counter(AtomicUsize);
///
/// impl Observer<u32, String> for Counter {
///     fn on_next(&self, _value: u32) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
///
/// # Signal Contract
///
/// For a single subscription the callbacks are never invoked concurrently.
/// Any number of `on_next` calls may be followed by at most one terminal
/// call, either `on_error` or `on_complete`. [`Subscriber`](crate::Subscriber)
/// enforces this before a signal reaches the observer.
pub trait Observer<T, E>: Send + Sync {
    /// Called for every value the source emits, in emission order.
    fn on_next(&self, value: T) {
        let _v = value;
    }

    /// Called once when the source fails. No signal follows.
    fn on_error(&self, error: E) {
        let _e = error;
    }

    /// Called once when the source completes. No signal follows.
    fn on_complete(&self) {}
}
