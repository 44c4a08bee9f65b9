use std::fmt;

use crate::{Config, Outcome, Source, Subscription, Wait, session::Recorder};

/// Subscribe a recording observer to `source` and return a spy over it.
///
/// The subscription happens before this function returns, so values the
/// source pushes synchronously while being subscribed are captured.
///
/// # Example
///
/// ```rust
/// use stream_spy::{Observable, observe};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> stream_spy::Result {
/// let spy = observe(Observable::<i32, String>::of([1, 2, 3]));
/// spy.wait_for_complete().await?;
///
/// assert_eq!(spy.values(), vec![1, 2, 3]);
/// assert_eq!(spy.last_value(), Some(3));
/// assert!(!spy.is_error());
/// # Ok(())
/// # }
/// ```
pub fn observe<S: Source>(source: S) -> ObserverSpy<S::Item, S::Error> {
    observe_with(source, Config::default())
}

/// Like [`observe`], with explicit [`Config`].
pub fn observe_with<S: Source>(source: S, config: Config) -> ObserverSpy<S::Item, S::Error> {
    let recorder = Recorder::new();
    let subscription = source.subscribe(recorder.clone());
    ObserverSpy {
        recorder,
        subscription,
        config,
    }
}

/// Inspection handle over one observed subscription.
///
/// Provides:
/// - Cancellation via [`subscription`](Self::subscription) / [`unsubscribe`](Self::unsubscribe)
/// - Terminal state via [`is_complete`](Self::is_complete), [`is_error`](Self::is_error), [`outcome`](Self::outcome)
/// - Recorded values via [`values`](Self::values) and the positional accessors
/// - The failure payload via [`error`](Self::error)
/// - Awaitable terminal signals via [`wait_for_complete`](Self::wait_for_complete) / [`wait_for_error`](Self::wait_for_error)
///
/// After cancellation the spy keeps reporting the state captured up to that
/// point.
///
/// # Warning
///
/// The value log is unbounded. The spy is meant for tests, not for
/// observing high-volume production streams.
pub struct ObserverSpy<T, E> {
    recorder: Recorder<T, E>,
    subscription: Subscription,
    config: Config,
}

impl<T, E> fmt::Debug for ObserverSpy<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSpy")
            .field("recorder", &self.recorder)
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

impl<T, E> ObserverSpy<T, E> {
    // ==================== Subscription ====================

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// Cancel the subscription. Shortcut for `subscription().unsubscribe()`.
    pub fn unsubscribe(&self) {
        self.subscription.unsubscribe();
    }

    pub fn is_unsubscribed(&self) -> bool {
        self.subscription.is_unsubscribed()
    }

    // ==================== Terminal State ====================

    /// Returns true once the source completed.
    pub fn is_complete(&self) -> bool {
        self.recorder.is_completed()
    }

    /// Returns true once the source failed.
    pub fn is_error(&self) -> bool {
        self.recorder.is_failed()
    }

    /// Returns true while signals can still arrive: no terminal signal yet
    /// and not unsubscribed.
    pub fn is_active(&self) -> bool {
        self.recorder.is_active() && !self.subscription.is_unsubscribed()
    }

    // ==================== Call Tracking ====================

    /// Number of values the recorder received.
    pub fn next_calls(&self) -> usize {
        self.recorder.calls().next
    }

    /// Number of completion signals the recorder received (0 or 1).
    pub fn complete_calls(&self) -> usize {
        self.recorder.calls().complete
    }

    /// Number of failure signals the recorder received (0 or 1).
    pub fn error_calls(&self) -> usize {
        self.recorder.calls().error
    }

    // ==================== Waiting ====================

    /// Resolves the first time the source completes.
    ///
    /// Never resolves if the source fails instead, unless bounded with
    /// [`Wait::within`] or [`Config::with_wait_timeout`].
    pub fn wait_for_complete(&self) -> Wait {
        Wait::new(
            self.recorder.completed().clone(),
            self.subscription.unsubscribed_token(),
            self.config.wait_timeout(),
            "complete",
        )
    }

    /// Resolves the first time the source fails. Fetch the payload with
    /// [`error`](Self::error).
    ///
    /// Never resolves if the source completes instead, unless bounded with
    /// [`Wait::within`] or [`Config::with_wait_timeout`].
    pub fn wait_for_error(&self) -> Wait {
        Wait::new(
            self.recorder.failed().clone(),
            self.subscription.unsubscribed_token(),
            self.config.wait_timeout(),
            "error",
        )
    }

    // ==================== Values ====================

    /// Number of recorded values.
    pub fn value_count(&self) -> usize {
        self.recorder.len()
    }
}

impl<T: Clone, E> ObserverSpy<T, E> {
    /// Returns a copy of the recorded values in emission order.
    pub fn values(&self) -> Vec<T> {
        self.recorder.values()
    }

    pub fn first_value(&self) -> Option<T> {
        self.recorder.value_at(0)
    }

    pub fn last_value(&self) -> Option<T> {
        self.recorder.last_value()
    }

    /// Returns the value at `index`, or `None` when out of range.
    pub fn value_at(&self, index: usize) -> Option<T> {
        self.recorder.value_at(index)
    }
}

impl<T, E: Clone> ObserverSpy<T, E> {
    /// Returns the failure payload, if the source failed.
    ///
    /// The payload is cloned out of the session. Share it through an `Arc`
    /// to assert on identity.
    pub fn error(&self) -> Option<E> {
        self.recorder.error()
    }

    /// Returns a snapshot of the terminal state.
    pub fn outcome(&self) -> Outcome<E> {
        self.recorder.outcome()
    }
}
