use std::{
    fmt,
    sync::{Arc, atomic::Ordering},
};

use crate::{Observer, subscription::Lifecycle};

/// The handle a [`Source`](crate::Source) pushes signals through.
///
/// A subscriber forwards signals to its [`Observer`] until it is closed.
/// It closes on the first terminal signal (`error` or `complete`) or when
/// the matching [`Subscription`](crate::Subscription) is cancelled; every
/// signal after that is dropped. Signals may be pushed from any thread, but
/// not concurrently with each other. Long-running producers should poll
/// [`is_closed`](Self::is_closed) or await [`closed`](Self::closed) to stop
/// early.
///
/// Cheap to clone: all clones share one observer and one lifecycle.
pub struct Subscriber<T, E> {
    observer: Arc<dyn Observer<T, E>>,
    lifecycle: Arc<Lifecycle>,
}

impl<T, E> Clone for Subscriber<T, E> {
    fn clone(&self) -> Self {
        Self {
            observer: self.observer.clone(),
            lifecycle: self.lifecycle.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Subscriber<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl<T, E> Subscriber<T, E> {
    pub(crate) fn new(observer: Arc<dyn Observer<T, E>>) -> Self {
        Self {
            observer,
            lifecycle: Arc::new(Lifecycle::default()),
        }
    }

    pub(crate) fn lifecycle(&self) -> Arc<Lifecycle> {
        self.lifecycle.clone()
    }

    /// Push a value.
    pub fn next(&self, value: T) {
        let _gate = self.lifecycle.deliver();
        if self.is_closed() {
            tracing::debug!("value dropped, subscriber is closed");
            return;
        }
        self.observer.on_next(value);
    }

    /// Fail the source. Closes the subscriber and runs the source's teardown.
    pub fn error(&self, error: E) {
        {
            let _gate = self.lifecycle.deliver();
            if !self.try_terminate() {
                tracing::debug!("error dropped, subscriber is closed");
                return;
            }
            self.observer.on_error(error);
            self.lifecycle.closed.cancel();
        }
        self.lifecycle.release();
    }

    /// Complete the source. Closes the subscriber and runs the source's teardown.
    pub fn complete(&self) {
        {
            let _gate = self.lifecycle.deliver();
            if !self.try_terminate() {
                tracing::debug!("completion dropped, subscriber is closed");
                return;
            }
            self.observer.on_complete();
            self.lifecycle.closed.cancel();
        }
        self.lifecycle.release();
    }

    /// Returns true once no further signal will reach the observer.
    pub fn is_closed(&self) -> bool {
        self.lifecycle.closed.is_cancelled() || self.lifecycle.terminated.load(Ordering::Acquire)
    }

    /// Resolves when the subscriber closes.
    pub async fn closed(&self) {
        self.lifecycle.closed.cancelled().await
    }

    /// Claims the single terminal slot. The token is cancelled only after the
    /// observer has seen the terminal signal, so waiters woken by it always
    /// observe the final state.
    fn try_terminate(&self) -> bool {
        !self.lifecycle.closed.is_cancelled()
            && !self.lifecycle.terminated.swap(true, Ordering::AcqRel)
    }
}
