use std::{
    fmt,
    sync::{
        Arc, Mutex, PoisonError, RwLock, RwLockReadGuard,
        atomic::{AtomicBool, Ordering},
    },
};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// State shared between a [`Subscriber`](crate::Subscriber) and the
/// [`Subscription`] controlling it.
#[derive(Debug, Default)]
pub(crate) struct Lifecycle {
    /// Held shared while a signal is checked and delivered, exclusively
    /// while unsubscribing. No signal reaches the observer after
    /// `unsubscribe` returns.
    gate: RwLock<()>,
    /// Set by the first terminal signal.
    pub(crate) terminated: AtomicBool,
    /// Cancelled on the first terminal signal or on unsubscribe.
    pub(crate) closed: CancellationToken,
    /// Cancelled on unsubscribe only.
    pub(crate) unsubscribed: CancellationToken,
    teardown: Mutex<Option<Teardown>>,
}

impl Lifecycle {
    pub(crate) fn deliver(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store the source's teardown. Runs it right away if the subscriber
    /// already closed while the source was being attached.
    fn install(&self, teardown: Teardown) {
        *self.teardown.lock().unwrap_or_else(PoisonError::into_inner) = Some(teardown);
        if self.closed.is_cancelled() {
            self.release();
        }
    }

    /// Run the teardown if nobody has yet. Must be called without the gate held.
    pub(crate) fn release(&self) {
        let teardown = self
            .teardown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(teardown) = teardown {
            teardown.run();
        }
    }
}

/// Cleanup registered by a source when it is subscribed to.
///
/// Runs exactly once: when the source terminates or when the owning
/// [`Subscription`] is cancelled, whichever happens first.
///
/// ```rust
/// use stream_spy::Teardown;
///
/// let noop = Teardown::none();
/// let logged = Teardown::new(|| println!("released"));
/// ```
#[derive(Default)]
pub struct Teardown(Option<Box<dyn FnOnce() + Send>>);

impl Teardown {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self(Some(Box::new(f)))
    }

    /// A teardown with nothing to release.
    pub fn none() -> Self {
        Self(None)
    }

    fn run(self) {
        if let Some(f) = self.0 {
            f();
        }
    }
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Teardown")
            .field(&self.0.as_ref().map(|_| "FnOnce"))
            .finish()
    }
}

/// Aborts the producing task.
impl<R: Send + 'static> From<JoinHandle<R>> for Teardown {
    fn from(handle: JoinHandle<R>) -> Self {
        Teardown::new(move || handle.abort())
    }
}

/// Cancellation control for one subscription to a [`Source`](crate::Source).
///
/// Calling [`unsubscribe`](Self::unsubscribe) closes the subscriber and runs
/// the source's [`Teardown`] unless the source already terminated. Once
/// `unsubscribe` returns, no signal reaches the observer, even one a source
/// was pushing from another thread at that moment. Further calls are no-ops.
///
/// Do not call `unsubscribe` from inside an [`Observer`](crate::Observer)
/// callback of the same subscription: the call waits for in-flight signals
/// and would wait on itself.
pub struct Subscription {
    lifecycle: Arc<Lifecycle>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .field("unsubscribed", &self.is_unsubscribed())
            .finish_non_exhaustive()
    }
}

impl Subscription {
    pub(crate) fn new(lifecycle: Arc<Lifecycle>, teardown: Teardown) -> Self {
        lifecycle.install(teardown);
        Self { lifecycle }
    }

    /// Stop receiving signals and release the source's resources.
    pub fn unsubscribe(&self) {
        {
            let _gate = self
                .lifecycle
                .gate
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if self.lifecycle.unsubscribed.is_cancelled() {
                return;
            }
            tracing::debug!(
                terminated = self.lifecycle.terminated.load(Ordering::Acquire),
                "unsubscribing"
            );
            self.lifecycle.unsubscribed.cancel();
            self.lifecycle.closed.cancel();
        }
        self.lifecycle.release();
    }

    /// Returns true once the source terminated or the subscription was cancelled.
    pub fn is_closed(&self) -> bool {
        self.lifecycle.closed.is_cancelled()
    }

    /// Returns true once [`unsubscribe`](Self::unsubscribe) has been called.
    pub fn is_unsubscribed(&self) -> bool {
        self.lifecycle.unsubscribed.is_cancelled()
    }

    pub(crate) fn unsubscribed_token(&self) -> CancellationToken {
        self.lifecycle.unsubscribed.clone()
    }
}
