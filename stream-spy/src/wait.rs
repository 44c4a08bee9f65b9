use std::{
    fmt,
    future::{Future, IntoFuture},
    pin::Pin,
    time::Duration,
};

use tokio::select;
use tokio_util::sync::CancellationToken;

use crate::{Error, Result, signal::Signal};

/// An awaitable terminal signal.
///
/// Created by [`ObserverSpy::wait_for_complete`](crate::ObserverSpy::wait_for_complete)
/// and [`ObserverSpy::wait_for_error`](crate::ObserverSpy::wait_for_error).
/// Resolves to:
///
/// - `Ok(())` once the awaited signal has fired (immediately if it already did)
/// - [`Error::Unsubscribed`] if the subscription is cancelled before it fires
/// - [`Error::Timeout`] if a bound set by [`within`](Self::within) or
///   [`Config::with_wait_timeout`](crate::Config::with_wait_timeout) elapses
///
/// Without a bound, waiting for a signal that never fires (e.g. completion of
/// a source that failed) never resolves.
///
/// # Example
///
/// ```ignore
/// spy.wait_for_complete().await?;
///
/// // With a custom timeout
/// spy.wait_for_error().within(Duration::from_secs(3)).await?;
/// ```
#[must_use = "a Wait does nothing unless awaited"]
pub struct Wait {
    signal: Signal,
    unsubscribed: CancellationToken,
    timeout: Option<Duration>,
    kind: &'static str,
}

impl Wait {
    pub(crate) fn new(
        signal: Signal,
        unsubscribed: CancellationToken,
        timeout: Option<Duration>,
        kind: &'static str,
    ) -> Self {
        Self {
            signal,
            unsubscribed,
            timeout,
            kind,
        }
    }

    /// Give up with [`Error::Timeout`] after `timeout`.
    pub fn within(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn run(self) -> Result {
        let Some(timeout) = self.timeout else {
            return self.settled().await;
        };
        match tokio::time::timeout(timeout, self.settled()).await {
            Ok(res) => res,
            Err(_) => {
                tracing::debug!(signal = self.kind, ?timeout, "wait timed out");
                Err(Error::Timeout(timeout))
            }
        }
    }

    async fn settled(&self) -> Result {
        select! {
            biased;
            _ = self.signal.fired() => Ok(()),
            _ = self.unsubscribed.cancelled() => {
                // A signal that fired before the cancellation still counts.
                if self.signal.is_fired() {
                    Ok(())
                } else {
                    tracing::debug!(signal = self.kind, "wait cancelled by unsubscribe");
                    Err(Error::Unsubscribed)
                }
            }
        }
    }
}

impl IntoFuture for Wait {
    type Output = Result;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.run())
    }
}

impl fmt::Debug for Wait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wait")
            .field("signal", &self.kind)
            .field("fired", &self.signal.is_fired())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
