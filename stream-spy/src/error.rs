use std::time::Duration;

/// The single error type for stream-spy operations.
///
/// Source failures are never reported through this type: they are payloads
/// owned by the source and surface through
/// [`ObserverSpy::error`](crate::ObserverSpy::error). `Error` only describes
/// why waiting for a terminal signal gave up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Subscription was cancelled before the awaited signal fired")]
    Unsubscribed,

    #[error("Awaited signal did not fire within {0:?}")]
    Timeout(Duration),
}
