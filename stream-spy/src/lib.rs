#![cfg_attr(docsrs, feature(doc_cfg))]
//! # stream-spy
//!
//! Record a push-based stream and assert on what it did.
//!
//! `stream-spy` subscribes a recording observer to a source and hands back an
//! [`ObserverSpy`]: every emitted value in order, the terminal outcome
//! (completed or failed with a payload), and two awaitable signals for the
//! moment the source terminates. Tests stop hand-writing observers.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use stream_spy::{Observable, observe};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> stream_spy::Result {
//!     let spy = observe(Observable::<&str, String>::of(["a", "b"]));
//!
//!     spy.wait_for_complete()
//!         .within(Duration::from_secs(1))
//!         .await?;
//!
//!     assert_eq!(spy.values(), vec!["a", "b"]);
//!     assert!(spy.is_complete());
//!     assert_eq!(spy.error(), None);
//!     Ok(())
//! }
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`observe`] | Subscribes a recorder to a source and returns the spy |
//! | [`ObserverSpy`] | Inspection handle: values, terminal state, error, waits |
//! | [`Wait`] | Awaitable terminal signal, optionally bounded with `within()` |
//! | [`Outcome`] | Terminal state: `Active`, `Completed` or `Failed(E)` |
//! | [`Source`] | Anything that can be subscribed to |
//! | [`Observable`] | Ready-made source from a producer, values, or a `Stream` |
//! | [`Observer`] | Receives `next`, `error` and `complete` signals |
//! | [`Subscriber`] | Handle a source pushes signals through |
//! | [`Subscription`] | Cancels a subscription and runs its [`Teardown`] |
//! | [`Config`] | Spy settings, e.g. a default wait timeout |
//!
//! ## Deferred Sources
//!
//! [`Observable::from_stream`] drives any `futures` stream of `Result`s on the
//! Tokio runtime, which pairs well with paused time in tests:
//!
//! ```rust
//! use std::time::Duration;
//! use futures_util::stream;
//! use stream_spy::{Observable, observe};
//!
//! #[tokio::main(flavor = "current_thread", start_paused = true)]
//! async fn main() -> stream_spy::Result {
//!     let source = Observable::<u32, String>::from_stream(|| {
//!         stream::once(async {
//!             tokio::time::sleep(Duration::from_millis(100)).await;
//!             Err("late failure".to_string())
//!         })
//!     });
//!     let spy = observe(source);
//!
//!     spy.wait_for_error().await?;
//!     assert_eq!(spy.error().as_deref(), Some("late failure"));
//!     Ok(())
//! }
//! ```
//!
//! ## Cancellation
//!
//! [`ObserverSpy::unsubscribe`] stops recording and runs the source's
//! teardown once. A wait still pending at that point resolves with
//! [`Error::Unsubscribed`] rather than hanging.
//!
//! ## Features
//!
//! - **`serde`** - `Serialize`/`Deserialize` for [`Config`] and [`Outcome`]

mod config;
mod error;
mod observable;
mod observer;
mod outcome;
mod session;
mod signal;
mod source;
mod spy;
mod subscriber;
mod subscription;
mod wait;

pub use config::Config;
pub use error::Error;
pub use observable::Observable;
pub use observer::Observer;
pub use outcome::Outcome;
pub use source::Source;
pub use spy::{ObserverSpy, observe, observe_with};
pub use subscriber::Subscriber;
pub use subscription::{Subscription, Teardown};
pub use wait::Wait;

/// Convenience alias for `Result<T, stream_spy::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;
