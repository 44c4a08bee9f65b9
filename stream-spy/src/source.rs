use std::sync::Arc;

use crate::{Observer, Subscriber, Subscription, Teardown};

/// A push-based producer of values that terminates at most once.
///
/// Implement [`attach`](Self::attach) to start producing into a
/// [`Subscriber`]; callers use [`subscribe`](Self::subscribe), which wires
/// the observer, attaches, and hands back the [`Subscription`].
///
/// `attach` may push signals synchronously before it returns, schedule them
/// for later (e.g. from a spawned task), or both. The returned [`Teardown`]
/// runs once, when the source terminates or the subscription is cancelled.
///
/// # Example
///
/// ```rust
/// use stream_spy::{Source, Subscriber, Teardown};
///
/// struct Countdown(u32);
///
/// impl Source for Countdown {
///     type Item = u32;
///     type Error = std::convert::Infallible;
///
///     fn attach(&self, subscriber: Subscriber<u32, Self::Error>) -> Teardown {
///         for n in (1..=self.0).rev() {
///             subscriber.next(n);
///         }
///         subscriber.complete();
///         Teardown::none()
///     }
/// }
/// ```
pub trait Source {
    type Item: Send + 'static;
    type Error: Send + 'static;

    /// Start producing into `subscriber`.
    fn attach(&self, subscriber: Subscriber<Self::Item, Self::Error>) -> Teardown;

    /// Subscribe `observer` and return the handle that cancels it.
    fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: Observer<Self::Item, Self::Error> + 'static,
    {
        let subscriber = Subscriber::new(Arc::new(observer));
        let lifecycle = subscriber.lifecycle();
        tracing::trace!(source = std::any::type_name::<Self>(), "subscribing");
        let teardown = self.attach(subscriber);
        Subscription::new(lifecycle, teardown)
    }
}

impl<S: Source + ?Sized> Source for &S {
    type Item = S::Item;
    type Error = S::Error;

    fn attach(&self, subscriber: Subscriber<Self::Item, Self::Error>) -> Teardown {
        (**self).attach(subscriber)
    }
}

impl<S: Source + ?Sized> Source for Arc<S> {
    type Item = S::Item;
    type Error = S::Error;

    fn attach(&self, subscriber: Subscriber<Self::Item, Self::Error>) -> Teardown {
        (**self).attach(subscriber)
    }
}
