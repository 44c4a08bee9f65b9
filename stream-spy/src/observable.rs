use std::{fmt, pin::pin, sync::Arc};

use futures_util::{Stream, StreamExt};
use tokio::select;

use crate::{Source, Subscriber, Teardown};

type Producer<T, E> = dyn Fn(Subscriber<T, E>) -> Teardown + Send + Sync;

/// A cold [`Source`] backed by a producer function.
///
/// Every subscription runs the producer anew with a fresh [`Subscriber`].
///
/// # Example
///
/// ```rust
/// use stream_spy::{Observable, Teardown, observe};
///
/// let source = Observable::<u8, String>::new(|subscriber| {
///     subscriber.next(1);
///     subscriber.next(2);
///     subscriber.complete();
///     Teardown::none()
/// });
///
/// let spy = observe(&source);
/// assert_eq!(spy.values(), vec![1, 2]);
/// assert!(spy.is_complete());
/// ```
pub struct Observable<T, E> {
    producer: Arc<Producer<T, E>>,
}

impl<T, E> Clone for Observable<T, E> {
    fn clone(&self) -> Self {
        Self {
            producer: self.producer.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Observable<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable").finish_non_exhaustive()
    }
}

impl<T: Send + 'static, E: Send + 'static> Observable<T, E> {
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn(Subscriber<T, E>) -> Teardown + Send + Sync + 'static,
    {
        Self {
            producer: Arc::new(producer),
        }
    }

    /// Emits every value synchronously, then completes.
    pub fn of<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Sync,
    {
        let values: Vec<T> = values.into_iter().collect();
        Self::new(move |subscriber| {
            for value in values.iter().cloned() {
                if subscriber.is_closed() {
                    break;
                }
                subscriber.next(value);
            }
            subscriber.complete();
            Teardown::none()
        })
    }

    /// Completes immediately without emitting.
    pub fn empty() -> Self {
        Self::new(|subscriber| {
            subscriber.complete();
            Teardown::none()
        })
    }

    /// Fails immediately with a clone of `error`.
    pub fn throw_error(error: E) -> Self
    where
        E: Clone + Sync,
    {
        Self::new(move |subscriber| {
            subscriber.error(error.clone());
            Teardown::none()
        })
    }

    /// Drives a stream on the Tokio runtime.
    ///
    /// Each subscription calls `factory` and spawns a task that forwards
    /// `Ok` items as values, fails on the first `Err`, and completes when
    /// the stream ends. The task stops as soon as the subscriber closes and
    /// is aborted by the teardown.
    ///
    /// # Panics
    ///
    /// Subscribing panics when called outside a Tokio runtime.
    pub fn from_stream<F, S>(factory: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = Result<T, E>> + Send + 'static,
    {
        Self::new(move |subscriber| {
            let stream = factory();
            let handle = tokio::spawn(forward(stream, subscriber));
            Teardown::from(handle)
        })
    }
}

async fn forward<T, E, S>(stream: S, subscriber: Subscriber<T, E>)
where
    S: Stream<Item = Result<T, E>>,
{
    let mut stream = pin!(stream);
    loop {
        let item = select! {
            biased;
            _ = subscriber.closed() => return,
            item = stream.next() => item,
        };
        match item {
            Some(Ok(value)) => subscriber.next(value),
            Some(Err(error)) => return subscriber.error(error),
            None => return subscriber.complete(),
        }
    }
}

impl<T: Send + 'static, E: Send + 'static> Source for Observable<T, E> {
    type Item = T;
    type Error = E;

    fn attach(&self, subscriber: Subscriber<T, E>) -> Teardown {
        (self.producer)(subscriber)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use futures_util::stream;
    use tokio_stream::wrappers::IntervalStream;

    use super::*;
    use crate::Observer;

    #[derive(Default)]
    struct Collect {
        values: Mutex<Vec<u32>>,
        error: Mutex<Option<String>>,
        completed: AtomicUsize,
    }

    impl Observer<u32, String> for Arc<Collect> {
        fn on_next(&self, value: u32) {
            self.values.lock().unwrap().push(value);
        }

        fn on_error(&self, error: String) {
            *self.error.lock().unwrap() = Some(error);
        }

        fn on_complete(&self) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn collect() -> Arc<Collect> {
        Arc::new(Collect::default())
    }

    #[test]
    fn of_emits_then_completes() {
        let sink = collect();
        Observable::<u32, String>::of([1, 2, 3]).subscribe(sink.clone());

        assert_eq!(*sink.values.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(sink.completed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn of_is_cold() {
        let source = Observable::<u32, String>::of([4, 5]);
        let first = collect();
        let second = collect();
        source.subscribe(first.clone());
        source.subscribe(second.clone());

        assert_eq!(*first.values.lock().unwrap(), vec![4, 5]);
        assert_eq!(*second.values.lock().unwrap(), vec![4, 5]);
    }

    #[test]
    fn empty_completes_without_values() {
        let sink = collect();
        Observable::<u32, String>::empty().subscribe(sink.clone());

        assert!(sink.values.lock().unwrap().is_empty());
        assert_eq!(sink.completed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn throw_error_fails_immediately() {
        let sink = collect();
        Observable::<u32, String>::throw_error("boom".into()).subscribe(sink.clone());

        assert_eq!(sink.error.lock().unwrap().as_deref(), Some("boom"));
        assert_eq!(sink.completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn from_stream_forwards_items_and_completes() {
        let sink = collect();
        let source = Observable::<u32, String>::from_stream(|| stream::iter([Ok(1), Ok(2)]));
        let subscription = source.subscribe(sink.clone());

        while !subscription.is_closed() {
            tokio::task::yield_now().await;
        }

        assert_eq!(*sink.values.lock().unwrap(), vec![1, 2]);
        assert_eq!(sink.completed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn from_stream_stops_on_first_error() {
        let sink = collect();
        let source = Observable::<u32, String>::from_stream(|| {
            stream::iter([Ok(1), Err("bad".to_string()), Ok(2)])
        });
        let subscription = source.subscribe(sink.clone());

        while !subscription.is_closed() {
            tokio::task::yield_now().await;
        }

        assert_eq!(*sink.values.lock().unwrap(), vec![1]);
        assert_eq!(sink.error.lock().unwrap().as_deref(), Some("bad"));
        assert_eq!(sink.completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unsubscribe_stops_stream_delivery() {
        let sink = collect();
        let source = Observable::<u32, String>::from_stream(|| {
            IntervalStream::new(tokio::time::interval(Duration::from_millis(100)))
                .enumerate()
                .map(|(n, _)| Ok(n as u32))
        });
        let subscription = source.subscribe(sink.clone());

        tokio::time::sleep(Duration::from_millis(150)).await;
        subscription.unsubscribe();
        let seen = sink.values.lock().unwrap().len();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(seen > 0);
        assert_eq!(sink.values.lock().unwrap().len(), seen);
        assert_eq!(sink.completed.load(Ordering::SeqCst), 0);
    }
}
