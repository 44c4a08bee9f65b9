use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Observer, Outcome, signal::Signal};

/// Number of times each observer callback reached the recorder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CallCounts {
    pub(crate) next: usize,
    pub(crate) error: usize,
    pub(crate) complete: usize,
}

struct Session<T, E> {
    values: Vec<T>,
    outcome: Outcome<E>,
    calls: CallCounts,
}

/// The recording observer behind an [`ObserverSpy`](crate::ObserverSpy).
///
/// Appends values in arrival order and settles the outcome on the first
/// terminal signal, firing the matching [`Signal`] after the state is
/// updated.
pub(crate) struct Recorder<T, E> {
    session: Arc<Mutex<Session<T, E>>>,
    completed: Signal,
    failed: Signal,
}

impl<T, E> Clone for Recorder<T, E> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            completed: self.completed.clone(),
            failed: self.failed.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Recorder<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.lock();
        f.debug_struct("Recorder")
            .field("values", &session.values.len())
            .field("completed", &session.outcome.is_completed())
            .field("failed", &session.outcome.is_failed())
            .finish_non_exhaustive()
    }
}

impl<T, E> Recorder<T, E> {
    pub(crate) fn new() -> Self {
        Self {
            session: Arc::new(Mutex::new(Session {
                values: Vec::new(),
                outcome: Outcome::Active,
                calls: CallCounts::default(),
            })),
            completed: Signal::default(),
            failed: Signal::default(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session<T, E>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn completed(&self) -> &Signal {
        &self.completed
    }

    pub(crate) fn failed(&self) -> &Signal {
        &self.failed
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.lock().outcome.is_completed()
    }

    pub(crate) fn is_failed(&self) -> bool {
        self.lock().outcome.is_failed()
    }

    pub(crate) fn is_active(&self) -> bool {
        self.lock().outcome.is_active()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().values.len()
    }

    pub(crate) fn calls(&self) -> CallCounts {
        self.lock().calls
    }

    pub(crate) fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.lock().values.clone()
    }

    pub(crate) fn value_at(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.lock().values.get(index).cloned()
    }

    pub(crate) fn last_value(&self) -> Option<T>
    where
        T: Clone,
    {
        self.lock().values.last().cloned()
    }

    pub(crate) fn outcome(&self) -> Outcome<E>
    where
        E: Clone,
    {
        self.lock().outcome.clone()
    }

    pub(crate) fn error(&self) -> Option<E>
    where
        E: Clone,
    {
        self.lock().outcome.error().cloned()
    }
}

impl<T: Send, E: Send> Observer<T, E> for Recorder<T, E> {
    fn on_next(&self, value: T) {
        let mut session = self.lock();
        session.calls.next += 1;
        session.values.push(value);
        tracing::trace!(index = session.values.len() - 1, "value recorded");
    }

    fn on_error(&self, error: E) {
        let settled = {
            let mut session = self.lock();
            session.calls.error += 1;
            session.outcome.settle(Outcome::Failed(error))
        };
        if settled {
            tracing::debug!("source failed");
            self.failed.fire();
        }
    }

    fn on_complete(&self) {
        let settled = {
            let mut session = self.lock();
            session.calls.complete += 1;
            session.outcome.settle(Outcome::Completed)
        };
        if settled {
            tracing::debug!("source completed");
            self.completed.fire();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_values_in_arrival_order() {
        let recorder = Recorder::<i32, String>::new();
        recorder.on_next(3);
        recorder.on_next(1);
        recorder.on_next(3);

        assert_eq!(recorder.values(), vec![3, 1, 3]);
        assert_eq!(recorder.len(), 3);
        assert_eq!(recorder.value_at(1), Some(1));
        assert_eq!(recorder.last_value(), Some(3));
        assert!(recorder.is_active());
    }

    #[test]
    fn values_returns_a_copy() {
        let recorder = Recorder::<i32, String>::new();
        recorder.on_next(1);

        let mut copy = recorder.values();
        copy.push(99);
        copy[0] = 42;

        assert_eq!(recorder.values(), vec![1]);
    }

    #[test]
    fn completion_fires_only_completed_signal() {
        let recorder = Recorder::<i32, String>::new();
        recorder.on_complete();

        assert!(recorder.is_completed());
        assert!(!recorder.is_failed());
        assert!(recorder.completed().is_fired());
        assert!(!recorder.failed().is_fired());
        assert_eq!(recorder.error(), None);
    }

    #[test]
    fn failure_stores_payload_and_fires_failed_signal() {
        let recorder = Recorder::<i32, String>::new();
        recorder.on_error("boom".to_string());

        assert!(recorder.is_failed());
        assert!(!recorder.is_completed());
        assert!(recorder.failed().is_fired());
        assert!(!recorder.completed().is_fired());
        assert_eq!(recorder.error().as_deref(), Some("boom"));
        assert_eq!(recorder.outcome(), Outcome::Failed("boom".to_string()));
    }

    #[test]
    fn second_terminal_signal_has_no_effect() {
        let recorder = Recorder::<i32, String>::new();
        recorder.on_complete();
        recorder.on_error("late".to_string());

        assert!(recorder.is_completed());
        assert!(!recorder.is_failed());
        assert!(!recorder.failed().is_fired());
        assert_eq!(recorder.error(), None);
    }

    #[test]
    fn counts_every_callback() {
        let recorder = Recorder::<i32, String>::new();
        recorder.on_next(1);
        recorder.on_next(2);
        recorder.on_complete();
        recorder.on_complete();

        assert_eq!(
            recorder.calls(),
            CallCounts {
                next: 2,
                error: 0,
                complete: 2
            }
        );
    }

    #[test]
    fn clones_share_the_session() {
        let recorder = Recorder::<i32, String>::new();
        let view = recorder.clone();
        recorder.on_next(5);
        recorder.on_complete();

        assert_eq!(view.values(), vec![5]);
        assert!(view.completed().is_fired());
    }
}
