/// Terminal state of an observed source.
///
/// `Active → Completed` and `Active → Failed` are the only transitions, and
/// both are final: a source that completed can never fail afterwards, and
/// vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome<E> {
    /// No terminal signal received yet.
    Active,
    Completed,
    Failed(E),
}

impl<E> Default for Outcome<E> {
    fn default() -> Self {
        Outcome::Active
    }
}

impl<E> Outcome<E> {
    pub fn is_active(&self) -> bool {
        matches!(self, Outcome::Active)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Returns the failure payload, if the source failed.
    pub fn error(&self) -> Option<&E> {
        match self {
            Outcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Move to `next` if still active. Returns whether the transition happened.
    pub(crate) fn settle(&mut self, next: Outcome<E>) -> bool {
        if !self.is_active() || next.is_active() {
            return false;
        }
        *self = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_active() {
        let outcome = Outcome::<String>::default();
        assert!(outcome.is_active());
        assert_eq!(outcome.error(), None);
    }

    #[test]
    fn active_settles_to_completed() {
        let mut outcome = Outcome::<String>::Active;
        assert!(outcome.settle(Outcome::Completed));
        assert!(outcome.is_completed());
    }

    #[test]
    fn active_settles_to_failed() {
        let mut outcome = Outcome::Active;
        assert!(outcome.settle(Outcome::Failed("boom")));
        assert!(outcome.is_failed());
        assert_eq!(outcome.error(), Some(&"boom"));
    }

    #[test]
    fn completed_never_fails_afterwards() {
        let mut outcome = Outcome::Completed;
        assert!(!outcome.settle(Outcome::Failed("late")));
        assert_eq!(outcome, Outcome::Completed);
    }

    #[test]
    fn failed_keeps_first_payload() {
        let mut outcome = Outcome::Failed("first");
        assert!(!outcome.settle(Outcome::Failed("second")));
        assert!(!outcome.settle(Outcome::Completed));
        assert_eq!(outcome.error(), Some(&"first"));
    }

    #[test]
    fn settling_to_active_is_rejected() {
        let mut outcome = Outcome::<String>::Active;
        assert!(!outcome.settle(Outcome::Active));
        assert!(outcome.is_active());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_failure_payload() {
        let json = serde_json::to_string(&Outcome::Failed("timeout".to_string())).unwrap();
        assert_eq!(json, r#"{"Failed":"timeout"}"#);
    }
}
