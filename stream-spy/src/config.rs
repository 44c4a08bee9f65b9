use std::time::Duration;

/// Settings applied to a spy created with [`observe_with`](crate::observe_with).
///
/// Use the builder methods to customize, or [`Default`] for unbounded waits.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use stream_spy::Config;
///
/// let config = Config::default().with_wait_timeout(Duration::from_secs(2));
/// assert_eq!(config.wait_timeout(), Some(Duration::from_secs(2)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Upper bound for every `wait_for_*` call on the spy.
    /// A [`Wait`](crate::Wait) can still override it with `within()`.
    /// Default: `None` (wait indefinitely)
    wait_timeout: Option<Duration>,
}

impl Config {
    /// Bound every wait on the spy to `timeout`.
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = Some(timeout);
        self
    }

    /// Remove the bound set by [`with_wait_timeout`](Self::with_wait_timeout).
    pub fn without_wait_timeout(mut self) -> Self {
        self.wait_timeout = None;
        self
    }

    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_waits_indefinitely() {
        assert_eq!(Config::default().wait_timeout(), None);
    }

    #[test]
    fn builder_sets_and_clears_timeout() {
        let config = Config::default().with_wait_timeout(Duration::from_millis(50));
        assert_eq!(config.wait_timeout(), Some(Duration::from_millis(50)));

        let config = config.without_wait_timeout();
        assert_eq!(config.wait_timeout(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip_preserves_timeout() {
        let config = Config::default().with_wait_timeout(Duration::from_secs(3));
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
