use tokio_util::sync::CancellationToken;

/// One-shot latch for a terminal signal.
///
/// Firing is idempotent. A waiter observes the latch whether it started
/// waiting before or after the fire.
#[derive(Debug, Clone, Default)]
pub(crate) struct Signal(CancellationToken);

impl Signal {
    pub(crate) fn fire(&self) {
        self.0.cancel();
    }

    pub(crate) fn is_fired(&self) -> bool {
        self.0.is_cancelled()
    }

    pub(crate) async fn fired(&self) {
        self.0.cancelled().await
    }
}
