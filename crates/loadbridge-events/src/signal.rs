//! The wakeup side of the queue: a coalescing cross-thread notification.

use tokio::sync::Notify;

/// Level-triggered wakeup from SDK threads to the consumer context.
///
/// [`raise`](Self::raise) is synchronous and callable from any thread, so
/// it fits inside an SDK callback. At most one permit is stored: any
/// number of raises before the consumer wakes coalesce into a single
/// wakeup. That is sufficient because the dispatch loop always drains the
/// queue completely per wakeup — the signal only carries liveness
/// ("something is queued"), never a count.
#[derive(Debug, Default)]
pub struct WakeupSignal {
    notify: Notify,
}

impl WakeupSignal {
    /// Create a signal with no stored wakeup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake the consumer, or store one permit if it is not waiting yet.
    ///
    /// Non-blocking; safe from any thread.
    pub fn raise(&self) {
        self.notify.notify_one();
    }

    /// Suspend until the signal is raised.
    ///
    /// Returns immediately if a permit was stored since the last wait, so
    /// a raise that lands between the consumer's last drain and this call
    /// is never missed. Only the single consumer context may wait.
    pub async fn wait(&self) {
        self.notify.notified().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_raise_before_wait_is_not_lost() {
        let signal = WakeupSignal::new();
        signal.raise();
        // Must complete immediately off the stored permit.
        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .expect("stored wakeup was lost");
    }

    #[tokio::test]
    async fn test_raises_coalesce_into_one_permit() {
        let signal = WakeupSignal::new();
        signal.raise();
        signal.raise();
        signal.raise();

        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .expect("first wait should complete");

        // The extra raises must not have accumulated.
        let second = tokio::time::timeout(Duration::from_millis(50), signal.wait()).await;
        assert!(second.is_err(), "coalesced raises produced a second wakeup");
    }

    #[tokio::test]
    async fn test_raise_from_another_thread_wakes_waiter() {
        let signal = Arc::new(WakeupSignal::new());
        let raiser = {
            let signal = Arc::clone(&signal);
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(20));
                signal.raise();
            })
        };

        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .expect("cross-thread raise did not wake the waiter");
        raiser.join().unwrap();
    }
}
