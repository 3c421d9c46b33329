//! Cosmetic progress signal for unbounded waits
//!
//! The percentage here is a liveness indicator only: it advances on a local
//! timer and says nothing about actual backend progress. The authoritative
//! outcome always comes from the delivery strategy.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Ticks a fake percentage upward on a fixed interval, stalling at a ceiling
/// below 100 until the caller declares the flow finished.
pub struct ProgressTicker {
    percent: watch::Sender<u8>,
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    /// Start a ticker that adds `step` percent every `period`, never passing
    /// `ceiling` on its own.
    pub fn start(period: Duration, step: u8, ceiling: u8) -> Self {
        let (percent, _) = watch::channel(0u8);
        let tx = percent.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await; // first tick resolves immediately
            loop {
                ticker.tick().await;
                tx.send_modify(|value| *value = value.saturating_add(step).min(ceiling));
            }
        });
        Self { percent, handle }
    }

    /// Current cosmetic percentage
    pub fn percent(&self) -> u8 {
        *self.percent.borrow()
    }

    /// Subscribe to percentage updates.
    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.percent.subscribe()
    }

    /// Snap to 100 and stop ticking. Call when the real result arrived.
    pub fn finish(&self) {
        self.handle.abort();
        self.percent.send_replace(100);
    }

    /// Stop without completing; the value freezes where it is.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
