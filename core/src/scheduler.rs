//! Self-rescheduling one-shot loot timer.
//!
//! Two-state machine over a cancellable delayed task:
//!
//! - `Idle -> Armed` when a drop is admitted while nothing is pending;
//! - `Armed -> Armed` when the service re-arms after a sweep that left
//!   drops tracked;
//! - `Armed -> Idle` when a sweep finds the drop set empty, or on
//!   teardown.
//!
//! Arming always cancels any pending task first, so the timer can never
//! double-fire. The fired task posts a [`SweepTick`] back into the service
//! queue instead of sweeping inline, which keeps all state mutation on the
//! single service task.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Marker message posted when the loot timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepTick;

#[derive(Debug)]
pub struct LootScheduler {
    tick_tx: mpsc::Sender<SweepTick>,
    pending: Option<JoinHandle<()>>,
}

impl LootScheduler {
    pub fn new(tick_tx: mpsc::Sender<SweepTick>) -> Self {
        Self {
            tick_tx,
            pending: None,
        }
    }

    /// Schedule a single tick after `delay`, cancelling any pending one.
    pub fn arm(&mut self, delay: Duration) {
        self.disarm();
        let tick_tx = self.tick_tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tick_tx.send(SweepTick).await;
        }));
    }

    /// Cancel the pending tick, if any. Also clears the handle of a tick
    /// that already fired.
    pub fn disarm(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for LootScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}
