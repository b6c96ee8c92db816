//! Auto-clearing feedback signals.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use copyboard_types::{SignalKind, SignalState};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Owns the published [`SignalState`] and one clear timer per kind.
///
/// Triggering a kind sets it and (re)starts its timer; when the timer
/// fires the kind returns to idle. Each trigger bumps the kind's
/// generation, and a timer only clears the flag if no newer trigger has
/// happened, so the flag stays up for a full duration after the latest
/// trigger even when an older timer is already running.
pub struct TransientSignals {
    duration: Duration,
    state_tx: Arc<watch::Sender<SignalState>>,
    generations: Arc<Generations>,
    timers: HashMap<SignalKind, JoinHandle<()>>,
}

/// Trigger counter per kind. Only read or written inside the watch
/// sender's modify closures, which serialises triggers against clears.
#[derive(Default)]
struct Generations([AtomicU64; 3]);

impl Generations {
    fn slot(&self, kind: SignalKind) -> &AtomicU64 {
        match kind {
            SignalKind::PasteConfirmed => &self.0[0],
            SignalKind::CopyConfirmed => &self.0[1],
            SignalKind::ClipboardEmpty => &self.0[2],
        }
    }
}

impl TransientSignals {
    pub fn new(duration: Duration) -> Self {
        let (state_tx, _) = watch::channel(SignalState::default());
        Self {
            duration,
            state_tx: Arc::new(state_tx),
            generations: Arc::new(Generations::default()),
            timers: HashMap::new(),
        }
    }

    /// Raise `kind` and schedule its return to idle. Must be called from
    /// within a tokio runtime.
    pub fn trigger(&mut self, kind: SignalKind) {
        debug!(signal = %kind, "signal raised");
        let mut generation = 0;
        self.state_tx.send_modify(|state| {
            generation = self.generations.slot(kind).fetch_add(1, Ordering::Relaxed) + 1;
            state.set(kind, true);
        });

        if let Some(pending) = self.timers.remove(&kind) {
            pending.abort();
        }

        let state_tx = Arc::clone(&self.state_tx);
        let generations = Arc::clone(&self.generations);
        let duration = self.duration;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if clear_if_current(&state_tx, &generations, kind, generation) {
                debug!(signal = %kind, "signal cleared");
            }
        });
        self.timers.insert(kind, timer);
    }

    pub fn current(&self) -> SignalState {
        *self.state_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SignalState> {
        self.state_tx.subscribe()
    }
}

/// Clear `kind` unless it was triggered again after `generation`.
fn clear_if_current(
    state_tx: &watch::Sender<SignalState>,
    generations: &Generations,
    kind: SignalKind,
    generation: u64,
) -> bool {
    state_tx.send_if_modified(|state| {
        if generations.slot(kind).load(Ordering::Relaxed) != generation {
            return false;
        }
        state.set(kind, false);
        true
    })
}

impl Drop for TransientSignals {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
    }
}
