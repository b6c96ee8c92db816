//! Event loop driving the monitor.

use std::time::Duration;

use copyboard_clipboard::ClipboardPort;
use copyboard_types::{DropPayload, Item, SignalState};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::EngineError;
use crate::monitor::ClipboardMonitor;

/// Actions fed into the daemon by the presentation layer or drop sources.
#[derive(Debug)]
pub enum DaemonEvent {
    /// Capture the clipboard now.
    ForcePaste,
    /// Copy a history item back to the clipboard.
    Reuse(Item),
    /// Representations from a drop event.
    Ingest(Vec<DropPayload>),
    /// Empty the history.
    ClearHistory,
    /// Stop the loop.
    Shutdown,
}

/// Owns the [`ClipboardMonitor`] and serialises poll ticks and events.
pub struct Daemon {
    monitor: ClipboardMonitor,
    poll_interval: Duration,
    event_tx: mpsc::Sender<DaemonEvent>,
    event_rx: mpsc::Receiver<DaemonEvent>,
}

impl Daemon {
    /// Create a new daemon over `port`.
    pub async fn new(config: &Config, port: Box<dyn ClipboardPort>) -> Self {
        let monitor = ClipboardMonitor::new(port, &config.monitor).await;
        let (event_tx, event_rx) = mpsc::channel(256);

        Self {
            monitor,
            poll_interval: config.monitor.poll_interval(),
            event_tx,
            event_rx,
        }
    }

    /// Get a clone of the event sender for feeding events into the daemon.
    pub fn event_sender(&self) -> mpsc::Sender<DaemonEvent> {
        self.event_tx.clone()
    }

    pub fn history_receiver(&self) -> watch::Receiver<Vec<Item>> {
        self.monitor.history_receiver()
    }

    pub fn signal_receiver(&self) -> watch::Receiver<SignalState> {
        self.monitor.signal_receiver()
    }

    pub fn monitor(&self) -> &ClipboardMonitor {
        &self.monitor
    }

    /// Run the poll loop until [`DaemonEvent::Shutdown`] arrives.
    pub async fn run(&mut self) -> Result<(), EngineError> {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(interval = ?self.poll_interval, "clipboard monitor running");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.monitor.poll().await;
                }
                event = self.event_rx.recv() => {
                    match event {
                        Some(DaemonEvent::ForcePaste) => {
                            self.monitor.force_paste().await;
                        }
                        Some(DaemonEvent::Reuse(item)) => {
                            self.monitor.reuse_item(item).await;
                        }
                        Some(DaemonEvent::Ingest(payloads)) => {
                            debug!(count = payloads.len(), "drop received");
                            self.monitor.ingest_external(payloads).await;
                        }
                        Some(DaemonEvent::ClearHistory) => {
                            self.monitor.clear_history();
                        }
                        Some(DaemonEvent::Shutdown) | None => {
                            info!("shutting down");
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
