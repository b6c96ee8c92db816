//! Clipboard change detection and history ingestion.

use copyboard_clipboard::ClipboardPort;
use copyboard_types::{Content, DropPayload, Item, SignalKind, SignalState};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::classifier::{classify, classify_drop, EmptyText};
use crate::config::MonitorConfig;
use crate::history::HistoryStore;
use crate::signal::TransientSignals;

/// Feeds a [`HistoryStore`] from a clipboard and from drop sources.
///
/// Every mutating operation takes `&mut self`; the owner is the single
/// writer of history and of the last-written item.
pub struct ClipboardMonitor {
    port: Box<dyn ClipboardPort>,
    history: HistoryStore,
    signals: TransientSignals,
    last_change_count: u64,
    /// The most recent item this monitor itself put on the clipboard.
    last_written: Option<Item>,
}

impl ClipboardMonitor {
    /// Create a monitor. Content already on the clipboard is not captured
    /// until it changes.
    pub async fn new(port: Box<dyn ClipboardPort>, config: &MonitorConfig) -> Self {
        let last_change_count = match port.change_count().await {
            Ok(count) => count,
            Err(e) => {
                warn!(error = %e, "could not read initial change count");
                0
            }
        };

        Self {
            port,
            history: HistoryStore::new(),
            signals: TransientSignals::new(config.signal_duration()),
            last_change_count,
            last_written: None,
        }
    }

    /// Check the clipboard once. Returns whether a new item was captured.
    pub async fn poll(&mut self) -> bool {
        let count = match self.port.change_count().await {
            Ok(count) => count,
            Err(e) => {
                debug!(error = %e, "change count unavailable");
                return false;
            }
        };
        if count == self.last_change_count {
            return false;
        }
        debug!(from = self.last_change_count, to = count, "clipboard changed");
        self.last_change_count = count;

        let Some(content) = self.read_content(EmptyText::Accept).await else {
            return false;
        };
        if self
            .last_written
            .as_ref()
            .is_some_and(|written| written.content == content)
        {
            debug!("change is our own write, ignoring");
            return false;
        }
        self.capture(content)
    }

    /// Capture the clipboard now, regardless of the change counter.
    ///
    /// Raises `ClipboardEmpty` when there is nothing to capture, including
    /// when the only representation is empty text.
    pub async fn force_paste(&mut self) -> bool {
        match self.read_content(EmptyText::Skip).await {
            Some(content) => self.capture(content),
            None => {
                info!("forced paste found an empty clipboard");
                self.signals.trigger(SignalKind::ClipboardEmpty);
                false
            }
        }
    }

    /// Put `item` back on the clipboard and make sure it is in history.
    ///
    /// The write is skipped when the clipboard already holds the same
    /// content. Returns whether a write happened.
    pub async fn reuse_item(&mut self, item: Item) -> bool {
        let current = self.read_content(EmptyText::Accept).await;
        let written = if current.as_ref() == Some(&item.content) {
            debug!(id = %item.id, "clipboard already holds this content");
            false
        } else {
            match self.port.write(&item.content).await {
                Ok(()) => {
                    info!(id = %item.id, kind = %item.content.kind(), "copied item to clipboard");
                    self.last_written = Some(item.clone());
                    self.signals.trigger(SignalKind::CopyConfirmed);
                    true
                }
                Err(e) => {
                    warn!(id = %item.id, error = %e, "clipboard write failed");
                    false
                }
            }
        };

        if !self.history.contains_content_equal(&item.content) {
            self.history.insert(item);
        }
        written
    }

    /// Ingest the representations of a drop event. Returns how many items
    /// were added.
    ///
    /// Representations are decoded concurrently and inserted in drop order.
    /// No signal is raised.
    pub async fn ingest_external(&mut self, payloads: Vec<DropPayload>) -> usize {
        let loads: Vec<_> = payloads
            .into_iter()
            .map(|payload| tokio::task::spawn_blocking(move || classify_drop(payload)))
            .collect();

        let mut inserted = 0;
        for load in loads {
            match load.await {
                Ok(Some(content)) => {
                    if self.history.insert(Item::new(content)) {
                        inserted += 1;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "drop decoding task failed"),
            }
        }
        debug!(inserted, "drop ingested");
        inserted
    }

    pub fn clear_history(&mut self) {
        info!(items = self.history.len(), "clearing history");
        self.history.clear();
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn history_receiver(&self) -> watch::Receiver<Vec<Item>> {
        self.history.subscribe()
    }

    pub fn signals(&self) -> SignalState {
        self.signals.current()
    }

    pub fn signal_receiver(&self) -> watch::Receiver<SignalState> {
        self.signals.subscribe()
    }

    pub fn last_written(&self) -> Option<&Item> {
        self.last_written.as_ref()
    }

    pub fn last_change_count(&self) -> u64 {
        self.last_change_count
    }

    fn capture(&mut self, content: Content) -> bool {
        let kind = content.kind();
        let summary = content.summary();
        if !self.history.insert(Item::new(content)) {
            return false;
        }
        info!(%kind, %summary, "captured");
        self.signals.trigger(SignalKind::PasteConfirmed);
        true
    }

    async fn read_content(&self, empty_text: EmptyText) -> Option<Content> {
        match self.port.read().await {
            Ok(payload) => classify(&payload, empty_text),
            Err(e) => {
                warn!(error = %e, "clipboard read failed");
                None
            }
        }
    }
}
