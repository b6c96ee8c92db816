//! Bounded, deduplicated, most-recent-first history.

use copyboard_types::{Content, Item};
use tokio::sync::watch;
use tracing::debug;

/// Maximum number of items kept.
pub const HISTORY_CAPACITY: usize = 8;

/// Ordered history of classified items.
///
/// Invariants: no two items are content-equal, `len() <= HISTORY_CAPACITY`,
/// and the most recently accepted item sits at index 0. Subscribers get a
/// fresh snapshot after every mutation.
pub struct HistoryStore {
    items: Vec<Item>,
    snapshot_tx: watch::Sender<Vec<Item>>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        let (snapshot_tx, _) = watch::channel(Vec::new());
        Self {
            items: Vec::with_capacity(HISTORY_CAPACITY + 1),
            snapshot_tx,
        }
    }

    /// Insert `item` at the front unless equal content is already present.
    ///
    /// Evicts the oldest item when the capacity is exceeded. Returns whether
    /// the item was accepted.
    pub fn insert(&mut self, item: Item) -> bool {
        if self.contains_content_equal(&item.content) {
            debug!(kind = %item.content.kind(), "duplicate content, not inserted");
            return false;
        }

        debug!(id = %item.id, kind = %item.content.kind(), "history insert");
        self.items.insert(0, item);
        if self.items.len() > HISTORY_CAPACITY {
            if let Some(evicted) = self.items.pop() {
                debug!(id = %evicted.id, "evicted oldest item");
            }
        }
        self.publish();
        true
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
        self.publish();
    }

    pub fn contains_content_equal(&self, content: &Content) -> bool {
        self.items.iter().any(|item| item.content == *content)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index`, 0 being the most recent.
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Copy of the current history, most recent first.
    pub fn snapshot(&self) -> Vec<Item> {
        self.items.clone()
    }

    /// Receiver that observes a snapshot after every insert or clear.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Item>> {
        self.snapshot_tx.subscribe()
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.items.clone());
    }
}
