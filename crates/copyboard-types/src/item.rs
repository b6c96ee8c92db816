//! History items and their identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::Content;

/// Unique identifier for a history item.
///
/// Generated once when the item is created and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generate a new random item ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A classified clipboard entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub content: Content,
}

impl Item {
    /// Wrap content in a new item with a fresh ID.
    #[must_use]
    pub fn new(content: Content) -> Self {
        Self {
            id: ItemId::new(),
            content,
        }
    }

    /// Whether two items carry equal content, ignoring their IDs.
    #[must_use]
    pub fn is_content_equal(&self, other: &Item) -> bool {
        self.content == other.content
    }
}
