//! Shared types for copyboard.
//!
//! This crate contains the types shared across the copyboard workspace:
//! classified clipboard content, history items, raw clipboard and drop
//! payloads, and the transient feedback signals.

pub mod content;
pub mod item;
pub mod payload;
pub mod signal;

pub use content::{Content, ContentError, ContentKind, ImageData};
pub use item::{Item, ItemId};
pub use payload::{ClipboardPayload, DropPayload};
pub use signal::{SignalKind, SignalState};
