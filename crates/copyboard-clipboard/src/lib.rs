//! Clipboard access for copyboard.
//!
//! Defines the [`ClipboardPort`] trait the history engine consumes. The
//! `system` feature provides an arboard-backed implementation and the
//! `mock` feature an in-memory one for tests.

use async_trait::async_trait;
use copyboard_types::{ClipboardPayload, Content};

pub mod error;
#[cfg(feature = "mock")]
pub mod mock;
#[cfg(feature = "system")]
pub mod system;

pub use error::ClipboardError;

/// Platform clipboard access.
#[async_trait]
pub trait ClipboardPort: Send + Sync + 'static {
    /// Monotonic counter that advances on every clipboard write.
    async fn change_count(&self) -> Result<u64, ClipboardError>;

    /// Read every representation the clipboard currently offers.
    async fn read(&self) -> Result<ClipboardPayload, ClipboardError>;

    /// Replace the clipboard with exactly one representation of `content`.
    async fn write(&mut self, content: &Content) -> Result<(), ClipboardError>;
}
