//! Clipboard history engine for copyboard.
//!
//! Watches a clipboard through a [`copyboard_clipboard::ClipboardPort`],
//! classifies each new payload, and keeps a small deduplicated history that
//! can be written back to the clipboard or extended from drop sources.

pub mod classifier;
pub mod config;
pub mod daemon;
pub mod error;
pub mod history;
pub mod monitor;
pub mod signal;

pub use config::Config;
pub use daemon::{Daemon, DaemonEvent};
pub use error::EngineError;
pub use history::{HistoryStore, HISTORY_CAPACITY};
pub use monitor::ClipboardMonitor;
pub use signal::TransientSignals;
