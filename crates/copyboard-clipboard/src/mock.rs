//! Mock clipboard backend for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use copyboard_types::{ClipboardPayload, Content};

use crate::error::ClipboardError;
use crate::ClipboardPort;

/// Shared state for observing what `MockClipboard` did.
#[derive(Debug, Default)]
struct MockClipboardState {
    change_count: u64,
    payload: ClipboardPayload,
    writes: Vec<Content>,
    fail_reads: bool,
    fail_writes: bool,
}

/// In-memory clipboard that behaves like a platform pasteboard.
///
/// Every write, external or through [`ClipboardPort::write`], advances
/// the change counter.
pub struct MockClipboard {
    state: Arc<Mutex<MockClipboardState>>,
}

impl Default for MockClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClipboard {
    /// Create an empty mock clipboard with change counter 0.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockClipboardState::default())),
        }
    }

    /// Get a clonable handle for driving and observing the clipboard from tests.
    pub fn handle(&self) -> MockClipboardHandle {
        MockClipboardHandle {
            state: Arc::clone(&self.state),
        }
    }
}

/// Clonable handle for `MockClipboard`.
///
/// Tests use this to simulate copies made by other applications and to
/// inspect what the engine wrote.
#[derive(Clone)]
pub struct MockClipboardHandle {
    state: Arc<Mutex<MockClipboardState>>,
}

impl MockClipboardHandle {
    /// Simulate another application copying `payload`.
    pub fn copy(&self, payload: ClipboardPayload) {
        let mut state = self.state.lock().unwrap();
        state.payload = payload;
        state.change_count += 1;
    }

    /// Simulate another application copying plain text.
    pub fn copy_text(&self, text: &str) {
        self.copy(ClipboardPayload::text(text));
    }

    /// Replace the payload without advancing the change counter.
    pub fn set_payload_silently(&self, payload: ClipboardPayload) {
        self.state.lock().unwrap().payload = payload;
    }

    pub fn change_count(&self) -> u64 {
        self.state.lock().unwrap().change_count
    }

    /// Current clipboard contents.
    pub fn payload(&self) -> ClipboardPayload {
        self.state.lock().unwrap().payload.clone()
    }

    /// Every successful write made through the port, oldest first.
    pub fn writes(&self) -> Vec<Content> {
        self.state.lock().unwrap().writes.clone()
    }

    /// Make subsequent reads (and change counter queries) fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    /// Make subsequent writes fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }
}

#[async_trait]
impl ClipboardPort for MockClipboard {
    async fn change_count(&self) -> Result<u64, ClipboardError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(ClipboardError::AccessDenied);
        }
        Ok(state.change_count)
    }

    async fn read(&self) -> Result<ClipboardPayload, ClipboardError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(ClipboardError::AccessDenied);
        }
        Ok(state.payload.clone())
    }

    async fn write(&mut self, content: &Content) -> Result<(), ClipboardError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(ClipboardError::AccessDenied);
        }
        state.payload = ClipboardPayload::from_content(content);
        state.change_count += 1;
        state.writes.push(content.clone());
        Ok(())
    }
}
