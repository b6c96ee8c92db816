//! System clipboard backend built on arboard.
//!
//! The arboard handle lives on a dedicated worker thread; the async port
//! sends it requests over a channel. arboard exposes no change counter, so
//! the worker derives one: each query fingerprints the current text and
//! image and advances the counter when the fingerprint moves.

use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use copyboard_types::{ClipboardPayload, Content, ImageData};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::error::ClipboardError;
use crate::ClipboardPort;

type Reply<T> = oneshot::Sender<Result<T, ClipboardError>>;

enum Request {
    ChangeCount(Reply<u64>),
    Read(Reply<ClipboardPayload>),
    Write(Content, Reply<()>),
}

/// The desktop clipboard of the current session.
pub struct SystemClipboard {
    requests: mpsc::UnboundedSender<Request>,
}

impl SystemClipboard {
    /// Open the system clipboard. Representations larger than `max_size`
    /// bytes are ignored when reading.
    pub fn new(max_size: usize) -> Result<Self, ClipboardError> {
        let (requests, rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();

        std::thread::Builder::new()
            .name("copyboard-clipboard".to_string())
            .spawn(move || match arboard::Clipboard::new() {
                Ok(clipboard) => {
                    let _ = ready_tx.send(Ok(()));
                    Worker {
                        clipboard,
                        max_size,
                        count: 0,
                        fingerprint: None,
                    }
                    .serve(rx);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(map_error(e)));
                }
            })
            .map_err(|e| ClipboardError::Other(e.into()))?;

        ready_rx.recv().map_err(|_| worker_gone())??;
        debug!(max_size, "system clipboard opened");
        Ok(Self { requests })
    }

    async fn call<T>(&self, request: impl FnOnce(Reply<T>) -> Request) -> Result<T, ClipboardError> {
        let (tx, rx) = oneshot::channel();
        self.requests.send(request(tx)).map_err(|_| worker_gone())?;
        rx.await.map_err(|_| worker_gone())?
    }
}

#[async_trait]
impl ClipboardPort for SystemClipboard {
    async fn change_count(&self) -> Result<u64, ClipboardError> {
        self.call(Request::ChangeCount).await
    }

    async fn read(&self) -> Result<ClipboardPayload, ClipboardError> {
        self.call(Request::Read).await
    }

    async fn write(&mut self, content: &Content) -> Result<(), ClipboardError> {
        let content = content.clone();
        self.call(|reply| Request::Write(content, reply)).await
    }
}

struct Worker {
    clipboard: arboard::Clipboard,
    max_size: usize,
    count: u64,
    fingerprint: Option<u64>,
}

impl Worker {
    fn serve(mut self, mut rx: mpsc::UnboundedReceiver<Request>) {
        while let Some(request) = rx.blocking_recv() {
            match request {
                Request::ChangeCount(reply) => {
                    let _ = reply.send(self.change_count());
                }
                Request::Read(reply) => {
                    let _ = reply.send(self.read());
                }
                Request::Write(content, reply) => {
                    let _ = reply.send(self.write(&content));
                }
            }
        }
        debug!("clipboard worker stopped");
    }

    fn change_count(&mut self) -> Result<u64, ClipboardError> {
        let mut hasher = DefaultHasher::new();
        optional(self.clipboard.get_text())?.hash(&mut hasher);
        if let Some(image) = optional(self.clipboard.get_image())? {
            image.width.hash(&mut hasher);
            image.height.hash(&mut hasher);
            image.bytes.hash(&mut hasher);
        }
        let fingerprint = hasher.finish();

        if self.fingerprint != Some(fingerprint) {
            if self.fingerprint.is_some() {
                self.count += 1;
            }
            self.fingerprint = Some(fingerprint);
        }
        Ok(self.count)
    }

    fn read(&mut self) -> Result<ClipboardPayload, ClipboardError> {
        Ok(ClipboardPayload {
            text: self.read_text()?,
            image: self.read_image()?,
            file: None,
        })
    }

    fn read_text(&mut self) -> Result<Option<String>, ClipboardError> {
        let Some(text) = optional(self.clipboard.get_text())? else {
            return Ok(None);
        };
        match self.check_size(text.len()) {
            Ok(()) => Ok(Some(text)),
            Err(e) => {
                debug!(error = %e, "skipping clipboard text");
                Ok(None)
            }
        }
    }

    fn read_image(&mut self) -> Result<Option<ImageData>, ClipboardError> {
        let Some(image) = optional(self.clipboard.get_image())? else {
            return Ok(None);
        };
        if let Err(e) = self.check_size(image.bytes.len()) {
            debug!(error = %e, "skipping clipboard image");
            return Ok(None);
        }
        Ok(convert_image(image.width, image.height, &image.bytes))
    }

    fn write(&mut self, content: &Content) -> Result<(), ClipboardError> {
        match content {
            Content::Text(text) => self.clipboard.set_text(text.clone()).map_err(map_error),
            Content::Image(image) => {
                let rgba = image.to_rgba()?;
                self.clipboard
                    .set_image(arboard::ImageData {
                        width: image.width() as usize,
                        height: image.height() as usize,
                        bytes: Cow::Owned(rgba),
                    })
                    .map_err(map_error)
            }
            // arboard cannot place file references on the clipboard.
            Content::File(_) => Err(ClipboardError::FormatUnavailable),
        }
    }

    fn check_size(&self, size: usize) -> Result<(), ClipboardError> {
        if size > self.max_size {
            return Err(ClipboardError::TooLarge {
                size,
                max: self.max_size,
            });
        }
        Ok(())
    }
}

/// Canonicalise a clipboard bitmap. A bitmap that cannot be converted is
/// treated as absent so the other representations still come through.
fn convert_image(width: usize, height: usize, rgba: &[u8]) -> Option<ImageData> {
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        warn!(width, height, "clipboard image dimensions out of range");
        return None;
    };
    match ImageData::from_rgba(w, h, rgba) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!(error = %e, "skipping unreadable clipboard image");
            None
        }
    }
}

/// Treat "no such format" as an absent representation.
fn optional<T>(result: Result<T, arboard::Error>) -> Result<Option<T>, ClipboardError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(arboard::Error::ContentNotAvailable | arboard::Error::ConversionFailure) => Ok(None),
        Err(e) => Err(map_error(e)),
    }
}

fn map_error(error: arboard::Error) -> ClipboardError {
    match error {
        arboard::Error::ContentNotAvailable => ClipboardError::FormatUnavailable,
        arboard::Error::ClipboardNotSupported => ClipboardError::Unavailable,
        arboard::Error::ClipboardOccupied => ClipboardError::AccessDenied,
        other => ClipboardError::Other(anyhow::anyhow!("{other}")),
    }
}

fn worker_gone() -> ClipboardError {
    ClipboardError::Other(anyhow::anyhow!("clipboard worker exited"))
}
