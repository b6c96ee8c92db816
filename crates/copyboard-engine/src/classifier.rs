//! Content classification for clipboard and drop payloads.

use copyboard_types::{ClipboardPayload, Content, DropPayload, ImageData};
use tracing::debug;

/// How an empty text representation is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyText {
    /// Empty text is ordinary text. Used by change detection.
    Accept,
    /// Empty text counts as absent. Used by forced paste.
    Skip,
}

/// Pick at most one representation: text, then image, then file.
pub fn classify(payload: &ClipboardPayload, empty_text: EmptyText) -> Option<Content> {
    let text = payload
        .text
        .as_ref()
        .filter(|text| empty_text == EmptyText::Accept || !text.is_empty());

    if let Some(text) = text {
        Some(Content::Text(text.clone()))
    } else if let Some(image) = &payload.image {
        Some(Content::Image(image.clone()))
    } else {
        payload.file.as_ref().map(|path| Content::File(path.clone()))
    }
}

/// Classify a single dropped representation.
///
/// A file that decodes as an image becomes an image. This may touch the
/// filesystem, so callers run it off the async executor.
pub fn classify_drop(payload: DropPayload) -> Option<Content> {
    match payload {
        DropPayload::FileUrl(path) => match ImageData::open(&path) {
            Ok(image) => Some(Content::Image(image)),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "dropped file is not an image");
                Some(Content::File(path))
            }
        },
        DropPayload::Text(text) => Some(Content::Text(text)),
        DropPayload::ImageBytes(bytes) => match ImageData::decode(&bytes) {
            Ok(image) => Some(Content::Image(image)),
            Err(e) => {
                debug!(len = bytes.len(), error = %e, "dropped image data did not decode");
                None
            }
        },
    }
}
