//! Raw payloads as delivered by a clipboard or a drop source.

use std::path::PathBuf;

use crate::content::{Content, ImageData};

/// Everything a clipboard currently exposes.
///
/// A clipboard may offer several representations of the same copy at
/// once; classification picks one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub text: Option<String>,
    pub image: Option<ImageData>,
    pub file: Option<PathBuf>,
}

impl ClipboardPayload {
    #[must_use]
    pub fn text(s: &str) -> Self {
        Self {
            text: Some(s.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn image(image: ImageData) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
            ..Self::default()
        }
    }

    /// The single representation a clipboard holds after `content` is
    /// written to it.
    #[must_use]
    pub fn from_content(content: &Content) -> Self {
        match content {
            Content::Text(text) => Self::text(text),
            Content::Image(image) => Self::image(image.clone()),
            Content::File(path) => Self::file(path.clone()),
        }
    }

    /// No representation present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.image.is_none() && self.file.is_none()
    }
}

/// One representation carried by a drop event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPayload {
    /// A file reference. Becomes an image if the file decodes as one.
    FileUrl(PathBuf),
    /// Plain text.
    Text(String),
    /// Encoded image data (TIFF, PNG, ...).
    ImageBytes(Vec<u8>),
}
