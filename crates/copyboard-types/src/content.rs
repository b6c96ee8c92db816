//! Classified clipboard content.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of characters shown by [`Content::summary`] for text.
const SUMMARY_CHARS: usize = 40;

/// Errors raised while building content values.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("pixel buffer is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: u64,
        actual: u64,
    },

    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Kind of a [`Content`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    Text,
    Image,
    File,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Image => write!(f, "image"),
            Self::File => write!(f, "file"),
        }
    }
}

/// A bitmap held in its lossless PNG encoding.
///
/// Two images are equal iff their encoded bytes are equal. Every
/// constructor re-encodes through the same PNG encoder from RGBA8 pixels,
/// so the same pixels arriving from different sources compare equal.
#[derive(Clone, Serialize, Deserialize)]
pub struct ImageData {
    width: u32,
    height: u32,
    png: Arc<[u8]>,
}

impl ImageData {
    /// Encode a raw RGBA8 pixel buffer.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, ContentError> {
        let expected = u64::from(width) * u64::from(height) * 4;
        let actual = rgba.len() as u64;
        let buffer = (actual == expected)
            .then(|| RgbaImage::from_raw(width, height, rgba.to_vec()))
            .flatten()
            .ok_or(ContentError::BufferSize {
                width,
                height,
                expected,
                actual,
            })?;
        Self::from_dynamic(&DynamicImage::ImageRgba8(buffer))
    }

    /// Decode any image format the codec understands (PNG, TIFF, JPEG, ...).
    pub fn decode(bytes: &[u8]) -> Result<Self, ContentError> {
        let decoded = image::load_from_memory(bytes)?;
        Self::from_dynamic(&decoded)
    }

    /// Load and decode an image file. The format is sniffed from the file
    /// contents; the extension is only a fallback.
    pub fn open(path: &Path) -> Result<Self, ContentError> {
        let decoded = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Self::from_dynamic(&decoded)
    }

    fn from_dynamic(decoded: &DynamicImage) -> Result<Self, ContentError> {
        let rgba = DynamicImage::ImageRgba8(decoded.to_rgba8());
        let mut png = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            png: png.into(),
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The PNG-encoded bytes.
    #[must_use]
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Decode back to an RGBA8 pixel buffer, e.g. for writing to a clipboard.
    pub fn to_rgba(&self) -> Result<Vec<u8>, ContentError> {
        let decoded = image::load_from_memory_with_format(&self.png, ImageFormat::Png)?;
        Ok(decoded.to_rgba8().into_raw())
    }
}

impl PartialEq for ImageData {
    fn eq(&self, other: &Self) -> bool {
        self.png == other.png
    }
}

impl Eq for ImageData {}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_len", &self.png.len())
            .finish()
    }
}

/// Classified clipboard content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Content {
    Text(String),
    Image(ImageData),
    File(PathBuf),
}

impl Content {
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Text(_) => ContentKind::Text,
            Self::Image(_) => ContentKind::Image,
            Self::File(_) => ContentKind::File,
        }
    }

    /// Short one-line description for logs and listings.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Text(text) => {
                let line = text.lines().next().unwrap_or_default();
                let mut chars = line.chars();
                let head: String = chars.by_ref().take(SUMMARY_CHARS).collect();
                if chars.next().is_some() || line.len() < text.trim_end().len() {
                    format!("{head}…")
                } else {
                    head
                }
            }
            Self::Image(image) => format!("{}x{} image", image.width(), image.height()),
            Self::File(path) => path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned()),
        }
    }

    /// Payload size in bytes, used for size limits.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Image(image) => image.png_bytes().len(),
            Self::File(path) => path.as_os_str().len(),
        }
    }
}
