//! Encoded image artifacts
//!
//! An artifact is what the API hands back and what the user downloads:
//! encoded bytes plus a MIME type. Decoding happens on demand.

use std::io::Cursor;
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageReader};

use crate::error::{AppError, AppResult};

/// Encoded raster image
///
/// Bytes are shared so the base and displayed copies of an unmodified
/// result do not duplicate the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    bytes: Arc<[u8]>,
    mime_type: String,
}

impl ImageArtifact {
    /// Create an artifact from encoded bytes
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Decode a base64 payload with a known MIME type
    pub fn from_base64(data: &str, mime_type: &str) -> AppResult<Self> {
        let bytes = general_purpose::STANDARD
            .decode(data.trim())
            .map_err(|e| AppError::InvalidFormat(format!("base64: {}", e)))?;
        Ok(Self::new(bytes, mime_type))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// True when both artifacts point at the same shared payload
    pub fn shares_payload(&self, other: &ImageArtifact) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes) && self.mime_type == other.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode into pixels
    pub fn decode(&self) -> AppResult<DynamicImage> {
        image::load_from_memory(&self.bytes).map_err(|e| AppError::Decode(e.to_string()))
    }

    /// Natural dimensions, read from the header without decoding pixels
    pub fn dimensions(&self) -> AppResult<(u32, u32)> {
        ImageReader::new(Cursor::new(&self.bytes[..]))
            .with_guessed_format()
            .map_err(|e| AppError::Decode(e.to_string()))?
            .into_dimensions()
            .map_err(|e| AppError::Decode(e.to_string()))
    }
}
