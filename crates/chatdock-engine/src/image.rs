//! Export of image payloads to PNG files.

use base64::Engine;
use chrono::Utc;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::payload::IMAGE_PREFIX;

/// PNG file signature.
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Decode the bytes of a `data:image/png;base64,...` URI.
pub fn decode_png_data_uri(uri: &str) -> Result<Vec<u8>, ImageError> {
    let params = uri.strip_prefix(IMAGE_PREFIX).ok_or(ImageError::NotPng)?;
    let (_, data) = params
        .split_once("base64,")
        .ok_or(ImageError::NotBase64)?;
    base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(ImageError::Decode)
}

/// Save an image payload into `dir`, returning the written path.
///
/// Files are named `chart_<timestamp>_<id>.png`.
pub fn save_png(dir: &Path, uri: &str) -> Result<PathBuf, ImageError> {
    let bytes = decode_png_data_uri(uri)?;
    if !bytes.starts_with(PNG_SIGNATURE) {
        tracing::warn!("image payload lacks a PNG signature, saving anyway");
    }

    std::fs::create_dir_all(dir).map_err(ImageError::Io)?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let id = Uuid::new_v4().simple().to_string();
    let path = dir.join(format!("chart_{timestamp}_{}.png", &id[..8]));

    std::fs::write(&path, bytes).map_err(ImageError::Io)?;
    Ok(path)
}

/// Errors that can occur when exporting an image payload.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// Payload is not a PNG data URI.
    #[error("payload is not a PNG data URI")]
    NotPng,

    /// Data URI does not carry base64 data.
    #[error("data URI is not base64-encoded")]
    NotBase64,

    /// Base64 data is malformed.
    #[error("invalid base64 data: {0}")]
    Decode(#[source] base64::DecodeError),

    /// I/O error writing the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
