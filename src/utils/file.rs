//! File intake and download helpers
//!
//! Reads a local image into a `data:` URL and splits it back into its
//! base64 payload and MIME type, the shape the edit endpoint expects.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Fixed download name for generated images
pub const GENERATED_FILENAME: &str = "imagine-art-generated.jpg";
/// Fixed download name for edited images
pub const EDITED_FILENAME: &str = "imagine-art-edited.png";

const FALLBACK_MIME: &str = "application/octet-stream";

/// Base64 payload and MIME type of a data URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrlParts {
    pub base64: String,
    pub mime_type: String,
}

/// Split a data URL at its first comma.
///
/// Fails with `InvalidFormat` when either the header or the payload is
/// missing. The MIME type is read from between `:` and `;` in the header.
pub fn parse_data_url(url: &str) -> AppResult<DataUrlParts> {
    let (header, payload) = url
        .split_once(',')
        .ok_or_else(|| AppError::InvalidFormat("missing ',' separator".to_string()))?;

    // Anything after a second comma is not part of the payload
    let payload = payload.split(',').next().unwrap_or_default();

    if header.is_empty() || payload.is_empty() {
        return Err(AppError::InvalidFormat("missing header or payload".to_string()));
    }

    let mime_type = header
        .split_once(':')
        .and_then(|(_, rest)| rest.split_once(';'))
        .map(|(mime, _)| mime)
        .filter(|mime| !mime.is_empty())
        .unwrap_or(FALLBACK_MIME)
        .to_string();

    Ok(DataUrlParts {
        base64: payload.to_string(),
        mime_type,
    })
}

/// Sniff the MIME type of raw image bytes
pub fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME)
}

/// Build a base64 data URL from raw bytes
pub fn to_data_url(bytes: &[u8], mime_type: &str) -> String {
    format!(
        "data:{};base64,{}",
        mime_type,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Read a local file as a data URL and split it into base64 and MIME type
pub fn file_to_data_url<P: AsRef<Path>>(path: P) -> AppResult<DataUrlParts> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let url = to_data_url(&bytes, sniff_mime_type(&bytes));
    let parts = parse_data_url(&url)?;
    info!(
        "Read {} ({} bytes, {})",
        path.display(),
        bytes.len(),
        parts.mime_type
    );
    Ok(parts)
}

/// Save bytes under a fixed filename inside `dir`, creating `dir` if needed
pub fn save_download(dir: &Path, filename: &str, bytes: &[u8]) -> AppResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let target = dir.join(filename);
    std::fs::write(&target, bytes)?;
    info!("Saved {} bytes to {}", bytes.len(), target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_parse_data_url() {
        let parts = parse_data_url("data:image/png;base64,iVBORw0K").unwrap();
        assert_eq!(parts.mime_type, "image/png");
        assert_eq!(parts.base64, "iVBORw0K");
    }

    #[test]
    fn test_parse_data_url_without_mime() {
        let parts = parse_data_url("data:;base64,AAAA").unwrap();
        assert_eq!(parts.mime_type, "application/octet-stream");
    }

    #[test]
    fn test_parse_data_url_rejects_missing_parts() {
        assert!(matches!(parse_data_url("no-comma-here"), Err(AppError::InvalidFormat(_))));
        assert!(matches!(
            parse_data_url("data:image/png;base64,"),
            Err(AppError::InvalidFormat(_))
        ));
        assert!(matches!(parse_data_url(",AAAA"), Err(AppError::InvalidFormat(_))));
    }

    #[test]
    fn test_file_to_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        std::fs::write(&path, &bytes).unwrap();

        let parts = file_to_data_url(&path).unwrap();
        assert_eq!(parts.mime_type, "image/png");
        assert_eq!(general_purpose::STANDARD.decode(parts.base64).unwrap(), bytes);
    }

    #[test]
    fn test_empty_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        std::fs::write(&path, b"").unwrap();
        assert!(matches!(file_to_data_url(&path), Err(AppError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = file_to_data_url(dir.path().join("nope.png"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn test_save_download() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("downloads");
        let path = save_download(&out, EDITED_FILENAME, b"payload").unwrap();
        assert_eq!(path.file_name().unwrap(), EDITED_FILENAME);
        assert_eq!(std::fs::read(path).unwrap(), b"payload");
    }
}
