//! Decoding of images embedded in spreadsheet cells.
//!
//! A cell holds either a data URL (`data:image/png;base64,...`) or bare
//! base64. Either way the stored format is sniffed from the decoded bytes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::storage::{validate_image, validate_image_bytes};

/// An image decoded from a cell, ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Decode an image cell.
///
/// # Errors
///
/// Returns a row-level message when the cell is not valid base64, is not a
/// recognizable image, or breaks the upload size and type rules.
pub fn decode_image_cell(cell: &str) -> Result<DecodedImage, String> {
    let cell = cell.trim();

    let (declared_type, payload) = match cell.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| "image data URL is missing its ',' separator".to_string())?;
            let Some(content_type) = header.strip_suffix(";base64") else {
                return Err("image data URL must be base64-encoded".to_string());
            };
            (Some(content_type.trim().to_ascii_lowercase()), payload)
        }
        None => (None, cell),
    };

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| format!("image is not valid base64 ({e})"))?;

    let content_type = match declared_type {
        Some(declared) => validate_image(&declared, &bytes),
        None => validate_image_bytes(&bytes),
    }
    .map_err(|e| e.to_string())?;

    Ok(DecodedImage {
        content_type: content_type.to_string(),
        bytes,
    })
}
