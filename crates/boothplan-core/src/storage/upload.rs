//! Background image uploads.

use super::{StorageError, StorageResult};
use image::{ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use uuid::Uuid;

/// Result of storing a background upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    /// Opaque reference for fetching the image later.
    pub reference: String,
    pub width: u32,
    pub height: u32,
}

/// A stored image with its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Detect the format of an upload and read its native dimensions.
///
/// Returns a fresh reference (`<uuid>.<ext>`) together with the size.
pub fn probe_image(bytes: &[u8]) -> StorageResult<UploadedImage> {
    if bytes.is_empty() {
        return Err(StorageError::Image("Empty upload".to_string()));
    }
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| StorageError::Image(e.to_string()))?;
    let format = reader
        .format()
        .ok_or_else(|| StorageError::Image("Unrecognized image format".to_string()))?;
    let extension = format.extensions_str().first().copied().unwrap_or("img");
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| StorageError::Image(e.to_string()))?;
    if width == 0 || height == 0 {
        return Err(StorageError::Image(format!("Degenerate image {}x{}", width, height)));
    }

    Ok(UploadedImage {
        reference: format!("{}.{}", Uuid::new_v4(), extension),
        width,
        height,
    })
}

/// Media type for a stored reference, by extension.
pub fn content_type_for(reference: &str) -> &'static str {
    reference
        .rsplit_once('.')
        .and_then(|(_, ext)| ImageFormat::from_extension(ext))
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// References are `<uuid>.<ext>`; anything else cannot name a stored image.
pub(crate) fn is_valid_reference(reference: &str) -> bool {
    !reference.is_empty()
        && !reference.starts_with('.')
        && reference
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}

#[cfg(test)]
pub(crate) fn test_png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image::RgbaImage::new(width, height))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}
