//! Image storage for uploads and spreadsheet imports.
//!
//! Files are stored under `{folder}/{unix_millis}-{random hex}.{ext}` and
//! addressed by a public URL built from the store's base URL.

use std::path::PathBuf;

use jagmart_core::ImageFolder;
use thiserror::Error;

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File must be an image")]
    NotAnImage,

    #[error("File size must be less than 5MB")]
    TooLarge,

    #[error("File is empty")]
    Empty,

    #[error("Image must be a PNG, JPEG, GIF or WebP")]
    UnsupportedFormat,

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Whether the caller sent a bad file, as opposed to a server fault.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

/// A stored image.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StoredImage {
    /// Public URL to put in `image_url` columns.
    pub url: String,
    /// Path relative to the store root.
    pub path: String,
}

/// Somewhere images can be written.
pub trait ImageStore: Send + Sync {
    /// Validate and store an image.
    ///
    /// # Errors
    ///
    /// Returns a client-facing `StorageError` if the content is not an
    /// acceptable image, or `StorageError::Io` if writing fails.
    fn store(
        &self,
        folder: ImageFolder,
        content_type: &str,
        bytes: &[u8],
    ) -> impl Future<Output = Result<StoredImage, StorageError>> + Send;
}

/// Check an upload against the type and size rules.
///
/// The declared type only has to be some `image/*`; the stored type comes
/// from the file's own bytes, so nothing but raster formats reaches `/media`.
///
/// # Errors
///
/// Returns `StorageError::NotAnImage` for a non-image declared type, and
/// otherwise the errors of [`validate_image_bytes`].
pub fn validate_image(content_type: &str, bytes: &[u8]) -> Result<&'static str, StorageError> {
    if !content_type.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(StorageError::NotAnImage);
    }
    validate_image_bytes(bytes)
}

/// Check size and format of image bytes and return their content type.
///
/// # Errors
///
/// Returns `StorageError::Empty`, `StorageError::TooLarge`, or
/// `StorageError::UnsupportedFormat` when the bytes are not PNG, JPEG, GIF
/// or WebP.
pub fn validate_image_bytes(bytes: &[u8]) -> Result<&'static str, StorageError> {
    if bytes.is_empty() {
        return Err(StorageError::Empty);
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(StorageError::TooLarge);
    }
    sniff_image_type(bytes).ok_or(StorageError::UnsupportedFormat)
}

/// Identify the accepted image formats by their magic bytes.
#[must_use]
pub fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP")
    {
        Some("image/webp")
    } else {
        None
    }
}

/// File extension for an accepted image content type.
#[must_use]
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

/// Build a fresh storage path for an image in `folder`.
#[must_use]
pub fn object_path(folder: ImageFolder, content_type: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = hex::encode(rand::random::<[u8; 8]>());
    format!(
        "{}/{millis}-{suffix}.{}",
        folder.as_str(),
        extension_for(content_type)
    )
}

/// Stores images on the local filesystem.
///
/// The storefront serves the same directory under `/media`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        format!("{}/{path}", self.public_base_url)
    }
}

impl ImageStore for LocalImageStore {
    async fn store(
        &self,
        folder: ImageFolder,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, StorageError> {
        let content_type = validate_image(content_type, bytes)?;

        let path = object_path(folder, content_type);
        let full_path = self.root.join(&path);
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full_path, bytes).await?;

        tracing::info!(path = %path, content_type, size = bytes.len(), "Image stored");
        Ok(StoredImage {
            url: self.public_url(&path),
            path,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\nrest";

    #[test]
    fn test_validate_image_rules() {
        assert_eq!(validate_image("image/png", PNG).unwrap(), "image/png");
        assert!(matches!(
            validate_image("application/pdf", PNG),
            Err(StorageError::NotAnImage)
        ));
        let mut big = PNG.to_vec();
        big.resize(MAX_IMAGE_BYTES + 1, 0);
        assert!(matches!(
            validate_image("image/png", &big),
            Err(StorageError::TooLarge)
        ));
        big.truncate(MAX_IMAGE_BYTES);
        assert!(validate_image("image/png", &big).is_ok());
        assert!(matches!(validate_image("image/gif", b""), Err(StorageError::Empty)));
    }

    #[test]
    fn test_type_comes_from_bytes() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10];
        assert_eq!(validate_image("image/png", &jpeg).unwrap(), "image/jpeg");
        assert_eq!(validate_image_bytes(b"GIF89a..").unwrap(), "image/gif");
        assert_eq!(
            validate_image_bytes(b"RIFF\0\0\0\0WEBPVP8 ").unwrap(),
            "image/webp"
        );
    }

    #[test]
    fn test_svg_and_other_non_raster_images_rejected() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"><script>alert(1)</script></svg>"#;
        assert!(matches!(
            validate_image("image/svg+xml", svg),
            Err(StorageError::UnsupportedFormat)
        ));
        assert!(matches!(
            validate_image("image/png", b"<html>"),
            Err(StorageError::UnsupportedFormat)
        ));
        assert!(StorageError::UnsupportedFormat.is_client_error());
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("image/webp"), "webp");
        assert_eq!(extension_for("image/svg+xml"), "bin");
    }

    #[test]
    fn test_object_path_shape() {
        let path = object_path(ImageFolder::Products, "image/png");
        let (folder, file) = path.split_once('/').unwrap();
        assert_eq!(folder, "products");
        let (stem, ext) = file.rsplit_once('.').unwrap();
        assert_eq!(ext, "png");
        let (millis, suffix) = stem.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 16);
    }

    #[tokio::test]
    async fn test_local_store_writes_file() {
        let root = std::env::temp_dir().join(format!(
            "jagmart-store-{}",
            hex::encode(rand::random::<[u8; 6]>())
        ));
        let store = LocalImageStore::new(&root, "https://cdn.jagmart.in/media/");

        let stored = store
            .store(ImageFolder::Categories, "image/jpeg", PNG)
            .await
            .unwrap();

        assert!(stored.path.starts_with("categories/"));
        assert!(stored.path.ends_with(".png"));
        assert_eq!(
            stored.url,
            format!("https://cdn.jagmart.in/media/{}", stored.path)
        );
        let written = tokio::fs::read(root.join(&stored.path)).await.unwrap();
        assert_eq!(written, PNG);

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_local_store_rejects_non_image() {
        let store = LocalImageStore::new(std::env::temp_dir(), "/media");
        let result = store
            .store(ImageFolder::Products, "text/plain", b"hello")
            .await;
        assert!(matches!(result, Err(StorageError::NotAnImage)));

        let result = store
            .store(ImageFolder::Products, "image/svg+xml", b"<svg/>")
            .await;
        assert!(matches!(result, Err(StorageError::UnsupportedFormat)));
    }
}
