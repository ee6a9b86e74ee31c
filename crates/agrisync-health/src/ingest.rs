//! Turns a user-selected image file into a payload for the inference service.

use std::path::{Path, PathBuf};

use agrisync_bridge::analysis::ValidationError;
use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Default upper bound for inline image payloads.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// An image picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    /// Media type reported by whoever picked the file, if any.
    pub declared_type: Option<String>,
}

impl ImageFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            declared_type: None,
        }
    }

    pub fn with_declared_type(mut self, media_type: impl Into<String>) -> Self {
        self.declared_type = Some(media_type.into());
        self
    }
}

/// Image bytes ready for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Standard base64 of the file contents. Never carries a `data:` prefix.
    pub base64_payload: String,
    pub mime_type: String,
}

/// Validates and encodes image files.
#[derive(Debug, Clone, Copy)]
pub struct ImageIngest {
    max_bytes: u64,
}

impl Default for ImageIngest {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IMAGE_BYTES)
    }
}

impl ImageIngest {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Reads and encodes `file`. Resolves exactly once, either with the
    /// encoded image or with the reason it cannot be analyzed.
    pub async fn encode(&self, file: Option<&ImageFile>) -> Result<EncodedImage, ValidationError> {
        let file = file.ok_or(ValidationError::NoImageSelected)?;

        if let Some(declared) = file.declared_type.as_deref() {
            if !is_image_media_type(declared) {
                return Err(ValidationError::UnsupportedMediaType(declared.to_owned()));
            }
        }

        let metadata = tokio::fs::metadata(&file.path)
            .await
            .map_err(|e| ValidationError::Unreadable(e.to_string()))?;
        if !metadata.is_file() {
            return Err(ValidationError::Unreadable(format!(
                "{} is not a regular file",
                file.path.display()
            )));
        }
        if metadata.len() == 0 {
            return Err(ValidationError::Empty);
        }
        if metadata.len() > self.max_bytes {
            return Err(ValidationError::TooLarge {
                size: metadata.len(),
                limit: self.max_bytes,
            });
        }

        let bytes = tokio::fs::read(&file.path)
            .await
            .map_err(|e| ValidationError::Unreadable(e.to_string()))?;
        if bytes.is_empty() {
            return Err(ValidationError::Empty);
        }

        let mime_type = match file.declared_type.as_deref() {
            Some(declared) => media_type_essence(declared),
            None => detect_media_type(&file.path, &bytes)?.to_owned(),
        };

        log::debug!(
            "Encoded {} ({} bytes, {mime_type})",
            file.path.display(),
            bytes.len()
        );

        Ok(EncodedImage {
            base64_payload: STANDARD.encode(&bytes),
            mime_type,
        })
    }
}

/// `type/subtype` without parameters, lowercased.
fn media_type_essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn is_image_media_type(media_type: &str) -> bool {
    let essence = media_type_essence(media_type);
    match essence.split_once('/') {
        Some((kind, subtype)) => kind == "image" && !subtype.is_empty(),
        None => false,
    }
}

fn detect_media_type(path: &Path, bytes: &[u8]) -> Result<&'static str, ValidationError> {
    if let Some(sniffed) = sniff_media_type(bytes) {
        return Ok(sniffed);
    }

    // Formats without a reliable signature (HEIC, SVG) are trusted by name.
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref().and_then(media_type_for_extension) {
        Some(media_type) => Ok(media_type),
        None => Err(ValidationError::UnsupportedMediaType(
            extension
                .map(|ext| format!(".{ext}"))
                .unwrap_or_else(|| "application/octet-stream".to_owned()),
        )),
    }
}

fn sniff_media_type(bytes: &[u8]) -> Option<&'static str> {
    const SIGNATURES: [(&[u8], &str); 6] = [
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"II*\0", "image/tiff"),
        (b"MM\0*", "image/tiff"),
    ];

    for (signature, media_type) in SIGNATURES {
        if bytes.starts_with(signature) {
            return Some(media_type);
        }
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    if bytes.starts_with(b"BM") && bytes.len() >= 14 {
        return Some("image/bmp");
    }
    None
}

fn media_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn temp_file(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp file");
        file.write_all(contents).expect("write temp file");
        file
    }

    #[tokio::test]
    async fn encodes_png_without_data_uri_prefix() {
        let file = temp_file(".bin", PNG_HEADER);
        let encoded = ImageIngest::default()
            .encode(Some(&ImageFile::new(file.path())))
            .await
            .expect("png is accepted");

        assert_eq!(encoded.mime_type, "image/png");
        assert!(!encoded.base64_payload.starts_with("data:"));
        assert!(!encoded.base64_payload.contains(','));
        assert_eq!(
            STANDARD.decode(&encoded.base64_payload).expect("base64"),
            PNG_HEADER
        );
    }

    #[tokio::test]
    async fn missing_selection_is_rejected() {
        let error = ImageIngest::default().encode(None).await.unwrap_err();
        assert_eq!(error, ValidationError::NoImageSelected);
    }

    #[tokio::test]
    async fn text_file_is_rejected() {
        let file = temp_file(".txt", b"just some notes about the field");
        let error = ImageIngest::default()
            .encode(Some(&ImageFile::new(file.path())))
            .await
            .unwrap_err();
        assert_eq!(error, ValidationError::UnsupportedMediaType(".txt".into()));
    }

    #[tokio::test]
    async fn declared_non_image_type_is_rejected() {
        let file = temp_file(".png", PNG_HEADER);
        let error = ImageIngest::default()
            .encode(Some(
                &ImageFile::new(file.path()).with_declared_type("application/pdf"),
            ))
            .await
            .unwrap_err();
        assert_eq!(
            error,
            ValidationError::UnsupportedMediaType("application/pdf".into())
        );
    }

    #[tokio::test]
    async fn declared_type_parameters_are_stripped() {
        let file = temp_file(".bin", b"\xff\xd8\xff\xe0JFIF");
        let encoded = ImageIngest::default()
            .encode(Some(
                &ImageFile::new(file.path()).with_declared_type(" image/JPEG; q=0.9"),
            ))
            .await
            .expect("declared jpeg is accepted");
        assert_eq!(encoded.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let file = temp_file(".png", b"");
        let error = ImageIngest::default()
            .encode(Some(&ImageFile::new(file.path())))
            .await
            .unwrap_err();
        assert_eq!(error, ValidationError::Empty);
    }

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        let file = temp_file(".png", PNG_HEADER);
        let error = ImageIngest::new(4)
            .encode(Some(&ImageFile::new(file.path())))
            .await
            .unwrap_err();
        assert_eq!(
            error,
            ValidationError::TooLarge {
                size: PNG_HEADER.len() as u64,
                limit: 4
            }
        );
    }

    #[tokio::test]
    async fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = ImageIngest::default()
            .encode(Some(&ImageFile::new(dir.path().join("leaf.jpg"))))
            .await
            .unwrap_err();
        assert!(matches!(error, ValidationError::Unreadable(_)));
    }

    #[tokio::test]
    async fn heic_is_trusted_by_extension() {
        let file = temp_file(".HEIC", b"\0\0\0\x18ftypheic");
        let encoded = ImageIngest::default()
            .encode(Some(&ImageFile::new(file.path())))
            .await
            .expect("heic is accepted");
        assert_eq!(encoded.mime_type, "image/heic");
    }

    #[test]
    fn sniffs_common_formats() {
        assert_eq!(sniff_media_type(b"\xff\xd8\xff\xe0JFIF"), Some("image/jpeg"));
        assert_eq!(sniff_media_type(b"GIF89a\x01\0"), Some("image/gif"));
        assert_eq!(sniff_media_type(b"RIFF\x24\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_media_type(b"%PDF-1.7"), None);
    }

    #[test]
    fn media_type_parameters_are_ignored() {
        assert!(is_image_media_type("image/jpeg; q=0.9"));
        assert!(is_image_media_type("IMAGE/PNG"));
        assert!(!is_image_media_type("image/"));
        assert!(!is_image_media_type("text/plain"));
    }
}
