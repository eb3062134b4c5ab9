//! Image assets and the input validator
//!
//! An asset's content type is the one declared for the file, derived from its
//! extension. File contents are never sniffed.

use crate::error::InputError;
use std::fs;
use std::path::Path;

/// Extensions accepted as images, with their declared MIME type
pub const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("avif", "image/avif"),
    ("ico", "image/x-icon"),
    ("svg", "image/svg+xml"),
];

/// Declared type of anything that is not a known image
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// One of the two named image positions in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetSlot {
    Character,
    Reference,
}

impl AssetSlot {
    pub fn all() -> [AssetSlot; 2] {
        [AssetSlot::Character, AssetSlot::Reference]
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetSlot::Character => "Character image",
            AssetSlot::Reference => "Reference image",
        }
    }

    /// Multipart field name used when uploading this slot
    pub fn form_field(&self) -> &'static str {
        match self {
            AssetSlot::Character => "character_image",
            AssetSlot::Reference => "reference_image",
        }
    }
}

/// An in-memory image blob with its declared content type
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageAsset {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn size_label(&self) -> String {
        let len = self.bytes.len() as f64;
        if len < 1024.0 {
            format!("{} B", self.bytes.len())
        } else if len < 1024.0 * 1024.0 {
            format!("{:.1} KB", len / 1024.0)
        } else {
            format!("{:.1} MB", len / (1024.0 * 1024.0))
        }
    }
}

/// Declared MIME type for a path, based on its extension
pub fn declared_mime_type(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .and_then(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| *mime)
        })
        .unwrap_or(UNKNOWN_MIME_TYPE)
}

/// Accept an asset only if its declared type is an image
pub fn validate_image(asset: ImageAsset) -> Result<ImageAsset, InputError> {
    if asset.is_image() {
        Ok(asset)
    } else {
        Err(InputError::NotAnImage {
            file_name: asset.file_name,
            mime_type: asset.mime_type,
        })
    }
}

/// Read a file from disk as an image asset.
///
/// The declared type is checked before the file is read, so a non-image is
/// rejected without touching its contents.
pub fn read_image(path: &Path) -> Result<ImageAsset, InputError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = declared_mime_type(path);

    if !mime_type.starts_with("image/") {
        return Err(InputError::NotAnImage {
            file_name,
            mime_type: mime_type.to_string(),
        });
    }

    let bytes = fs::read(path).map_err(|source| InputError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    validate_image(ImageAsset::new(file_name, mime_type, bytes))
}
