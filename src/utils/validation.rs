use anyhow::{Result, anyhow};
use std::path::Path;

/// MIME types accepted for menu item photos
pub const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Extensions accepted for menu item photos
pub const ALLOWED_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".webp"];

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates photo size against the configured cap
pub fn validate_photo_size(size: usize, max_size: usize) -> Result<()> {
    if size > max_size {
        return Err(anyhow!(ValidationError {
            code: "FILE_TOO_LARGE",
            message: format!(
                "File size {} bytes exceeds maximum allowed {} bytes ({} MB)",
                size,
                max_size,
                max_size / 1024 / 1024
            ),
        }));
    }
    Ok(())
}

/// Validates the declared MIME type against the image allowlist
pub fn validate_photo_mime(content_type: &str) -> Result<()> {
    let normalized = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    if ALLOWED_MIME_TYPES.contains(&normalized.as_str()) {
        return Ok(());
    }

    Err(anyhow!(ValidationError {
        code: "INVALID_MIME_TYPE",
        message: format!(
            "MIME type '{}' is not allowed. Allowed types: {}",
            content_type,
            ALLOWED_MIME_TYPES.join(", ")
        ),
    }))
}

/// Validates the filename extension against the image allowlist and returns
/// the lowercased extension (with leading dot).
pub fn validate_photo_extension(filename: &str) -> Result<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Ok(ext);
    }

    Err(anyhow!(ValidationError {
        code: "INVALID_EXTENSION",
        message: format!(
            "File extension '{}' is not allowed. Allowed extensions: {}",
            ext,
            ALLOWED_EXTENSIONS.join(", ")
        ),
    }))
}

/// Sniffs the file content and rejects anything that is not actually one of
/// the allowed image formats, regardless of the declared MIME type.
pub fn validate_photo_content(data: &[u8]) -> Result<()> {
    let detected = infer::get(data);

    match detected {
        Some(kind) if ALLOWED_MIME_TYPES.contains(&kind.mime_type()) => Ok(()),
        Some(kind) => Err(anyhow!(ValidationError {
            code: "INVALID_FILE_CONTENT",
            message: format!(
                "File content detected as '{}', which is not an allowed image format",
                kind.mime_type()
            ),
        })),
        None => Err(anyhow!(ValidationError {
            code: "INVALID_FILE_CONTENT",
            message: "File content could not be recognized as an image".to_string(),
        })),
    }
}
