//! Image upload policy: accepted MIME types, size limit, and stored names.
//!
//! The HTTP layer streams multipart fields through [`UploadGuard`] so an
//! oversized file is rejected as soon as it crosses the limit instead of
//! after it has been buffered in full.

use std::path::Path;

use rand::Rng;

/// Largest accepted image, in bytes (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Exclusive upper bound of the random filename suffix.
const SUFFIX_BOUND: u32 = 1_000_000_000;

/// Longest extension carried over from the client filename.
const MAX_EXTENSION_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("File size exceeds the 5MB limit")]
    FileTooLarge,

    #[error("Only image files are allowed")]
    NotAnImage,

    #[error("Unexpected file field '{0}'")]
    UnexpectedField(String),

    #[error("Only one file may be uploaded per request")]
    TooManyFiles,
}

/// Whether `content_type` names an image MIME type (`image/*`).
pub fn is_image_mime(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}

/// Reject anything that is not `image/*`.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), UploadError> {
    match content_type {
        Some(ct) if is_image_mime(ct) => Ok(()),
        _ => Err(UploadError::NotAnImage),
    }
}

/// Tracks bytes received for one file and enforces [`MAX_UPLOAD_BYTES`].
#[derive(Debug)]
pub struct UploadGuard {
    limit: usize,
    received: usize,
}

impl UploadGuard {
    pub fn new(limit: usize) -> Self {
        Self { limit, received: 0 }
    }

    /// Account for `len` more bytes, failing once the total exceeds the limit.
    pub fn accept(&mut self, len: usize) -> Result<(), UploadError> {
        self.received = self.received.saturating_add(len);
        if self.received > self.limit {
            return Err(UploadError::FileTooLarge);
        }
        Ok(())
    }

    pub fn received(&self) -> usize {
        self.received
    }
}

impl Default for UploadGuard {
    fn default() -> Self {
        Self::new(MAX_UPLOAD_BYTES)
    }
}

/// Lower-cased extension of `original_name` including the leading dot.
///
/// Returns an empty string for names without an extension, dotfiles, or
/// extensions containing anything but ASCII alphanumerics.
pub fn extension_of(original_name: &str) -> String {
    let basename = original_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(original_name);

    match Path::new(basename).extension().and_then(|e| e.to_str()) {
        Some(ext)
            if !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => String::new(),
    }
}

/// Format a stored filename: `{field}-{unix_millis}-{suffix}{ext}`.
pub fn stored_filename(field: &str, original_name: &str, unix_millis: i64, suffix: u32) -> String {
    format!(
        "{field}-{unix_millis}-{suffix}{}",
        extension_of(original_name)
    )
}

/// Generate a collision-resistant stored filename for a new upload.
pub fn generate_stored_filename(field: &str, original_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = rand::rng().random_range(0..SUFFIX_BOUND);
    stored_filename(field, original_name, millis, suffix)
}
