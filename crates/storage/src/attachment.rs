// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attachment files and their validation rules.

use crate::error::StorageError;

/// Storage folder for KTM (student ID card) images.
pub const KTM_FOLDER: &str = "ktm";

/// Default attachment size cap in megabytes.
pub const DEFAULT_MAX_ATTACHMENT_MB: usize = 5;

/// MIME types accepted for attachment upload.
const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// An attachment as received from a client, held fully in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentFile {
    /// Client-supplied file name, if any. Informational only; stored
    /// objects are named by generated key.
    pub file_name: Option<String>,
    /// Declared MIME type, if any.
    pub content_type: Option<String>,
    /// The file's bytes.
    pub bytes: Vec<u8>,
}

impl AttachmentFile {
    /// Creates an attachment from its parts.
    #[must_use]
    pub const fn new(
        file_name: Option<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Returns true if the declared MIME type is on the image allow-list.
    ///
    /// A missing MIME type is rejected.
    #[must_use]
    pub fn is_allowed_type(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|mime| ALLOWED_MIME_TYPES.contains(&mime))
    }

    /// Returns true if the byte length fits within `max_mb` megabytes.
    ///
    /// A file of exactly `max_mb * 1024 * 1024` bytes is accepted.
    /// An empty file counts as unreadable and is rejected.
    #[must_use]
    pub const fn fits_size(&self, max_mb: usize) -> bool {
        !self.bytes.is_empty() && self.bytes.len() <= max_mb * 1024 * 1024
    }
}

/// Validates an attachment's type and size before upload.
///
/// Type is checked first: a disallowed MIME type is rejected regardless
/// of size.
///
/// # Errors
///
/// Returns `StorageError::UnsupportedType`, `StorageError::Unreadable`,
/// or `StorageError::TooLarge`.
pub fn validate_attachment(file: &AttachmentFile, max_mb: usize) -> Result<(), StorageError> {
    if !file.is_allowed_type() {
        return Err(StorageError::UnsupportedType {
            mime_type: file
                .content_type
                .clone()
                .unwrap_or_else(|| String::from("unknown")),
        });
    }

    if file.bytes.is_empty() {
        return Err(StorageError::Unreadable);
    }

    if !file.fits_size(max_mb) {
        return Err(StorageError::TooLarge {
            size: file.bytes.len(),
            max_mb,
        });
    }

    Ok(())
}

/// Maps a MIME type to the stored file extension.
///
/// Unknown or missing types default to `jpg`.
#[must_use]
pub fn extension_for_mime(content_type: Option<&str>) -> &'static str {
    match content_type {
        Some("image/jpeg" | "image/jpg") => "jpg",
        Some("image/png") => "png",
        Some("image/gif") => "gif",
        Some("image/webp") => "webp",
        _ => "jpg",
    }
}

/// Derives the attachment object key from a stored public URL.
///
/// Objects are keyed `ktm/<name>`; the URL's last path segment is the
/// name. Returns `None` for empty URLs or URLs with no path segment.
#[must_use]
pub fn attachment_key_from_url(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    let name = url.rsplit('/').next()?;
    if name.is_empty() {
        return None;
    }
    Some(format!("{KTM_FOLDER}/{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_file(content_type: &str, len: usize) -> AttachmentFile {
        AttachmentFile::new(
            Some(String::from("ktm.jpg")),
            Some(String::from(content_type)),
            vec![0_u8; len],
        )
    }

    #[test]
    fn test_allow_list_accepts_images() {
        for mime in ["image/jpeg", "image/jpg", "image/png", "image/gif", "image/webp"] {
            assert!(image_file(mime, 16).is_allowed_type(), "{mime} must pass");
        }
    }

    #[test]
    fn test_type_outside_allow_list_rejected_regardless_of_size() {
        let small = image_file("application/pdf", 16);
        assert!(!small.is_allowed_type());
        assert!(matches!(
            validate_attachment(&small, DEFAULT_MAX_ATTACHMENT_MB),
            Err(StorageError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_missing_mime_type_rejected() {
        let file = AttachmentFile::new(None, None, vec![0_u8; 16]);
        assert!(!file.is_allowed_type());
    }

    #[test]
    fn test_size_boundary_is_inclusive() {
        let max_bytes = DEFAULT_MAX_ATTACHMENT_MB * 1024 * 1024;

        let at_limit = image_file("image/png", max_bytes);
        assert!(validate_attachment(&at_limit, DEFAULT_MAX_ATTACHMENT_MB).is_ok());

        let one_over = image_file("image/png", max_bytes + 1);
        assert!(matches!(
            validate_attachment(&one_over, DEFAULT_MAX_ATTACHMENT_MB),
            Err(StorageError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_empty_file_rejected() {
        let empty = image_file("image/png", 0);
        assert!(matches!(
            validate_attachment(&empty, DEFAULT_MAX_ATTACHMENT_MB),
            Err(StorageError::Unreadable)
        ));
    }

    #[test]
    fn test_extension_lookup_defaults_to_jpg() {
        assert_eq!(extension_for_mime(Some("image/jpeg")), "jpg");
        assert_eq!(extension_for_mime(Some("image/png")), "png");
        assert_eq!(extension_for_mime(Some("image/webp")), "webp");
        assert_eq!(extension_for_mime(Some("text/plain")), "jpg");
        assert_eq!(extension_for_mime(None), "jpg");
    }

    #[test]
    fn test_key_from_url() {
        assert_eq!(
            attachment_key_from_url("http://localhost:3000/files/ktm/abc123.jpg"),
            Some(String::from("ktm/abc123.jpg"))
        );
        assert_eq!(attachment_key_from_url(""), None);
    }
}
