// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for attachment validation and object storage.

use thiserror::Error;

/// Errors that can occur while validating or storing an attachment.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file's MIME type is missing or outside the image allow-list.
    #[error("Unsupported file type: {mime_type}")]
    UnsupportedType {
        /// The rejected MIME type, or `"unknown"` when unreadable.
        mime_type: String,
    },

    /// The file exceeds the size cap.
    #[error("File too large: {size} bytes exceeds the {max_mb} MB limit")]
    TooLarge {
        /// The file's byte length.
        size: usize,
        /// The configured cap in megabytes.
        max_mb: usize,
    },

    /// The file's bytes could not be read.
    #[error("File is empty or unreadable")]
    Unreadable,

    /// An object with the generated key already exists (no-clobber upload).
    #[error("Object already exists: {key}")]
    AlreadyExists {
        /// The conflicting object key.
        key: String,
    },

    /// The named object does not exist.
    #[error("Object not found: {key}")]
    NotFound {
        /// The missing object key.
        key: String,
    },

    /// An I/O error from the underlying store.
    #[error("Storage I/O error for '{key}': {source}")]
    Io {
        /// The object key involved.
        key: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
