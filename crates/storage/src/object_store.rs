// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The object-store seam between booking operations and blob storage.

use crate::attachment::AttachmentFile;
use crate::error::StorageError;

/// A stored object's key and resolved public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// The object key (`<folder>/<uuid>.<ext>`).
    pub key: String,
    /// The durable public URL for the key.
    pub url: String,
}

/// Blob storage operations for attachment objects.
///
/// Implementations must give `upload` no-clobber semantics: an upload
/// never silently overwrites an existing object. Intentional overwrite
/// for edits goes through `update`.
pub trait ObjectStore: Send + Sync {
    /// Uploads a file under a freshly generated unique key in `folder`.
    ///
    /// The key is `folder/<random-uuid>.<ext>` with the extension derived
    /// from the declared MIME type. Two uploads of identical input
    /// produce distinct keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be written, including when
    /// the generated key already exists.
    fn upload(&self, file: &AttachmentFile, folder: &str) -> Result<StoredObject, StorageError>;

    /// Overwrites the object at an existing key with the file's bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be written.
    fn update(&self, file: &AttachmentFile, key: &str) -> Result<StoredObject, StorageError>;

    /// Removes the object at `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the object does not exist or cannot be removed.
    /// Callers on the booking-delete path treat failure as non-fatal.
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Resolves the public URL for an object key.
    fn public_url(&self, key: &str) -> String;
}
