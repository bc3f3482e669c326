// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Filesystem-backed object store.
//!
//! Objects live under a root directory, keyed `<folder>/<uuid>.<ext>`;
//! public URLs are the configured base URL joined with the key. The
//! served base URL is expected to map onto the root directory.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::attachment::{AttachmentFile, extension_for_mime};
use crate::error::StorageError;
use crate::object_store::{ObjectStore, StoredObject};

/// Object store rooted at a local directory.
pub struct LocalObjectStore {
    /// Directory all objects live under.
    root: PathBuf,
    /// Public URL prefix for stored objects, without trailing slash.
    base_url: String,
}

impl LocalObjectStore {
    /// Creates a store rooted at `root`, creating the directory if needed.
    ///
    /// # Arguments
    ///
    /// * `root` - Directory all objects live under
    /// * `base_url` - Public URL prefix objects resolve beneath
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be created.
    pub fn new<P: AsRef<Path>>(root: P, base_url: &str) -> Result<Self, StorageError> {
        let root: PathBuf = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| StorageError::Io {
            key: root.display().to_string(),
            source: e,
        })?;

        Ok(Self {
            root,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolves the filesystem path for an object key.
    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Writes `bytes` to `key`, creating parent directories.
    ///
    /// With `clobber` false the write fails if the object already exists.
    fn write_object(&self, key: &str, bytes: &[u8], clobber: bool) -> Result<(), StorageError> {
        let path: PathBuf = self.object_path(key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io {
                key: key.to_string(),
                source: e,
            })?;
        }

        let mut open_options = fs::OpenOptions::new();
        open_options.write(true);
        if clobber {
            open_options.create(true).truncate(true);
        } else {
            open_options.create_new(true);
        }

        let mut file = open_options.open(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                StorageError::AlreadyExists {
                    key: key.to_string(),
                }
            } else {
                StorageError::Io {
                    key: key.to_string(),
                    source: e,
                }
            }
        })?;

        file.write_all(bytes).map_err(|e| StorageError::Io {
            key: key.to_string(),
            source: e,
        })
    }
}

impl ObjectStore for LocalObjectStore {
    fn upload(&self, file: &AttachmentFile, folder: &str) -> Result<StoredObject, StorageError> {
        let extension: &str = extension_for_mime(file.content_type.as_deref());
        let key: String = format!("{folder}/{}.{extension}", Uuid::new_v4());

        self.write_object(&key, &file.bytes, false)?;

        let url: String = self.public_url(&key);
        debug!(key = %key, size = file.bytes.len(), "Stored attachment object");

        Ok(StoredObject { key, url })
    }

    fn update(&self, file: &AttachmentFile, key: &str) -> Result<StoredObject, StorageError> {
        self.write_object(key, &file.bytes, true)?;

        Ok(StoredObject {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path: PathBuf = self.object_path(key);
        fs::remove_file(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound {
                    key: key.to_string(),
                }
            } else {
                StorageError::Io {
                    key: key.to_string(),
                    source: e,
                }
            }
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::KTM_FOLDER;

    fn test_store() -> (LocalObjectStore, PathBuf) {
        let root = std::env::temp_dir().join(format!("konseling-store-{}", Uuid::new_v4()));
        let store = LocalObjectStore::new(&root, "http://localhost:3000/files")
            .expect("Failed to create test store");
        (store, root)
    }

    fn test_file() -> AttachmentFile {
        AttachmentFile::new(
            Some(String::from("ktm.png")),
            Some(String::from("image/png")),
            vec![1_u8, 2, 3, 4],
        )
    }

    #[test]
    fn test_upload_stores_bytes_under_generated_key() {
        let (store, root) = test_store();

        let stored = store.upload(&test_file(), KTM_FOLDER).expect("upload failed");
        assert!(stored.key.starts_with("ktm/"));
        assert!(stored.key.ends_with(".png"));
        assert_eq!(
            stored.url,
            format!("http://localhost:3000/files/{}", stored.key)
        );

        let on_disk = fs::read(root.join(&stored.key)).expect("object missing");
        assert_eq!(on_disk, vec![1, 2, 3, 4]);

        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_repeated_upload_produces_distinct_keys() {
        let (store, root) = test_store();
        let file = test_file();

        let first = store.upload(&file, KTM_FOLDER).expect("first upload failed");
        let second = store.upload(&file, KTM_FOLDER).expect("second upload failed");

        assert_ne!(first.key, second.key);
        assert_ne!(first.url, second.url);

        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_update_overwrites_existing_object() {
        let (store, root) = test_store();

        let stored = store.upload(&test_file(), KTM_FOLDER).expect("upload failed");
        let replacement = AttachmentFile::new(
            Some(String::from("ktm2.png")),
            Some(String::from("image/png")),
            vec![9_u8, 9],
        );

        store.update(&replacement, &stored.key).expect("update failed");

        let on_disk = fs::read(root.join(&stored.key)).expect("object missing");
        assert_eq!(on_disk, vec![9, 9]);

        fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_delete_removes_object() {
        let (store, root) = test_store();

        let stored = store.upload(&test_file(), KTM_FOLDER).expect("upload failed");
        store.delete(&stored.key).expect("delete failed");
        assert!(!root.join(&stored.key).exists());

        // A second delete reports the object as missing.
        assert!(matches!(
            store.delete(&stored.key),
            Err(StorageError::NotFound { .. })
        ));

        fs::remove_dir_all(root).ok();
    }
}
