// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attachment handling for the Booking Konseling service.
//!
//! This crate owns the KTM (student ID card) image pipeline: MIME and size
//! validation, unique object naming, and the [`ObjectStore`] abstraction a
//! booking operation uploads through. The store is an explicitly
//! constructed, dependency-injected object owned by the composition root,
//! never ambient process state.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod attachment;
mod error;
mod local;
mod object_store;

pub use attachment::{
    AttachmentFile, DEFAULT_MAX_ATTACHMENT_MB, KTM_FOLDER, attachment_key_from_url,
    extension_for_mime, validate_attachment,
};
pub use error::StorageError;
pub use local::LocalObjectStore;
pub use object_store::{ObjectStore, StoredObject};
