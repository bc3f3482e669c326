// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::path::PathBuf;

use konseling_persistence::Persistence;
use konseling_storage::{AttachmentFile, LocalObjectStore};
use time::macros::datetime;
use uuid::Uuid;

use crate::{AuthenticatedUser, CreateBookingRequest, RegisterRequest};

pub fn setup_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// Creates a filesystem store under a unique temp directory.
///
/// Callers remove the returned directory when they are done.
pub fn setup_test_store() -> (LocalObjectStore, PathBuf) {
    let root: PathBuf = std::env::temp_dir().join(format!("konseling-api-test-{}", Uuid::new_v4()));
    let store: LocalObjectStore = LocalObjectStore::new(&root, "http://localhost:3000/files")
        .expect("Failed to create test store");
    (store, root)
}

pub fn create_student_actor() -> AuthenticatedUser {
    AuthenticatedUser::new(
        String::from("student-123"),
        String::from("ana@student.ub.ac.id"),
    )
}

pub fn create_other_student_actor() -> AuthenticatedUser {
    AuthenticatedUser::new(
        String::from("student-456"),
        String::from("budi@student.ub.ac.id"),
    )
}

pub fn create_admin_actor() -> AuthenticatedUser {
    AuthenticatedUser::new(String::from("admin-789"), String::from("admin@admin.ub.ac.id"))
}

pub fn create_valid_request() -> CreateBookingRequest {
    CreateBookingRequest {
        student_name: String::from("Ana"),
        nim: String::from("12345678901"),
        study_program: String::from("Ilmu Komputer"),
        phone_number: String::from("081234567890"),
        session_date: datetime!(2026-03-02 10:00 UTC),
        session_slot: String::from("Sesi 1 (10.00 - 11.00)"),
    }
}

pub fn create_register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: String::from("rahasia123"),
        name: String::from("Ana"),
        nim: String::from("12345678901"),
        study_program: String::from("Ilmu Komputer"),
        phone_number: String::from("081234567890"),
    }
}

pub fn png_attachment(len: usize) -> AttachmentFile {
    AttachmentFile::new(
        Some(String::from("ktm.png")),
        Some(String::from("image/png")),
        vec![7_u8; len],
    )
}

pub fn pdf_attachment() -> AttachmentFile {
    AttachmentFile::new(
        Some(String::from("ktm.pdf")),
        Some(String::from("application/pdf")),
        vec![7_u8; 64],
    )
}
