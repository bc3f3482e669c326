// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Booking Konseling service.
//!
//! This crate provides the document store behind the booking lifecycle:
//! the `bookings`, `students`, `accounts`, `sessions`, and `admins`
//! collections, built on Diesel over `SQLite`.
//!
//! ## Backend
//!
//! `SQLite` is the sole backend:
//! - file-backed databases (WAL mode) for deployments
//! - shared in-memory databases for unit and integration tests, with
//!   unique names from an atomic counter for deterministic isolation
//!
//! Migrations are embedded and applied on connect; foreign-key
//! enforcement is verified at startup.
//!
//! ## Decode policy
//!
//! List operations decode stored rows best-effort: records that fail to
//! decode are skipped and logged rather than failing the whole list. See
//! `queries::bookings`.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf
)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use diesel::SqliteConnection;
use konseling_domain::{AdminProfile, Booking, BookingStatus, Student};
use time::OffsetDateTime;
use uuid::Uuid;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{AccountData, SessionData, format_timestamp, parse_timestamp};
pub use error::PersistenceError;

use data_models::{AdminRow, BookingRow, NewAccountRow, NewSessionRow, StudentRow};

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// The persistence adapter owning one database connection.
///
/// Constructed by the composition root and injected into collaborators;
/// never ambient global state.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based
    /// collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("konseling_memdb_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;

        // WAL improves read concurrency for file-backed databases.
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Persists a new booking, assigning it a fresh id.
    ///
    /// The caller's `id` field is ignored; the generated id is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn create_booking(&mut self, booking: &Booking) -> Result<String, PersistenceError> {
        let booking_id: String = Uuid::new_v4().to_string();
        let mut row: BookingRow = BookingRow::from_domain(booking)?;
        row.id.clone_from(&booking_id);

        mutations::bookings::insert_booking(&mut self.conn, &row)?;

        Ok(booking_id)
    }

    /// Fetches a single booking by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the record cannot be decoded.
    pub fn get_booking(&mut self, booking_id: &str) -> Result<Option<Booking>, PersistenceError> {
        queries::bookings::get_booking(&mut self.conn, booking_id)
    }

    /// Lists one student's bookings, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bookings_for_user(
        &mut self,
        user_id: &str,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::bookings::list_bookings_for_user(&mut self.conn, user_id)
    }

    /// Lists all bookings, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_all_bookings(
        &mut self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::bookings::list_all_bookings(&mut self.conn, status)
    }

    /// Updates a booking's status as a single-field write.
    ///
    /// # Errors
    ///
    /// Returns `BookingNotFound` if no record matches the id.
    pub fn update_booking_status(
        &mut self,
        booking_id: &str,
        new_status: BookingStatus,
    ) -> Result<(), PersistenceError> {
        mutations::bookings::update_booking_status(&mut self.conn, booking_id, new_status)
    }

    /// Sets the counselor and moves the booking to `Ongoing` in one write.
    ///
    /// # Errors
    ///
    /// Returns `BookingNotFound` if no record matches the id.
    pub fn assign_counselor(
        &mut self,
        booking_id: &str,
        counselor_name: &str,
    ) -> Result<(), PersistenceError> {
        mutations::bookings::assign_counselor(&mut self.conn, booking_id, counselor_name)
    }

    /// Replaces a stored booking document.
    ///
    /// # Errors
    ///
    /// Returns `BookingNotFound` if no record matches the booking's id.
    pub fn update_booking(&mut self, booking: &Booking) -> Result<(), PersistenceError> {
        let row: BookingRow = BookingRow::from_domain(booking)?;
        mutations::bookings::update_booking(&mut self.conn, &row)
    }

    /// Deletes a booking record.
    ///
    /// # Errors
    ///
    /// Returns `BookingNotFound` if no record matches the id.
    pub fn delete_booking(&mut self, booking_id: &str) -> Result<(), PersistenceError> {
        mutations::bookings::delete_booking(&mut self.conn, booking_id)
    }

    // ========================================================================
    // Students
    // ========================================================================

    /// Persists a new student profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn create_student(&mut self, student: &Student) -> Result<(), PersistenceError> {
        let row: StudentRow = StudentRow::from_domain(student);
        mutations::students::insert_student(&mut self.conn, &row)
    }

    /// Fetches a student profile by uid.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_student(&mut self, uid: &str) -> Result<Option<Student>, PersistenceError> {
        queries::students::get_student(&mut self.conn, uid)
    }

    /// Lists every registered student.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_students(&mut self) -> Result<Vec<Student>, PersistenceError> {
        queries::students::list_students(&mut self.conn)
    }

    // ========================================================================
    // Accounts & sessions
    // ========================================================================

    /// Persists a new auth account.
    ///
    /// # Errors
    ///
    /// Returns `AccountExists` if the email is already registered.
    pub fn create_account(
        &mut self,
        uid: &str,
        email: &str,
        password_hash: &str,
        created_at: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        let row: NewAccountRow = NewAccountRow {
            uid: uid.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: format_timestamp(created_at)?,
        };
        mutations::accounts::insert_account(&mut self.conn, &row)
    }

    /// Fetches an account by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_account_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_email(&mut self.conn, email)
    }

    /// Fetches an account by uid.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_account_by_uid(
        &mut self,
        uid: &str,
    ) -> Result<Option<AccountData>, PersistenceError> {
        queries::accounts::get_account_by_uid(&mut self.conn, uid)
    }

    /// Persists a new login session.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn create_session(
        &mut self,
        token: &str,
        account_uid: &str,
        created_at: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        let created: String = format_timestamp(created_at)?;
        let row: NewSessionRow = NewSessionRow {
            token: token.to_string(),
            account_uid: account_uid.to_string(),
            created_at: created.clone(),
            expires_at: format_timestamp(expires_at)?,
            last_seen_at: created,
        };
        mutations::accounts::insert_session(&mut self.conn, &row)
    }

    /// Fetches a session by its token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::accounts::get_session_by_token(&mut self.conn, token)
    }

    /// Deletes a session by token, returning whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, token: &str) -> Result<bool, PersistenceError> {
        mutations::accounts::delete_session(&mut self.conn, token)
    }

    /// Records session activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(
        &mut self,
        session_id: i64,
        last_seen_at: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        let last_seen: String = format_timestamp(last_seen_at)?;
        mutations::accounts::update_session_activity(&mut self.conn, session_id, &last_seen)
    }

    // ========================================================================
    // Admin markers
    // ========================================================================

    /// Persists an admin role-marker record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn create_admin_profile(&mut self, admin: &AdminProfile) -> Result<(), PersistenceError> {
        let row: AdminRow = AdminRow::from_domain(admin)?;
        mutations::accounts::insert_admin(&mut self.conn, &row)
    }

    /// Fetches an admin role-marker record by uid.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_admin_profile(
        &mut self,
        uid: &str,
    ) -> Result<Option<AdminProfile>, PersistenceError> {
        queries::accounts::get_admin_profile(&mut self.conn, uid)
    }

    /// Inserts a raw booking row, bypassing domain validation.
    ///
    /// Test-only hook for exercising the malformed-record skip policy.
    #[cfg(test)]
    pub(crate) fn insert_raw_booking_row(
        &mut self,
        row: &BookingRow,
    ) -> Result<(), PersistenceError> {
        mutations::bookings::insert_booking(&mut self.conn, row)
    }
}
