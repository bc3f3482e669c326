// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and conversions between stored rows and domain values.
//!
//! Timestamps are persisted as ISO 8601 text in UTC; the uniform format
//! keeps lexicographic ordering chronological for `ORDER BY created_at`.

use std::str::FromStr;

use diesel::prelude::*;
use konseling_domain::{AdminProfile, Booking, BookingStatus, SessionSlot, Student};
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

use crate::diesel_schema::{accounts, admins, bookings, sessions, students};
use crate::error::PersistenceError;

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns a `SerializationError` if formatting fails.
pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, PersistenceError> {
    timestamp
        .format(&Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::SerializationError(format!("format timestamp: {e}")))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns a `SerializationError` if the stored text is not ISO 8601.
pub fn parse_timestamp(s: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(s, &Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::SerializationError(format!("parse timestamp '{s}': {e}")))
}

/// A stored booking record.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = bookings)]
pub struct BookingRow {
    pub id: String,
    pub user_id: String,
    pub student_name: String,
    pub nim: String,
    pub study_program: String,
    pub phone_number: String,
    pub session_date: String,
    pub session_slot: String,
    pub counselor: String,
    pub status: String,
    pub ktm_url: String,
    pub created_at: String,
}

impl BookingRow {
    /// Converts a domain booking into its stored form.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be formatted.
    pub fn from_domain(booking: &Booking) -> Result<Self, PersistenceError> {
        Ok(Self {
            id: booking.id.clone(),
            user_id: booking.user_id.clone(),
            student_name: booking.student_name.clone(),
            nim: booking.nim.clone(),
            study_program: booking.study_program.clone(),
            phone_number: booking.phone_number.clone(),
            session_date: format_timestamp(booking.session_date)?,
            session_slot: booking.session_slot.as_str().to_string(),
            counselor: booking.counselor.clone(),
            status: booking.status.as_str().to_string(),
            ktm_url: booking.ktm_url.clone(),
            created_at: format_timestamp(booking.created_at)?,
        })
    }
}

impl TryFrom<BookingRow> for Booking {
    type Error = PersistenceError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status: BookingStatus = BookingStatus::from_str(&row.status)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let session_slot: SessionSlot = SessionSlot::from_str(&row.session_slot)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            student_name: row.student_name,
            nim: row.nim,
            study_program: row.study_program,
            phone_number: row.phone_number,
            session_date: parse_timestamp(&row.session_date)?,
            session_slot,
            counselor: row.counselor,
            status,
            ktm_url: row.ktm_url,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

/// A stored student profile.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = students)]
pub struct StudentRow {
    pub uid: String,
    pub name: String,
    pub nim: String,
    pub study_program: String,
    pub phone_number: String,
    pub email: String,
    pub photo_url: String,
}

impl StudentRow {
    /// Converts a domain student profile into its stored form.
    #[must_use]
    pub fn from_domain(student: &Student) -> Self {
        Self {
            uid: student.uid.clone(),
            name: student.name.clone(),
            nim: student.nim.clone(),
            study_program: student.study_program.clone(),
            phone_number: student.phone_number.clone(),
            email: student.email.clone(),
            photo_url: student.photo_url.clone(),
        }
    }
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Self {
            uid: row.uid,
            name: row.name,
            nim: row.nim,
            study_program: row.study_program,
            phone_number: row.phone_number,
            email: row.email,
            photo_url: row.photo_url,
        }
    }
}

/// A stored admin role-marker record.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = admins)]
pub struct AdminRow {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

impl AdminRow {
    /// Converts a domain admin profile into its stored form.
    ///
    /// # Errors
    ///
    /// Returns an error if the creation timestamp cannot be formatted.
    pub fn from_domain(admin: &AdminProfile) -> Result<Self, PersistenceError> {
        Ok(Self {
            uid: admin.uid.clone(),
            name: admin.name.clone(),
            email: admin.email.clone(),
            role: admin.role.clone(),
            created_at: format_timestamp(admin.created_at)?,
        })
    }
}

impl TryFrom<AdminRow> for AdminProfile {
    type Error = PersistenceError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        Ok(Self {
            uid: row.uid,
            name: row.name,
            email: row.email,
            role: row.role,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

/// A stored auth account.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
pub struct AccountData {
    pub account_id: i64,
    pub uid: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

/// Insertable form of an account (id assigned by the database).
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub struct NewAccountRow {
    pub uid: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

/// A stored login session.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sessions)]
pub struct SessionData {
    pub session_id: i64,
    pub token: String,
    pub account_uid: String,
    pub created_at: String,
    pub expires_at: String,
    pub last_seen_at: String,
}

/// Insertable form of a session (id assigned by the database).
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sessions)]
pub struct NewSessionRow {
    pub token: String,
    pub account_uid: String,
    pub created_at: String,
    pub expires_at: String,
    pub last_seen_at: String,
}
