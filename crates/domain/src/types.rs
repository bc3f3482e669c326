// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::booking_status::BookingStatus;
use crate::session_slot::SessionSlot;
use time::OffsetDateTime;

/// A counseling appointment request.
///
/// Records are owned by the `bookings` collection; `id` is assigned by the
/// persistence layer at creation and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// Opaque record identifier.
    pub id: String,
    /// The owning student's identity (back-reference only).
    pub user_id: String,
    /// Student name as submitted.
    pub student_name: String,
    /// Student number (NIM).
    pub nim: String,
    /// Study program / department.
    pub study_program: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Calendar date of the requested session.
    pub session_date: OffsetDateTime,
    /// The requested session slot.
    pub session_slot: SessionSlot,
    /// Assigned counselor name; empty until an admin assigns one.
    pub counselor: String,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Durable public URL of the uploaded KTM image; empty if no attachment.
    pub ktm_url: String,
    /// Creation timestamp; orders lists (most recent first) and feeds the
    /// time-window aggregation.
    pub created_at: OffsetDateTime,
}

/// A student profile, created once at registration and read by uid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// Matches the auth identity's uid.
    pub uid: String,
    /// Full name.
    pub name: String,
    /// Student number (NIM).
    pub nim: String,
    /// Study program / department.
    pub study_program: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Registered email address.
    pub email: String,
    /// Optional profile photo URL; empty when unset.
    pub photo_url: String,
}

/// An admin role-marker record.
///
/// Presence is informational; authorization derives from the email
/// classification heuristic and is re-checked per operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminProfile {
    /// Matches the auth identity's uid.
    pub uid: String,
    /// Display name.
    pub name: String,
    /// Registered email address.
    pub email: String,
    /// Role tag (always `"admin"`).
    pub role: String,
    /// Creation timestamp.
    pub created_at: OffsetDateTime,
}
