// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Booking Konseling service.
//!
//! Operations here are the only path to state changes: each one
//! authenticates nothing itself (callers hand in an already-validated
//! [`AuthenticatedUser`]) but re-checks authorization, validates input,
//! runs the status state machine, and translates lower-layer errors into
//! the API contract.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::str::FromStr;

use konseling_domain::{
    Booking, BookingStats, BookingStatus, SessionSlot, Student, compute_stats,
    validate_booking_fields, validate_counselor_name,
};
use konseling_persistence::Persistence;
use konseling_storage::{
    AttachmentFile, DEFAULT_MAX_ATTACHMENT_MB, KTM_FOLDER, ObjectStore, StoredObject,
    attachment_key_from_url, validate_attachment,
};
use time::OffsetDateTime;
use tracing::{info, warn};

mod auth;
mod error;
mod messages;
mod password_policy;

#[cfg(test)]
mod tests;

pub use auth::{
    ADMIN_EMAIL_DOMAIN, AuthenticatedUser, AuthenticationService, AuthorizationService,
    RegisterRequest, Role,
};
pub use error::{
    ApiError, AuthError, translate_domain_error, translate_persistence_error,
    translate_storage_error,
};
pub use konseling_domain::AdminProfile;
pub use messages::localized_auth_message;
pub use password_policy::{PasswordPolicy, PasswordPolicyError};

/// Status filter sentinel meaning "no filter".
pub const STATUS_FILTER_ALL: &str = "All";

/// API request to submit a new booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBookingRequest {
    /// Student name.
    pub student_name: String,
    /// Student number (NIM).
    pub nim: String,
    /// Study program / department.
    pub study_program: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Calendar date of the requested session.
    pub session_date: OffsetDateTime,
    /// Session slot label.
    pub session_slot: String,
}

/// API response for a successful booking submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBookingResponse {
    /// The freshly assigned booking id.
    pub booking_id: String,
    /// The stored attachment URL; empty when no attachment was sent.
    pub ktm_url: String,
}

/// API request to edit an existing booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBookingRequest {
    /// The booking to edit.
    pub booking_id: String,
    /// Student name.
    pub student_name: String,
    /// Student number (NIM).
    pub nim: String,
    /// Study program / department.
    pub study_program: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Calendar date of the requested session.
    pub session_date: OffsetDateTime,
    /// Session slot label.
    pub session_slot: String,
}

/// Fetches a booking or reports it missing in API terms.
fn fetch_booking(persistence: &mut Persistence, booking_id: &str) -> Result<Booking, ApiError> {
    persistence
        .get_booking(booking_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message: format!("Booking '{booking_id}' does not exist"),
        })
}

/// Validates and uploads an attachment, returning the stored object.
///
/// Fail closed: any validation or upload failure aborts the calling
/// operation before a booking record is written.
fn upload_attachment(
    store: &dyn ObjectStore,
    attachment: &AttachmentFile,
) -> Result<StoredObject, ApiError> {
    validate_attachment(attachment, DEFAULT_MAX_ATTACHMENT_MB)
        .map_err(|e| translate_storage_error(&e))?;

    let stored: StoredObject = store
        .upload(attachment, KTM_FOLDER)
        .map_err(|e| translate_storage_error(&e))?;

    info!(key = %stored.key, "Uploaded KTM attachment");
    Ok(stored)
}

/// Best-effort removal of a booking's attachment object.
///
/// Failure is logged and never escalated; it must not block the record
/// operation that follows.
fn delete_attachment_best_effort(store: &dyn ObjectStore, ktm_url: &str) {
    if ktm_url.is_empty() {
        return;
    }

    match attachment_key_from_url(ktm_url) {
        Some(key) => {
            if let Err(e) = store.delete(&key) {
                warn!(key = %key, error = %e, "Failed to delete KTM attachment");
            }
        }
        None => warn!(url = %ktm_url, "Could not derive attachment key from URL"),
    }
}

/// Submits a new booking for the acting student.
///
/// An attachment, when present, is validated and uploaded first; on any
/// attachment failure no booking record is created. The record is
/// persisted with a fresh id and `Pending` status.
///
/// # Errors
///
/// Returns an error if a required field is empty, the session slot is
/// unknown, the attachment fails validation or upload, or the write
/// fails.
pub fn create_booking(
    persistence: &mut Persistence,
    store: &dyn ObjectStore,
    actor: &AuthenticatedUser,
    request: &CreateBookingRequest,
    attachment: Option<&AttachmentFile>,
) -> Result<CreateBookingResponse, ApiError> {
    validate_booking_fields(
        &request.student_name,
        &request.nim,
        &request.study_program,
        &request.phone_number,
    )
    .map_err(translate_domain_error)?;

    let session_slot: SessionSlot =
        SessionSlot::from_str(&request.session_slot).map_err(translate_domain_error)?;

    let ktm_url: String = match attachment {
        Some(file) => upload_attachment(store, file)?.url,
        None => String::new(),
    };

    let booking: Booking = Booking {
        id: String::new(),
        user_id: actor.uid.clone(),
        student_name: request.student_name.clone(),
        nim: request.nim.clone(),
        study_program: request.study_program.clone(),
        phone_number: request.phone_number.clone(),
        session_date: request.session_date,
        session_slot,
        counselor: String::new(),
        status: BookingStatus::Pending,
        ktm_url: ktm_url.clone(),
        created_at: OffsetDateTime::now_utc(),
    };

    let booking_id: String = persistence
        .create_booking(&booking)
        .map_err(translate_persistence_error)?;

    info!(booking_id = %booking_id, user_id = %actor.uid, "Created booking");

    Ok(CreateBookingResponse { booking_id, ktm_url })
}

/// Lists the acting student's own bookings, most recent first.
///
/// # Errors
///
/// Returns an error if the query fails. Individual malformed records are
/// skipped by the persistence layer, never surfaced.
pub fn list_user_bookings(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
) -> Result<Vec<Booking>, ApiError> {
    persistence
        .list_bookings_for_user(&actor.uid)
        .map_err(translate_persistence_error)
}

/// Lists every booking for admin review, most recent first.
///
/// `None` or the `"All"` sentinel returns the full set; any other filter
/// must be an exact status value.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the filter is not a
/// valid status, or the query fails.
pub fn list_all_bookings(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    status_filter: Option<&str>,
) -> Result<Vec<Booking>, ApiError> {
    AuthorizationService::authorize_list_all_bookings(actor)?;

    let status: Option<BookingStatus> = match status_filter {
        None | Some(STATUS_FILTER_ALL) => None,
        Some(raw) => Some(BookingStatus::from_str(raw).map_err(translate_domain_error)?),
    };

    persistence
        .list_all_bookings(status)
        .map_err(translate_persistence_error)
}

/// Applies a status transition to a booking.
///
/// The transition is validated against the status state machine; moves
/// to `Ongoing` are reserved for counselor assignment, which carries the
/// counselor name. Admins may apply any permitted transition; the owning
/// student may only cancel.
///
/// # Errors
///
/// Returns an error if the booking does not exist, the actor lacks the
/// right, the transition is illegal, or the write fails.
pub fn update_booking_status(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    booking_id: &str,
    new_status: &str,
) -> Result<(), ApiError> {
    let new_status: BookingStatus =
        BookingStatus::from_str(new_status).map_err(translate_domain_error)?;

    let booking: Booking = fetch_booking(persistence, booking_id)?;

    AuthorizationService::authorize_update_status(actor, &booking, new_status)?;

    booking
        .status
        .validate_transition(new_status)
        .map_err(translate_domain_error)?;

    if new_status == BookingStatus::Ongoing {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("counselor_required"),
            message: String::from(
                "Moving a booking to Ongoing requires a counselor assignment",
            ),
        });
    }

    persistence
        .update_booking_status(booking_id, new_status)
        .map_err(translate_persistence_error)?;

    info!(booking_id = %booking_id, status = new_status.as_str(), "Updated booking status");
    Ok(())
}

/// Assigns a counselor to a pending booking, moving it to `Ongoing`.
///
/// Counselor name and status are set in a single document write.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the name is empty, the
/// booking does not exist, the booking is not in a state that can move
/// to `Ongoing`, or the write fails.
pub fn assign_counselor(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
    booking_id: &str,
    counselor_name: &str,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_assign_counselor(actor)?;
    validate_counselor_name(counselor_name).map_err(translate_domain_error)?;

    let booking: Booking = fetch_booking(persistence, booking_id)?;
    booking
        .status
        .validate_transition(BookingStatus::Ongoing)
        .map_err(translate_domain_error)?;

    persistence
        .assign_counselor(booking_id, counselor_name)
        .map_err(translate_persistence_error)?;

    info!(booking_id = %booking_id, counselor = %counselor_name, "Assigned counselor");
    Ok(())
}

/// Deletes a booking and best-effort removes its attachment.
///
/// Attachment deletion failure is logged and never blocks removal of the
/// record.
///
/// # Errors
///
/// Returns an error if the booking does not exist, the actor is neither
/// an admin nor the owner, or the record delete fails.
pub fn delete_booking(
    persistence: &mut Persistence,
    store: &dyn ObjectStore,
    actor: &AuthenticatedUser,
    booking_id: &str,
) -> Result<(), ApiError> {
    let booking: Booking = fetch_booking(persistence, booking_id)?;
    AuthorizationService::authorize_modify_booking(actor, &booking)?;

    delete_attachment_best_effort(store, &booking.ktm_url);

    persistence
        .delete_booking(booking_id)
        .map_err(translate_persistence_error)?;

    info!(booking_id = %booking_id, "Deleted booking");
    Ok(())
}

/// Edits a booking's student-supplied fields, optionally replacing the
/// attachment.
///
/// A new attachment is validated and uploaded before the record write;
/// the previous object is left for the delete path to clean up. Id,
/// owner, status, counselor, and creation time are preserved.
///
/// # Errors
///
/// Returns an error if the booking does not exist, the actor is neither
/// an admin nor the owner, a field or the attachment fails validation,
/// or the write fails.
pub fn update_booking(
    persistence: &mut Persistence,
    store: &dyn ObjectStore,
    actor: &AuthenticatedUser,
    request: &UpdateBookingRequest,
    new_attachment: Option<&AttachmentFile>,
) -> Result<(), ApiError> {
    let existing: Booking = fetch_booking(persistence, &request.booking_id)?;
    AuthorizationService::authorize_modify_booking(actor, &existing)?;

    validate_booking_fields(
        &request.student_name,
        &request.nim,
        &request.study_program,
        &request.phone_number,
    )
    .map_err(translate_domain_error)?;

    let session_slot: SessionSlot =
        SessionSlot::from_str(&request.session_slot).map_err(translate_domain_error)?;

    let ktm_url: String = match new_attachment {
        Some(file) => upload_attachment(store, file)?.url,
        None => existing.ktm_url.clone(),
    };

    let updated: Booking = Booking {
        student_name: request.student_name.clone(),
        nim: request.nim.clone(),
        study_program: request.study_program.clone(),
        phone_number: request.phone_number.clone(),
        session_date: request.session_date,
        session_slot,
        ktm_url,
        ..existing
    };

    persistence
        .update_booking(&updated)
        .map_err(translate_persistence_error)?;

    info!(booking_id = %request.booking_id, "Updated booking");
    Ok(())
}

/// Computes booking statistics over the full booking set.
///
/// Recomputed from the authoritative records on every call; nothing is
/// cached.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the query fails.
pub fn booking_stats(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
) -> Result<BookingStats, ApiError> {
    AuthorizationService::authorize_view_stats(actor)?;

    let bookings: Vec<Booking> = persistence
        .list_all_bookings(None)
        .map_err(translate_persistence_error)?;

    Ok(compute_stats(&bookings, OffsetDateTime::now_utc()))
}

/// Lists every registered student for the admin dashboard.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the query fails.
pub fn list_students(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
) -> Result<Vec<Student>, ApiError> {
    AuthorizationService::authorize_list_students(actor)?;

    persistence
        .list_students()
        .map_err(translate_persistence_error)
}

/// Fetches the acting identity's student profile.
///
/// # Errors
///
/// Returns an error if the profile does not exist or the query fails.
pub fn get_student_profile(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
) -> Result<Student, ApiError> {
    persistence
        .get_student(&actor.uid)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Student"),
            message: format!("Student '{}' does not exist", actor.uid),
        })
}

/// Fetches the acting admin's role-marker record.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the marker does not
/// exist, or the query fails.
pub fn get_admin_profile(
    persistence: &mut Persistence,
    actor: &AuthenticatedUser,
) -> Result<AdminProfile, ApiError> {
    AuthorizationService::authorize_view_admin_profile(actor)?;

    persistence
        .get_admin_profile(&actor.uid)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Admin"),
            message: format!("Admin '{}' does not exist", actor.uid),
        })
}
