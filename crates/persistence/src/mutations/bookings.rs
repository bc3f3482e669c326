// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking mutation operations.
//!
//! Each mutation is a single document-level write; concurrent writers to
//! the same booking race with last-write-wins semantics.

use diesel::prelude::*;
use konseling_domain::BookingStatus;

use crate::data_models::BookingRow;
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;

/// Inserts a new booking row.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_booking(
    conn: &mut SqliteConnection,
    row: &BookingRow,
) -> Result<(), PersistenceError> {
    diesel::insert_into(bookings::table)
        .values(row)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("insert_booking: {e}")))?;

    Ok(())
}

/// Updates a booking's status as a single-field write.
///
/// # Errors
///
/// Returns `BookingNotFound` if no row matches the id.
pub fn update_booking_status(
    conn: &mut SqliteConnection,
    booking_id: &str,
    new_status: BookingStatus,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(bookings::table.find(booking_id))
        .set(bookings::status.eq(new_status.as_str()))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("update_booking_status: {e}")))?;

    if updated == 0 {
        return Err(PersistenceError::BookingNotFound(booking_id.to_string()));
    }

    Ok(())
}

/// Sets the counselor and moves the booking to `Ongoing` in one write.
///
/// # Errors
///
/// Returns `BookingNotFound` if no row matches the id.
pub fn assign_counselor(
    conn: &mut SqliteConnection,
    booking_id: &str,
    counselor_name: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(bookings::table.find(booking_id))
        .set((
            bookings::counselor.eq(counselor_name),
            bookings::status.eq(BookingStatus::Ongoing.as_str()),
        ))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("assign_counselor: {e}")))?;

    if updated == 0 {
        return Err(PersistenceError::BookingNotFound(booking_id.to_string()));
    }

    Ok(())
}

/// Replaces a stored booking document with the given row.
///
/// # Errors
///
/// Returns `BookingNotFound` if no row matches the row's id.
pub fn update_booking(
    conn: &mut SqliteConnection,
    row: &BookingRow,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(bookings::table.find(&row.id))
        .set(row)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("update_booking: {e}")))?;

    if updated == 0 {
        return Err(PersistenceError::BookingNotFound(row.id.clone()));
    }

    Ok(())
}

/// Deletes a booking row.
///
/// # Errors
///
/// Returns `BookingNotFound` if no row matches the id.
pub fn delete_booking(
    conn: &mut SqliteConnection,
    booking_id: &str,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(bookings::table.find(booking_id))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("delete_booking: {e}")))?;

    if deleted == 0 {
        return Err(PersistenceError::BookingNotFound(booking_id.to_string()));
    }

    Ok(())
}
