// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking query operations.
//!
//! List operations decode rows best-effort: a record that fails to decode
//! (unknown status, bad slot label, unparseable timestamp) is skipped and
//! logged so one corrupt record cannot block a whole list view.

use diesel::prelude::*;
use konseling_domain::{Booking, BookingStatus};
use tracing::warn;

use crate::data_models::BookingRow;
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;

/// Decodes rows into domain bookings, skipping and logging failures.
fn decode_rows(rows: Vec<BookingRow>) -> Vec<Booking> {
    rows.into_iter()
        .filter_map(|row| {
            let booking_id: String = row.id.clone();
            match Booking::try_from(row) {
                Ok(booking) => Some(booking),
                Err(e) => {
                    warn!(booking_id = %booking_id, error = %e, "Skipping malformed booking record");
                    None
                }
            }
        })
        .collect()
}

/// Fetches a single booking by id.
///
/// Unlike list operations, a malformed record here is surfaced as an
/// error: the caller asked for this exact document.
///
/// # Errors
///
/// Returns an error if the query fails or the record cannot be decoded.
pub fn get_booking(
    conn: &mut SqliteConnection,
    booking_id: &str,
) -> Result<Option<Booking>, PersistenceError> {
    let row: Option<BookingRow> = bookings::table
        .find(booking_id)
        .first::<BookingRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_booking: {e}")))?;

    row.map(Booking::try_from).transpose()
}

/// Lists one student's bookings, most recent first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_bookings_for_user(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::user_id.eq(user_id))
        .order(bookings::created_at.desc())
        .load::<BookingRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_bookings_for_user: {e}")))?;

    Ok(decode_rows(rows))
}

/// Lists all bookings, optionally restricted to one status, most recent
/// first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_all_bookings(
    conn: &mut SqliteConnection,
    status: Option<BookingStatus>,
) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = match status {
        Some(status) => bookings::table
            .filter(bookings::status.eq(status.as_str()))
            .order(bookings::created_at.desc())
            .load::<BookingRow>(conn),
        None => bookings::table
            .order(bookings::created_at.desc())
            .load::<BookingRow>(conn),
    }
    .map_err(|e| PersistenceError::QueryFailed(format!("list_all_bookings: {e}")))?;

    Ok(decode_rows(rows))
}
