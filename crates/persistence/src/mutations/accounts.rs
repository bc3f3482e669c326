// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account, session, and admin-marker mutation operations.

use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;

use crate::data_models::{AdminRow, NewAccountRow, NewSessionRow};
use crate::diesel_schema::{accounts, admins, sessions};
use crate::error::PersistenceError;

/// Inserts a new account.
///
/// # Errors
///
/// Returns `AccountExists` if the email is already registered.
pub fn insert_account(
    conn: &mut SqliteConnection,
    row: &NewAccountRow,
) -> Result<(), PersistenceError> {
    diesel::insert_into(accounts::table)
        .values(row)
        .execute(conn)
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                PersistenceError::AccountExists(row.email.clone())
            }
            _ => PersistenceError::QueryFailed(format!("insert_account: {e}")),
        })?;

    Ok(())
}

/// Inserts a new login session.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_session(
    conn: &mut SqliteConnection,
    row: &NewSessionRow,
) -> Result<(), PersistenceError> {
    diesel::insert_into(sessions::table)
        .values(row)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("insert_session: {e}")))?;

    Ok(())
}

/// Deletes a session by token, returning whether a row was removed.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<bool, PersistenceError> {
    let deleted: usize = diesel::delete(sessions::table.filter(sessions::token.eq(token)))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("delete_session: {e}")))?;

    Ok(deleted > 0)
}

/// Records session activity.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
    last_seen_at: &str,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table.find(session_id))
        .set(sessions::last_seen_at.eq(last_seen_at))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("update_session_activity: {e}")))?;

    Ok(())
}

/// Inserts an admin role-marker record.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_admin(conn: &mut SqliteConnection, row: &AdminRow) -> Result<(), PersistenceError> {
    diesel::insert_into(admins::table)
        .values(row)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("insert_admin: {e}")))?;

    Ok(())
}
