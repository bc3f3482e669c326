// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account, session, and admin-marker query operations.

use diesel::prelude::*;
use konseling_domain::AdminProfile;

use crate::data_models::{AccountData, AdminRow, SessionData};
use crate::diesel_schema::{accounts, admins, sessions};
use crate::error::PersistenceError;

/// Fetches an account by email.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_account_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<AccountData>, PersistenceError> {
    accounts::table
        .filter(accounts::email.eq(email))
        .first::<AccountData>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_account_by_email: {e}")))
}

/// Fetches an account by uid.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_account_by_uid(
    conn: &mut SqliteConnection,
    uid: &str,
) -> Result<Option<AccountData>, PersistenceError> {
    accounts::table
        .filter(accounts::uid.eq(uid))
        .first::<AccountData>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_account_by_uid: {e}")))
}

/// Fetches a session by its token.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    sessions::table
        .filter(sessions::token.eq(token))
        .first::<SessionData>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_session_by_token: {e}")))
}

/// Fetches an admin role-marker record by uid.
///
/// # Errors
///
/// Returns an error if the query fails or the record cannot be decoded.
pub fn get_admin_profile(
    conn: &mut SqliteConnection,
    uid: &str,
) -> Result<Option<AdminProfile>, PersistenceError> {
    let row: Option<AdminRow> = admins::table
        .find(uid)
        .first::<AdminRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_admin_profile: {e}")))?;

    row.map(AdminProfile::try_from).transpose()
}
