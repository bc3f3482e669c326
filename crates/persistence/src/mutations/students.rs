// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Student profile mutation operations.

use diesel::prelude::*;

use crate::data_models::StudentRow;
use crate::diesel_schema::students;
use crate::error::PersistenceError;

/// Inserts a new student profile.
///
/// Profiles are written once at registration; there is no update or
/// deletion path.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_student(
    conn: &mut SqliteConnection,
    row: &StudentRow,
) -> Result<(), PersistenceError> {
    diesel::insert_into(students::table)
        .values(row)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("insert_student: {e}")))?;

    Ok(())
}
