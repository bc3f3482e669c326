// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Student profile query operations.

use diesel::prelude::*;
use konseling_domain::Student;

use crate::data_models::StudentRow;
use crate::diesel_schema::students;
use crate::error::PersistenceError;

/// Fetches a student profile by uid.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_student(
    conn: &mut SqliteConnection,
    uid: &str,
) -> Result<Option<Student>, PersistenceError> {
    let row: Option<StudentRow> = students::table
        .find(uid)
        .first::<StudentRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_student: {e}")))?;

    Ok(row.map(Student::from))
}

/// Lists every registered student.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_students(conn: &mut SqliteConnection) -> Result<Vec<Student>, PersistenceError> {
    let rows: Vec<StudentRow> = students::table
        .order(students::name.asc())
        .load::<StudentRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_students: {e}")))?;

    Ok(rows.into_iter().map(Student::from).collect())
}
