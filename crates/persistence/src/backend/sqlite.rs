// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` backend initialization.
//!
//! `SQLite` is the sole backend: file-backed for deployments, shared
//! in-memory databases for tests. Migrations are embedded in the binary
//! and applied on connect, and foreign-key enforcement is switched on and
//! verified before the connection is handed out.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::PersistenceError;

/// Embedded `SQLite` migrations from the `migrations/` directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(QueryableByName)]
struct ForeignKeyPragmaRow {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    foreign_keys: i32,
}

/// Establishes a connection, enables foreign keys, and runs migrations.
///
/// # Arguments
///
/// * `database_url` - A file path or `file:...?mode=memory&cache=shared` URL
///
/// # Errors
///
/// Returns an error if the connection cannot be established or a
/// migration fails.
pub fn initialize_database(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;

    conn.batch_execute("PRAGMA foreign_keys = ON")
        .map_err(|e| PersistenceError::InitializationError(format!("enable foreign keys: {e}")))?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Enables WAL journaling for better read concurrency.
///
/// Only meaningful for file-backed databases; in-memory databases ignore
/// the request.
///
/// # Errors
///
/// Returns an error if the pragma cannot be executed.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    conn.batch_execute("PRAGMA journal_mode = WAL")
        .map_err(|e| PersistenceError::InitializationError(format!("enable WAL mode: {e}")))
}

/// Verifies that foreign-key enforcement is active on this connection.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyEnforcementNotEnabled` if the
/// pragma reports enforcement off.
pub fn verify_foreign_key_enforcement(
    conn: &mut SqliteConnection,
) -> Result<(), PersistenceError> {
    let row: ForeignKeyPragmaRow = diesel::sql_query("PRAGMA foreign_keys")
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("read foreign_keys pragma: {e}")))?;

    if row.foreign_keys == 1 {
        Ok(())
    } else {
        Err(PersistenceError::ForeignKeyEnforcementNotEnabled)
    }
}
