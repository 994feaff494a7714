#![forbid(unsafe_code)]

use rusqlite::{Connection, Error as SqliteError, Transaction};
use thiserror::Error;

/// Create the `countries` table if it does not already exist.
///
/// Read paths call this first so that querying a fresh database yields empty
/// results instead of a "no such table" error.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use popstat_data::ensure_table;
///
/// let conn = Connection::open_in_memory().expect("create in-memory database");
/// ensure_table(&conn).expect("create countries table");
/// ensure_table(&conn).expect("second call is a no-op");
///
/// let rows: i64 = conn
///     .query_row("SELECT COUNT(*) FROM countries", [], |row| row.get(0))
///     .expect("count rows");
/// assert_eq!(rows, 0);
/// ```
pub fn ensure_table(connection: &Connection) -> Result<(), SchemaError> {
    run_schema_step(
        connection,
        "create countries",
        "CREATE TABLE IF NOT EXISTS countries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            cca2 TEXT,
            cca3 TEXT,
            region TEXT,
            population INTEGER,
            area REAL
        )",
    )
}

/// Prepare the `countries` table for a full-refresh load.
///
/// Creates the table when absent and then deletes every row. Callers run this
/// inside the same transaction as the subsequent insert so readers never
/// observe the emptied table.
pub fn ensure_schema(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    ensure_table(transaction)?;
    run_schema_step(transaction, "truncate countries", "DELETE FROM countries")
}

fn run_schema_step(
    connection: &Connection,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    connection
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError { step, source })
}

/// Raised when the `countries` table cannot be created or truncated.
#[derive(Debug, Error)]
#[error("failed to execute schema step '{step}'")]
pub struct SchemaError {
    /// Step that failed.
    pub step: &'static str,
    /// Source error returned by `rusqlite`.
    #[source]
    pub source: SqliteError,
}
