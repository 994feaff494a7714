use camino::Utf8PathBuf;
use rusqlite::Error as SqliteError;
use thiserror::Error;

/// Errors raised by a single attempt to open the store.
#[derive(Debug, Error)]
pub enum OpenError {
    /// Failed to create the parent directory for the database file.
    #[error("failed to create parent directory {path:?}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// SQLite refused to open or configure the database.
    #[error("failed to {operation}")]
    Sqlite {
        /// Step that failed.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// The store stayed unreachable after the retry budget was spent.
///
/// This is fatal for the session: a connector built from a failed connection
/// rejects every later operation with [`StorageError::NotConnected`].
#[derive(Debug, Error)]
#[error("could not connect to {target} after {attempts} attempt(s)")]
pub struct ConnectionError {
    /// Description of the store that was being opened.
    pub target: String,
    /// Number of attempts made.
    pub attempts: u32,
    /// Failure reported by the final attempt.
    #[source]
    pub source: OpenError,
}

/// Errors raised by operations on an open (or failed) connector.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The connector never obtained a connection.
    #[error("not connected to {target}; the connection failed at startup")]
    NotConnected {
        /// Description of the store that could not be opened.
        target: String,
    },
    /// A SQLite statement failed.
    #[error("failed to {operation}")]
    Sqlite {
        /// Step that failed.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}
