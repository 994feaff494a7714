//! Storage connection lifecycle.
//!
//! A [`StorageConnector`] owns the single logical SQLite connection used for
//! the lifetime of the process. It is built once, with bounded retry, and then
//! passed explicitly to every operation that touches storage.
#![forbid(unsafe_code)]

use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use log::{debug, error, info, warn};
use popstat_core::{RetryPolicy, Sleeper, ThreadSleeper};
use rusqlite::{Connection, Transaction};

use super::error::{ConnectionError, OpenError, StorageError};

/// Database file used when none is configured.
pub const DEFAULT_DATABASE: &str = "population.db";

/// Default time SQLite waits on a locked database before failing.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Location and tuning of the SQLite store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Path of the database file. Parent directories are created on demand.
    pub database: Utf8PathBuf,
    /// How long to wait on a locked database.
    pub busy_timeout: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: Utf8PathBuf::from(DEFAULT_DATABASE),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

impl StorageConfig {
    /// Create a configuration for the given database file.
    #[must_use]
    pub fn new(database: impl Into<Utf8PathBuf>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    /// Set the busy timeout.
    #[must_use]
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }
}

/// Opens raw connections for a [`StorageConnector`].
///
/// Each call to [`ConnectionFactory::open`] is one connection attempt; the
/// connector decides whether and when to call it again.
pub trait ConnectionFactory {
    /// Human-readable description of the store, used in logs and errors.
    fn target(&self) -> String;

    /// Make a single attempt to open the store.
    ///
    /// # Errors
    /// Returns [`OpenError`] when the store cannot be opened or configured.
    fn open(&self) -> Result<Connection, OpenError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    File(Utf8PathBuf),
    Memory,
}

/// [`ConnectionFactory`] for on-disk or in-memory SQLite databases.
#[derive(Debug, Clone)]
pub struct SqliteConnectionFactory {
    location: Location,
    busy_timeout: Duration,
}

impl SqliteConnectionFactory {
    /// Factory opening the file described by `config`.
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            location: Location::File(config.database.clone()),
            busy_timeout: config.busy_timeout,
        }
    }

    /// Factory opening a private in-memory database.
    #[must_use]
    pub const fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

impl ConnectionFactory for SqliteConnectionFactory {
    fn target(&self) -> String {
        match &self.location {
            Location::File(path) => format!("sqlite:{path}"),
            Location::Memory => "sqlite::memory:".to_owned(),
        }
    }

    fn open(&self) -> Result<Connection, OpenError> {
        let connection = match &self.location {
            Location::File(path) => {
                ensure_parent_dir(path)?;
                Connection::open(path.as_std_path()).map_err(|source| OpenError::Sqlite {
                    operation: "open database file",
                    source,
                })?
            }
            Location::Memory => {
                Connection::open_in_memory().map_err(|source| OpenError::Sqlite {
                    operation: "open in-memory database",
                    source,
                })?
            }
        };
        connection
            .busy_timeout(self.busy_timeout)
            .map_err(|source| OpenError::Sqlite {
                operation: "set busy timeout",
                source,
            })?;
        Ok(connection)
    }
}

fn ensure_parent_dir(path: &Utf8Path) -> Result<(), OpenError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base, relative) = if parent.is_absolute() {
        ("/", parent.strip_prefix("/").unwrap_or(parent))
    } else {
        (".", parent)
    };
    let to_open_error = |source| OpenError::CreateDirectory {
        path: parent.to_path_buf(),
        source,
    };

    let dir = fs_utf8::Dir::open_ambient_dir(base, ambient_authority()).map_err(to_open_error)?;
    dir.create_dir_all(relative).map_err(to_open_error)
}

/// Holder of the process-wide storage connection.
///
/// A connector is either connected or permanently disconnected. Once the
/// initial connection fails, every operation fails fast with
/// [`StorageError::NotConnected`]; reconnecting mid-session is not attempted.
#[derive(Debug)]
pub struct StorageConnector {
    target: String,
    connection: Option<Connection>,
}

impl StorageConnector {
    /// Open the store, retrying according to `policy`.
    ///
    /// # Errors
    /// Returns [`ConnectionError`] when every attempt fails.
    pub fn connect(
        factory: &dyn ConnectionFactory,
        policy: &RetryPolicy,
        sleeper: &dyn Sleeper,
    ) -> Result<Self, ConnectionError> {
        let target = factory.target();
        let started_at = Instant::now();
        info!(
            "event=storage_connect status=start target={target} max_attempts={}",
            policy.max_attempts()
        );

        let outcome = policy.run(sleeper, |attempt| {
            debug!("event=storage_connect status=attempt target={target} attempt={attempt}");
            factory.open()
        });

        match outcome {
            Ok(connection) => {
                info!(
                    "event=storage_connect status=ok target={target} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(Self {
                    target,
                    connection: Some(connection),
                })
            }
            Err(exhausted) => {
                error!(
                    "event=storage_connect status=error target={target} attempts={} duration_ms={} error={}",
                    exhausted.attempts,
                    started_at.elapsed().as_millis(),
                    exhausted.last_error
                );
                Err(ConnectionError {
                    target,
                    attempts: exhausted.attempts,
                    source: exhausted.last_error,
                })
            }
        }
    }

    /// Open the store, falling back to a disconnected connector on failure.
    ///
    /// The failure is returned alongside the connector so the caller can
    /// surface it; later operations on the connector fail fast.
    pub fn connect_lenient(
        factory: &dyn ConnectionFactory,
        policy: &RetryPolicy,
        sleeper: &dyn Sleeper,
    ) -> (Self, Option<ConnectionError>) {
        match Self::connect(factory, policy, sleeper) {
            Ok(connector) => (connector, None),
            Err(err) => (Self::disconnected(err.target.clone()), Some(err)),
        }
    }

    /// Open a private in-memory store with a single attempt.
    ///
    /// # Errors
    /// Returns [`ConnectionError`] if SQLite cannot allocate the database.
    pub fn in_memory() -> Result<Self, ConnectionError> {
        Self::connect(
            &SqliteConnectionFactory::in_memory(),
            &RetryPolicy::once(),
            &ThreadSleeper,
        )
    }

    /// A connector that never connected.
    #[must_use]
    pub fn disconnected(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            connection: None,
        }
    }

    /// Report whether a connection is held.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Description of the store.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Run `operation` inside a transaction.
    ///
    /// The transaction commits when `operation` succeeds and rolls back when
    /// it fails. It is released on every exit path, including early returns
    /// and unwinding.
    ///
    /// # Errors
    /// Returns [`StorageError::NotConnected`] on a disconnected connector,
    /// [`StorageError::Sqlite`] when the transaction cannot begin or commit,
    /// or the error returned by `operation`.
    pub fn execute_scoped<T, E, F>(&mut self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<StorageError>,
    {
        let Self { target, connection } = self;
        let connection = connection.as_mut().ok_or_else(|| StorageError::NotConnected {
            target: target.clone(),
        })?;
        let transaction = connection
            .transaction()
            .map_err(|source| StorageError::Sqlite {
                operation: "begin transaction",
                source,
            })?;

        let value = match operation(&transaction) {
            Ok(value) => value,
            Err(err) => {
                warn!("event=storage_scope status=rollback target={target}");
                return Err(err);
            }
        };

        transaction
            .commit()
            .map_err(|source| StorageError::Sqlite {
                operation: "commit transaction",
                source,
            })?;
        Ok(value)
    }

    /// Run a read-only `operation` against the connection.
    ///
    /// # Errors
    /// Returns [`StorageError::NotConnected`] on a disconnected connector, or
    /// the error returned by `operation`.
    pub fn read<T, E, F>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<StorageError>,
    {
        let connection = self
            .connection
            .as_ref()
            .ok_or_else(|| StorageError::NotConnected {
                target: self.target.clone(),
            })?;
        operation(connection)
    }
}
