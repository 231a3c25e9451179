//! SQLite storage bootstrap and connection acquisition.
//!
//! # Responsibility
//! - Hand out short-lived SQLite connections, one per repository call.
//! - Create the `vehicles` table when a store is first opened.
//!
//! # Invariants
//! - Connections are never cached or shared across calls; dropping the
//!   returned `Connection` releases it.
//! - Every acquired connection has a busy timeout configured.

use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod open;
pub mod schema;

pub use open::SqliteFile;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The database file could not be opened at all.
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },
}

impl DbError {
    /// Returns the underlying engine error.
    pub fn sqlite_error(&self) -> &rusqlite::Error {
        match self {
            Self::Sqlite(err) => err,
            Self::Open { source, .. } => source,
        }
    }

    /// Returns whether the engine rejected a row because of a constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self.sqlite_error().sqlite_error_code(),
            Some(rusqlite::ErrorCode::ConstraintViolation)
        )
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Open { path, source } => {
                write!(f, "failed to open database `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Open { source, .. } => Some(source),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Supplies a fresh connection for each storage round trip.
///
/// Implementations must return an independent connection per call; the
/// repository drops it before returning.
pub trait ConnectionSource {
    fn acquire(&self) -> DbResult<Connection>;
}

impl<S: ConnectionSource + ?Sized> ConnectionSource for &S {
    fn acquire(&self) -> DbResult<Connection> {
        (**self).acquire()
    }
}

impl<S: ConnectionSource + ?Sized> ConnectionSource for std::sync::Arc<S> {
    fn acquire(&self) -> DbResult<Connection> {
        (**self).acquire()
    }
}
