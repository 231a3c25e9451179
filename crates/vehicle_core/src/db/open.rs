//! File-backed connection source.
//!
//! # Responsibility
//! - Open a new SQLite connection to the catalog file on every acquisition.
//! - Configure per-connection pragmas required by the repository.
//!
//! # Invariants
//! - Returned connections have `busy_timeout` set.
//! - Open failures are logged with duration and returned, never panicked on.

use super::{ConnectionSource, DbError, DbResult};
use log::{debug, error};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection source for an on-disk SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteFile {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Overrides how long a connection waits on a locked database.
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }
}

impl ConnectionSource for SqliteFile {
    fn acquire(&self) -> DbResult<Connection> {
        let started_at = Instant::now();

        let conn = Connection::open(&self.path).map_err(|err| {
            error!(
                "event=db_open module=db status=error duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            DbError::Open {
                path: self.path.clone(),
                source: err,
            }
        })?;

        if let Err(err) = conn.busy_timeout(self.busy_timeout) {
            error!(
                "event=db_open module=db status=error duration_ms={} error_code=db_configure_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }

        debug!(
            "event=db_open module=db status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(conn)
    }
}
