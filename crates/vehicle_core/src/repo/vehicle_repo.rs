//! Vehicle repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `vehicles` table.
//! - Assign surrogate ids on the insert path.
//! - Keep SQL and connection handling inside the persistence boundary.
//!
//! # Invariants
//! - Each call acquires its own connection and drops it before returning,
//!   on success and failure alike.
//! - Each call issues one statement (insert also reads back the row id).
//! - Engine faults are wrapped in `StorageError` tagged with the operation.
//! - Missing rows are reported as values (`None`, `false`, `NotFound`),
//!   never as storage faults.

use crate::db::schema::ensure_schema;
use crate::db::{ConnectionSource, DbError};
use crate::model::vehicle::{Vehicle, VehicleData, VehicleId};
use log::{debug, error, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const VEHICLE_SELECT_SQL: &str = "SELECT
    id,
    make,
    model,
    manufacture_year,
    color,
    price
FROM vehicles";

pub type RepoResult<T> = Result<T, RepoError>;

/// Intent of the storage operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    /// Schema bootstrap while opening the repository.
    Init,
    Save,
    Find,
    Delete,
}

impl StorageOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Save => "save",
            Self::Find => "find",
            Self::Delete => "delete",
        }
    }
}

impl Display for StorageOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connectivity or engine fault raised by the repository.
#[derive(Debug)]
pub struct StorageError {
    op: StorageOp,
    source: DbError,
}

impl StorageError {
    pub fn new(op: StorageOp, source: impl Into<DbError>) -> Self {
        Self {
            op,
            source: source.into(),
        }
    }

    pub fn op(&self) -> StorageOp {
        self.op
    }

    pub fn db_error(&self) -> &DbError {
        &self.source
    }

    pub fn is_constraint_violation(&self) -> bool {
        self.source.is_constraint_violation()
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to {} vehicle: {}", self.op, self.source)
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Repository error for vehicle persistence.
#[derive(Debug)]
pub enum RepoError {
    Storage(StorageError),
    /// An update matched zero rows.
    NotFound(VehicleId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "vehicle not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Repository interface for vehicle CRUD operations.
pub trait VehicleRepository {
    /// Inserts a draft (returning it with its new id) or updates a persisted
    /// vehicle (returning it unchanged).
    ///
    /// # Errors
    /// - `RepoError::NotFound` when a persisted vehicle matched no row.
    /// - `RepoError::Storage` for any engine fault.
    fn save(&self, vehicle: Vehicle) -> RepoResult<Vehicle>;
    fn find_by_id(&self, id: VehicleId) -> RepoResult<Option<Vehicle>>;
    fn find_all(&self) -> RepoResult<Vec<Vehicle>>;
    /// Returns whether a row was removed. Missing ids are not an error.
    fn delete_by_id(&self, id: VehicleId) -> RepoResult<bool>;
}

impl<R: VehicleRepository + ?Sized> VehicleRepository for &R {
    fn save(&self, vehicle: Vehicle) -> RepoResult<Vehicle> {
        (**self).save(vehicle)
    }

    fn find_by_id(&self, id: VehicleId) -> RepoResult<Option<Vehicle>> {
        (**self).find_by_id(id)
    }

    fn find_all(&self) -> RepoResult<Vec<Vehicle>> {
        (**self).find_all()
    }

    fn delete_by_id(&self, id: VehicleId) -> RepoResult<bool> {
        (**self).delete_by_id(id)
    }
}

/// SQLite-backed vehicle repository.
#[derive(Debug, Clone)]
pub struct SqliteVehicleRepository<S: ConnectionSource> {
    source: S,
}

impl<S: ConnectionSource> SqliteVehicleRepository<S> {
    /// Opens the repository and creates the `vehicles` table if needed.
    ///
    /// # Errors
    /// - `StorageError` with `StorageOp::Init` when the store is unreachable
    ///   or the schema cannot be created.
    pub fn open(source: S) -> Result<Self, StorageError> {
        let started_at = Instant::now();
        let conn = source
            .acquire()
            .map_err(|err| StorageError::new(StorageOp::Init, err))?;
        ensure_schema(&conn).map_err(|err| {
            error!(
                "event=repo_open module=repo status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            StorageError::new(StorageOp::Init, err)
        })?;

        info!(
            "event=repo_open module=repo status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(Self { source })
    }

    fn with_connection<T>(
        &self,
        op: StorageOp,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StorageError> {
        let started_at = Instant::now();
        let conn = self
            .source
            .acquire()
            .map_err(|err| log_failure(op, started_at, StorageError::new(op, err)))?;
        let result =
            f(&conn).map_err(|err| log_failure(op, started_at, StorageError::new(op, err)));
        drop(conn);

        if result.is_ok() {
            debug!(
                "event=repo_{op} module=repo status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            );
        }
        result
    }
}

impl<S: ConnectionSource> VehicleRepository for SqliteVehicleRepository<S> {
    fn save(&self, vehicle: Vehicle) -> RepoResult<Vehicle> {
        match vehicle {
            Vehicle::Draft(data) => {
                let id = self.with_connection(StorageOp::Save, |conn| {
                    conn.execute(
                        "INSERT INTO vehicles (
                            make,
                            model,
                            manufacture_year,
                            color,
                            price
                        ) VALUES (?1, ?2, ?3, ?4, ?5);",
                        params![
                            data.make.as_str(),
                            data.model.as_str(),
                            data.year,
                            data.color.as_str(),
                            data.price,
                        ],
                    )?;
                    Ok(VehicleId::new(conn.last_insert_rowid()))
                })?;

                info!("event=vehicle_insert module=repo status=ok vehicle_id={id}");
                Ok(Vehicle::persisted(id, data))
            }
            Vehicle::Persisted { id, data } => {
                let changed = self.with_connection(StorageOp::Save, |conn| {
                    conn.execute(
                        "UPDATE vehicles
                         SET
                            make = ?1,
                            model = ?2,
                            manufacture_year = ?3,
                            color = ?4,
                            price = ?5
                         WHERE id = ?6;",
                        params![
                            data.make.as_str(),
                            data.model.as_str(),
                            data.year,
                            data.color.as_str(),
                            data.price,
                            id.get(),
                        ],
                    )
                })?;

                if changed == 0 {
                    info!("event=vehicle_update module=repo status=missing vehicle_id={id}");
                    return Err(RepoError::NotFound(id));
                }

                info!("event=vehicle_update module=repo status=ok vehicle_id={id}");
                Ok(Vehicle::persisted(id, data))
            }
        }
    }

    fn find_by_id(&self, id: VehicleId) -> RepoResult<Option<Vehicle>> {
        let vehicle = self.with_connection(StorageOp::Find, |conn| {
            conn.query_row(
                &format!("{VEHICLE_SELECT_SQL} WHERE id = ?1;"),
                [id.get()],
                parse_vehicle_row,
            )
            .optional()
        })?;
        Ok(vehicle)
    }

    fn find_all(&self) -> RepoResult<Vec<Vehicle>> {
        let vehicles = self.with_connection(StorageOp::Find, |conn| {
            let mut stmt = conn.prepare(&format!("{VEHICLE_SELECT_SQL} ORDER BY id ASC;"))?;
            let rows = stmt.query_map([], parse_vehicle_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })?;
        Ok(vehicles)
    }

    fn delete_by_id(&self, id: VehicleId) -> RepoResult<bool> {
        let changed = self.with_connection(StorageOp::Delete, |conn| {
            conn.execute("DELETE FROM vehicles WHERE id = ?1;", [id.get()])
        })?;

        let removed = changed > 0;
        info!("event=vehicle_delete module=repo status=ok vehicle_id={id} removed={removed}");
        Ok(removed)
    }
}

fn parse_vehicle_row(row: &Row<'_>) -> rusqlite::Result<Vehicle> {
    let id = VehicleId::new(row.get("id")?);
    let data = VehicleData {
        make: row.get("make")?,
        model: row.get("model")?,
        year: row.get("manufacture_year")?,
        color: row.get("color")?,
        price: row.get("price")?,
    };
    Ok(Vehicle::persisted(id, data))
}

fn log_failure(op: StorageOp, started_at: Instant, err: StorageError) -> StorageError {
    error!(
        "event=repo_{op} module=repo status=error duration_ms={} constraint={} error={}",
        started_at.elapsed().as_millis(),
        err.is_constraint_violation(),
        err.db_error()
    );
    err
}
