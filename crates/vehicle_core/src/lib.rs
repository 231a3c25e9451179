//! Core data path for the vehicle catalog.
//! Repository, service and controller layers over a SQLite store.

pub mod config;
pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CatalogConfig, ConfigError};
pub use controller::input::{parse_vehicle_id, validate_vehicle_data, ValidationError, VehicleInput};
pub use controller::interactive::{
    ActionResponse, CatalogCommand, FlowOutcome, InteractiveController, MessageKind,
    VehiclePresenter,
};
pub use controller::vehicle_controller::{
    CatalogError, CatalogResult, ErrorCategory, VehicleController,
};
pub use db::{ConnectionSource, DbError, DbResult, SqliteFile};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::vehicle::{Vehicle, VehicleData, VehicleId};
pub use repo::vehicle_repo::{
    RepoError, RepoResult, SqliteVehicleRepository, StorageError, StorageOp, VehicleRepository,
};
pub use service::vehicle_service::{NotFoundError, ServiceError, ServiceResult, VehicleService};

/// Builds the repository → service → controller chain over `source`.
///
/// # Errors
/// - `StorageError` when the store cannot be opened or its schema created.
pub fn build_controller<S: ConnectionSource>(
    source: S,
) -> Result<VehicleController<SqliteVehicleRepository<S>>, StorageError> {
    let repo = SqliteVehicleRepository::open(source)?;
    Ok(VehicleController::new(VehicleService::new(repo)))
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
