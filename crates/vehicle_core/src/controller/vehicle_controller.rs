//! Direct-return vehicle controller.
//!
//! # Responsibility
//! - Be the single entry point code callers use for catalog operations.
//! - Translate service outcomes into one categorized `CatalogError`.
//!
//! # Invariants
//! - Every call returns a definite value or a definite `CatalogError`.
//! - Vehicle data is validated before it reaches the service.

use crate::controller::input::{validate_vehicle_data, ValidationError, VehicleInput};
use crate::model::vehicle::{Vehicle, VehicleData, VehicleId};
use crate::repo::vehicle_repo::{StorageError, VehicleRepository};
use crate::service::vehicle_service::{NotFoundError, ServiceError, VehicleService};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Coarse error class reported to presentation callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Storage,
    NotFound,
    Validation,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
        }
    }
}

/// Every failure a controller call can produce.
#[derive(Debug)]
pub enum CatalogError {
    Storage(StorageError),
    NotFound(NotFoundError),
    Validation(ValidationError),
}

impl CatalogError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Storage(_) => ErrorCategory::Storage,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::Validation(_) => ErrorCategory::Validation,
        }
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::NotFound(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::NotFound(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<ServiceError> for CatalogError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::Storage(err) => Self::Storage(err),
            ServiceError::NotFound(err) => Self::NotFound(err),
        }
    }
}

impl From<ValidationError> for CatalogError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Controller facade over the vehicle service.
#[derive(Debug)]
pub struct VehicleController<R: VehicleRepository> {
    service: VehicleService<R>,
}

impl<R: VehicleRepository> VehicleController<R> {
    pub fn new(service: VehicleService<R>) -> Self {
        Self { service }
    }

    /// Adds a new vehicle and returns it with its assigned id.
    pub fn add_vehicle(&self, data: VehicleData) -> CatalogResult<Vehicle> {
        observe("add", || {
            validate_vehicle_data(&data)?;
            Ok(self.service.create_vehicle(data)?)
        })
    }

    /// Parses form input and adds the resulting vehicle.
    pub fn add_vehicle_from_input(&self, input: &VehicleInput) -> CatalogResult<Vehicle> {
        let data = observe("add", || Ok(input.parse()?))?;
        self.add_vehicle(data)
    }

    pub fn list_vehicles(&self) -> CatalogResult<Vec<Vehicle>> {
        observe("list", || Ok(self.service.get_all_vehicles()?))
    }

    pub fn find_vehicle(&self, id: VehicleId) -> CatalogResult<Option<Vehicle>> {
        observe("find", || Ok(self.service.get_vehicle(id)?))
    }

    /// Replaces all fields of an existing vehicle.
    pub fn update_vehicle(&self, vehicle: Vehicle) -> CatalogResult<Vehicle> {
        observe("update", || {
            validate_vehicle_data(vehicle.data())?;
            Ok(self.service.update_vehicle(vehicle)?)
        })
    }

    /// Deletes a vehicle; returns whether a row was removed.
    pub fn delete_vehicle(&self, id: VehicleId) -> CatalogResult<bool> {
        observe("delete", || Ok(self.service.delete_vehicle(id)?))
    }
}

fn observe<T>(op: &'static str, f: impl FnOnce() -> CatalogResult<T>) -> CatalogResult<T> {
    let result = f();
    if let Err(err) = &result {
        warn!(
            "event=controller_call module=controller op={op} status=error category={}",
            err.category().as_str()
        );
    }
    result
}
