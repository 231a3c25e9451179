//! Vehicle use-case service.
//!
//! # Responsibility
//! - Provide CRUD entry points for controller callers.
//! - Guard updates with an existence check before persisting.
//!
//! # Invariants
//! - `create_vehicle` always takes the repository insert path.
//! - `update_vehicle` never inserts: a draft or unknown id is `NotFound`.
//! - Storage faults propagate unchanged.
//!
//! The existence check and the save in `update_vehicle` are separate round
//! trips and are not atomic. A concurrent delete in between is reported by the
//! repository as zero rows updated and surfaces here as `NotFound`.

use crate::model::vehicle::{Vehicle, VehicleData, VehicleId};
use crate::repo::vehicle_repo::{RepoError, StorageError, VehicleRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Update target does not resolve to a stored vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFoundError {
    /// `None` when the caller passed a vehicle that was never saved.
    pub id: Option<VehicleId>,
}

impl Display for NotFoundError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "vehicle not found: {id}"),
            None => write!(f, "vehicle not found: no id provided"),
        }
    }
}

impl Error for NotFoundError {}

/// Service error for vehicle use-cases.
#[derive(Debug)]
pub enum ServiceError {
    NotFound(NotFoundError),
    Storage(StorageError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Storage(err) => Self::Storage(err),
            RepoError::NotFound(id) => Self::NotFound(NotFoundError { id: Some(id) }),
        }
    }
}

impl From<NotFoundError> for ServiceError {
    fn from(value: NotFoundError) -> Self {
        Self::NotFound(value)
    }
}

/// Use-case service wrapper for vehicle CRUD operations.
#[derive(Debug)]
pub struct VehicleService<R: VehicleRepository> {
    repo: R,
}

impl<R: VehicleRepository> VehicleService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Persists a new vehicle and returns it with its assigned id.
    pub fn create_vehicle(&self, data: VehicleData) -> ServiceResult<Vehicle> {
        let created = self.repo.save(Vehicle::draft(data))?;
        Ok(created)
    }

    pub fn get_vehicle(&self, id: VehicleId) -> ServiceResult<Option<Vehicle>> {
        Ok(self.repo.find_by_id(id)?)
    }

    pub fn get_all_vehicles(&self) -> ServiceResult<Vec<Vehicle>> {
        Ok(self.repo.find_all()?)
    }

    /// Replaces all fields of an existing vehicle.
    ///
    /// # Errors
    /// - `ServiceError::NotFound` when `vehicle` is a draft, when no row has
    ///   its id, or when the row disappears before the save lands.
    pub fn update_vehicle(&self, vehicle: Vehicle) -> ServiceResult<Vehicle> {
        let Some(id) = vehicle.id() else {
            warn!("event=vehicle_update module=service status=rejected reason=draft");
            return Err(NotFoundError { id: None }.into());
        };

        if self.repo.find_by_id(id)?.is_none() {
            info!("event=vehicle_update module=service status=rejected reason=missing vehicle_id={id}");
            return Err(NotFoundError { id: Some(id) }.into());
        }

        match self.repo.save(vehicle) {
            Ok(updated) => Ok(updated),
            Err(RepoError::NotFound(id)) => {
                warn!("event=vehicle_update module=service status=rejected reason=deleted_concurrently vehicle_id={id}");
                Err(NotFoundError { id: Some(id) }.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a vehicle. Returns whether a row was actually removed; absent
    /// ids succeed with `false`.
    pub fn delete_vehicle(&self, id: VehicleId) -> ServiceResult<bool> {
        Ok(self.repo.delete_by_id(id)?)
    }
}
