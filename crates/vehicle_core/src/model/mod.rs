//! Catalog domain model.
//!
//! # Responsibility
//! - Define the vehicle record shared by repository, service and controller.
//!
//! # Invariants
//! - Identity is a storage-assigned surrogate key (`VehicleId`).
//! - Drafts and persisted vehicles are distinct enum variants.

pub mod vehicle;
