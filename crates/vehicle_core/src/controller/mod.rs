//! Controller layer: the boundary presentation code calls.
//!
//! # Responsibility
//! - `VehicleController`: direct-return API with typed `CatalogError`.
//! - `InteractiveController`: presenter-driven API with formatted messages.
//! - Convert raw presentation input into validated domain values.
//!
//! # Invariants
//! - No controller call leaves a fault unhandled; both shapes share one
//!   `VehicleController` so service semantics stay identical.

pub mod input;
pub mod interactive;
pub mod vehicle_controller;
