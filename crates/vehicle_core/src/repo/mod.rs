//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the vehicle data access contract.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository APIs distinguish missing rows (`None`/`false`/`NotFound`)
//!   from storage faults (`StorageError`).

pub mod vehicle_repo;
