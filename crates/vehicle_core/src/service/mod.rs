//! Core use-case services.
//!
//! # Responsibility
//! - Apply business rules on top of repository calls.
//! - Keep controllers decoupled from storage details.

pub mod vehicle_service;
