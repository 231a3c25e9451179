//! Vehicle domain model.
//!
//! # Responsibility
//! - Define the catalog record and its surrogate identity.
//! - Make "never saved" vs "persisted" a type-level distinction.
//!
//! # Invariants
//! - `Vehicle::Draft` has no id; `Vehicle::Persisted` always has one.
//! - An id is assigned only by the repository insert path and never changes.
//! - Deletion is permanent; there is no tombstone state.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Upper bound for `make`/`model`, mirrored by the schema CHECK constraints.
pub const MAKE_MODEL_MAX_CHARS: usize = 50;
/// Upper bound for `color`, mirrored by the schema CHECK constraints.
pub const COLOR_MAX_CHARS: usize = 30;

/// Storage-assigned surrogate key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(i64);

impl VehicleId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for VehicleId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for VehicleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Business fields of a vehicle, independent of identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleData {
    pub make: String,
    pub model: String,
    /// Manufacture year. No range is enforced here.
    pub year: i32,
    pub color: String,
    /// Non-negative amount.
    pub price: f64,
}

impl VehicleData {
    pub fn new(
        make: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        color: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            year,
            color: color.into(),
            price,
        }
    }
}

/// Catalog record.
///
/// Serialized flat as `{"id": 1 | null, "make": ..., ...}` so external JSON
/// keeps a nullable id while Rust callers match on the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "VehicleRecord", into = "VehicleRecord")]
pub enum Vehicle {
    /// Never saved; the next `save` inserts it.
    Draft(VehicleData),
    /// Saved at least once; the next `save` updates the row with `id`.
    Persisted { id: VehicleId, data: VehicleData },
}

impl Vehicle {
    pub fn draft(data: VehicleData) -> Self {
        Self::Draft(data)
    }

    pub fn persisted(id: VehicleId, data: VehicleData) -> Self {
        Self::Persisted { id, data }
    }

    /// Returns the surrogate key, or `None` for a draft.
    pub fn id(&self) -> Option<VehicleId> {
        match self {
            Self::Draft(_) => None,
            Self::Persisted { id, .. } => Some(*id),
        }
    }

    pub fn data(&self) -> &VehicleData {
        match self {
            Self::Draft(data) => data,
            Self::Persisted { data, .. } => data,
        }
    }

    pub fn data_mut(&mut self) -> &mut VehicleData {
        match self {
            Self::Draft(data) => data,
            Self::Persisted { data, .. } => data,
        }
    }

    pub fn into_data(self) -> VehicleData {
        match self {
            Self::Draft(data) => data,
            Self::Persisted { data, .. } => data,
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted { .. })
    }
}

impl Display for Vehicle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let data = self.data();
        match self.id() {
            Some(id) => write!(f, "ID: {id}, ")?,
            None => write!(f, "ID: (unsaved), ")?,
        }
        write!(
            f,
            "Make: {}, Model: {}, Year: {}, Color: {}, Price: ${:.2}",
            data.make, data.model, data.year, data.color, data.price
        )
    }
}

/// Flat wire shape used for serde conversion of `Vehicle`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VehicleRecord {
    #[serde(default)]
    id: Option<VehicleId>,
    #[serde(flatten)]
    data: VehicleData,
}

impl From<VehicleRecord> for Vehicle {
    fn from(value: VehicleRecord) -> Self {
        match value.id {
            Some(id) => Self::Persisted {
                id,
                data: value.data,
            },
            None => Self::Draft(value.data),
        }
    }
}

impl From<Vehicle> for VehicleRecord {
    fn from(value: Vehicle) -> Self {
        let id = value.id();
        Self {
            id,
            data: value.into_data(),
        }
    }
}
