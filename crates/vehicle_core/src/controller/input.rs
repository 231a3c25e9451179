//! Raw presentation input and its conversion into domain values.
//!
//! # Responsibility
//! - Parse text-field input into `VehicleData` and `VehicleId`.
//! - Enforce the field rules every stored vehicle must satisfy.
//!
//! # Invariants
//! - Conversion never panics; every rejection is a `ValidationError`.
//! - Partial updates keep existing values for blank fields.

use crate::model::vehicle::{VehicleData, VehicleId, COLOR_MAX_CHARS, MAKE_MODEL_MAX_CHARS};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input rejected before it reached the service layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trim.
    Blank { field: &'static str },
    /// Text field exceeds the stored column bound.
    TooLong {
        field: &'static str,
        max_chars: usize,
    },
    /// Numeric field could not be parsed.
    InvalidNumber { field: &'static str, value: String },
    /// Price is negative, NaN or infinite.
    InvalidPrice { value: String },
    /// Structured payload (JSON command body) could not be decoded.
    MalformedPayload(String),
    /// Command channel received an action it does not know.
    UnknownCommand(String),
}

impl ValidationError {
    /// Returns the offending field name when the error is field-scoped.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Blank { field }
            | Self::TooLong { field, .. }
            | Self::InvalidNumber { field, .. } => Some(*field),
            Self::InvalidPrice { .. } => Some("price"),
            Self::MalformedPayload(_) | Self::UnknownCommand(_) => None,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "{field} must not be blank"),
            Self::TooLong { field, max_chars } => {
                write!(f, "{field} must be at most {max_chars} characters")
            }
            Self::InvalidNumber { field, value } => {
                write!(f, "Invalid number format for {field}: `{value}`")
            }
            Self::InvalidPrice { value } => {
                write!(f, "price must be a non-negative amount, got `{value}`")
            }
            Self::MalformedPayload(message) => write!(f, "malformed vehicle payload: {message}"),
            Self::UnknownCommand(action) => write!(f, "unknown command `{action}`"),
        }
    }
}

impl Error for ValidationError {}

/// Text-field values as collected by a form or prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleInput {
    pub make: String,
    pub model: String,
    pub year: String,
    pub color: String,
    pub price: String,
}

impl VehicleInput {
    /// Converts a complete form into vehicle data.
    pub fn parse(&self) -> Result<VehicleData, ValidationError> {
        let data = VehicleData {
            make: self.make.trim().to_string(),
            model: self.model.trim().to_string(),
            year: parse_year(&self.year)?,
            color: self.color.trim().to_string(),
            price: parse_price(&self.price)?,
        };
        validate_vehicle_data(&data)?;
        Ok(data)
    }

    /// Applies a partial form on top of `existing`; blank fields keep the
    /// existing value.
    pub fn merge_into(&self, existing: &VehicleData) -> Result<VehicleData, ValidationError> {
        let data = VehicleData {
            make: non_blank_or(&self.make, &existing.make),
            model: non_blank_or(&self.model, &existing.model),
            year: if self.year.trim().is_empty() {
                existing.year
            } else {
                parse_year(&self.year)?
            },
            color: non_blank_or(&self.color, &existing.color),
            price: if self.price.trim().is_empty() {
                existing.price
            } else {
                parse_price(&self.price)?
            },
        };
        validate_vehicle_data(&data)?;
        Ok(data)
    }
}

/// Parses a vehicle id typed by a user.
pub fn parse_vehicle_id(raw: &str) -> Result<VehicleId, ValidationError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map(VehicleId::new)
        .map_err(|_| ValidationError::InvalidNumber {
            field: "id",
            value: trimmed.to_string(),
        })
}

/// Checks the field rules shared by every input path.
pub fn validate_vehicle_data(data: &VehicleData) -> Result<(), ValidationError> {
    validate_text("make", &data.make, MAKE_MODEL_MAX_CHARS)?;
    validate_text("model", &data.model, MAKE_MODEL_MAX_CHARS)?;
    validate_text("color", &data.color, COLOR_MAX_CHARS)?;
    if !data.price.is_finite() || data.price < 0.0 {
        return Err(ValidationError::InvalidPrice {
            value: data.price.to_string(),
        });
    }
    Ok(())
}

fn validate_text(field: &'static str, value: &str, max_chars: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    if value.chars().count() > max_chars {
        return Err(ValidationError::TooLong { field, max_chars });
    }
    Ok(())
}

fn parse_year(raw: &str) -> Result<i32, ValidationError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i32>()
        .map_err(|_| ValidationError::InvalidNumber {
            field: "year",
            value: trimmed.to_string(),
        })
}

fn parse_price(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    let price = trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidNumber {
            field: "price",
            value: trimmed.to_string(),
        })?;
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::InvalidPrice {
            value: trimmed.to_string(),
        });
    }
    Ok(price)
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
