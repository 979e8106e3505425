//! Domain model for the music-commerce catalog and payments.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own shape validation for every persisted record.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - Write paths must pass `validate()` before reaching persistence.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod actor;
pub mod catalog;
pub mod payment;

/// Shape validation error shared by all domain models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// A required text field is empty or whitespace-only.
    EmptyField {
        resource: &'static str,
        field: &'static str,
    },
    /// A monetary field is negative.
    NegativeAmount {
        resource: &'static str,
        field: &'static str,
        value: i64,
    },
    /// A year field is outside the plausible range.
    YearOutOfRange {
        resource: &'static str,
        field: &'static str,
        value: i32,
    },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { resource, field } => {
                write!(f, "{resource}.{field} must not be empty")
            }
            Self::NegativeAmount {
                resource,
                field,
                value,
            } => write!(f, "{resource}.{field} must not be negative, got {value}"),
            Self::YearOutOfRange {
                resource,
                field,
                value,
            } => write!(
                f,
                "{resource}.{field} is outside the supported year range: {value}"
            ),
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) const YEAR_MIN: i32 = 1850;
pub(crate) const YEAR_MAX: i32 = 2100;

pub(crate) fn require_non_empty(
    resource: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError::EmptyField { resource, field });
    }
    Ok(())
}

pub(crate) fn require_year_in_range(
    resource: &'static str,
    field: &'static str,
    value: Option<i32>,
) -> Result<(), ModelValidationError> {
    if let Some(year) = value {
        if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
            return Err(ModelValidationError::YearOutOfRange {
                resource,
                field,
                value: year,
            });
        }
    }
    Ok(())
}
