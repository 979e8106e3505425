//! Catalog domain models: genres, bands, records.
//!
//! # Responsibility
//! - Define the unowned catalog records managed by privileged actors.
//! - Validate catalog shape before persistence.
//!
//! # Invariants
//! - `uuid` values are stable and never reused.
//! - Referential fields (`genre_id`, `band_id`) point at existing rows;
//!   existence is resolved by the service layer before writes.

use crate::model::{require_non_empty, require_year_in_range, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a genre.
pub type GenreId = Uuid;
/// Stable identifier for a band.
pub type BandId = Uuid;
/// Stable identifier for a record (release for sale).
pub type RecordId = Uuid;

/// Musical genre, referenced by bands and records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
    pub description: Option<String>,
}

impl Genre {
    /// Creates a genre with a generated stable ID.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
        }
    }

    /// Checks shape invariants before persistence.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_non_empty("genre", "name", &self.name)
    }
}

/// Band whose records are sold through the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub id: BandId,
    pub name: String,
    pub genre_id: GenreId,
    pub formed_year: Option<i32>,
}

impl Band {
    /// Creates a band with a generated stable ID.
    pub fn new(name: impl Into<String>, genre_id: GenreId, formed_year: Option<i32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            genre_id,
            formed_year,
        }
    }

    /// Checks shape invariants before persistence.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_non_empty("band", "name", &self.name)?;
        require_year_in_range("band", "formed_year", self.formed_year)
    }
}

/// Record offered for sale, attached to one band and one genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub title: String,
    pub band_id: BandId,
    pub genre_id: GenreId,
    /// Sale price in integer cents; never negative.
    pub price_cents: i64,
    pub released_year: Option<i32>,
}

impl Record {
    /// Creates a record with a generated stable ID.
    pub fn new(
        title: impl Into<String>,
        band_id: BandId,
        genre_id: GenreId,
        price_cents: i64,
        released_year: Option<i32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            band_id,
            genre_id,
            price_cents,
            released_year,
        }
    }

    /// Checks shape invariants before persistence.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_non_empty("record", "title", &self.title)?;
        if self.price_cents < 0 {
            return Err(ModelValidationError::NegativeAmount {
                resource: "record",
                field: "price_cents",
                value: self.price_cents,
            });
        }
        require_year_in_range("record", "released_year", self.released_year)
    }
}
