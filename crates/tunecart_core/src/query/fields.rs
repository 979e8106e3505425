//! Per-operation recognized field registry.
//!
//! # Responsibility
//! - Pin the filterable/sortable field set for each list operation.
//! - Classify fields that require identifier or integer value parsing.
//!
//! # Invariants
//! - Every registry string is `'static`; normalized queries only carry
//!   names from this registry.
//! - `owner_field` is set exactly for owned resources (payments).

/// Fixed field constraints for one list operation.
#[derive(Debug, Clone, Copy)]
pub struct FieldSet {
    /// Resource label used in errors and audit logs.
    pub resource: &'static str,
    /// Equality-filter fields recognized for this operation.
    pub filterable: &'static [&'static str],
    /// Fields allowed in `sort_by`.
    pub sortable: &'static [&'static str],
    /// Filter fields whose values must parse as UUIDs.
    pub id_fields: &'static [&'static str],
    /// Filter fields whose values must parse as integers.
    pub int_fields: &'static [&'static str],
    /// Ownership-scoping field, when this resource is owned.
    pub owner_field: Option<&'static str>,
}

impl FieldSet {
    /// Returns the registry string for a recognized filter field.
    pub fn canonical_filter(&self, field: &str) -> Option<&'static str> {
        self.filterable.iter().copied().find(|name| *name == field)
    }

    /// Returns the registry string for a recognized sort field.
    pub fn canonical_sort(&self, field: &str) -> Option<&'static str> {
        self.sortable.iter().copied().find(|name| *name == field)
    }

    /// Returns whether the field value must parse as a UUID.
    pub fn is_id_field(&self, field: &str) -> bool {
        self.id_fields.contains(&field)
    }

    /// Returns whether the field value must parse as an integer.
    pub fn is_int_field(&self, field: &str) -> bool {
        self.int_fields.contains(&field)
    }
}

/// Genre list operation fields.
pub const GENRE_LIST_FIELDS: FieldSet = FieldSet {
    resource: "genre",
    filterable: &["name"],
    sortable: &["name", "created_at"],
    id_fields: &[],
    int_fields: &[],
    owner_field: None,
};

/// Band list operation fields.
pub const BAND_LIST_FIELDS: FieldSet = FieldSet {
    resource: "band",
    filterable: &["name", "genre_id"],
    sortable: &["name", "formed_year", "created_at"],
    id_fields: &["genre_id"],
    int_fields: &[],
    owner_field: None,
};

/// Record list operation fields.
pub const RECORD_LIST_FIELDS: FieldSet = FieldSet {
    resource: "record",
    filterable: &["band_id", "genre_id", "released_year"],
    sortable: &["title", "price_cents", "released_year", "created_at"],
    id_fields: &["band_id", "genre_id"],
    int_fields: &["released_year"],
    owner_field: None,
};

/// Payment list operation fields — the owned resource.
pub const PAYMENT_LIST_FIELDS: FieldSet = FieldSet {
    resource: "payment",
    filterable: &["owner_id", "record_id", "status"],
    sortable: &["amount_cents", "created_at"],
    id_fields: &["owner_id", "record_id"],
    int_fields: &[],
    owner_field: Some("owner_id"),
};
