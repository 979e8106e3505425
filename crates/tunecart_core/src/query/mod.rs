//! List query normalization.
//!
//! # Responsibility
//! - Project raw caller input onto fixed per-operation field sets.
//! - Normalize pagination/sort values and enforce owner scoping policy.
//!
//! # Invariants
//! - Field names flowing into `FilterSpec` are static registry strings,
//!   never raw caller text.
//! - The normalizer never touches storage.

pub mod fields;
pub mod normalizer;
