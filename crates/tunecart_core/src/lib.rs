//! Core domain logic for Tunecart.
//! This crate is the single source of truth for access-control and query
//! normalization invariants over the music-commerce resources.

pub mod access;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use access::decision::{decide, Decision, DecisionReason, Operation};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::actor::{parse_role, Actor, ActorId, Role};
pub use model::catalog::{Band, BandId, Genre, GenreId, Record, RecordId};
pub use model::payment::{parse_payment_status, Payment, PaymentId, PaymentStatus};
pub use model::ModelValidationError;
pub use query::fields::{
    FieldSet, BAND_LIST_FIELDS, GENRE_LIST_FIELDS, PAYMENT_LIST_FIELDS, RECORD_LIST_FIELDS,
};
pub use query::normalizer::{
    normalize, owner_scope, FilterSpec, FilterValue, QueryError, RawQuery, ScopePolicy,
    SortDirection, SortSpec, DEFAULT_LIMIT, MAX_LIMIT,
};
pub use repo::catalog_repo::{CatalogRepository, SqliteCatalogRepository};
pub use repo::payment_repo::{PaymentRepository, SqlitePaymentRepository};
pub use repo::{RepoError, RepoResult};
pub use service::catalog_service::{BandDraft, CatalogService, GenreDraft, RecordDraft};
pub use service::payment_service::{PaymentDraft, PaymentService, PaymentUpdate};
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
