//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate the per-request pipeline: validate shape, resolve
//!   referenced entities, apply the access decision, normalize list queries,
//!   execute persistence.
//! - Surface the full error taxonomy to callers without local recovery.
//!
//! # Invariants
//! - Existence checks run before, and independently of, access decisions.
//! - Denials expose no ownership details in their message; the reason code
//!   is carried for diagnostics only.

use crate::access::decision::{decide, Decision, DecisionReason, Operation};
use crate::model::actor::{Actor, ActorId};
use crate::model::ModelValidationError;
use crate::query::normalizer::QueryError;
use crate::repo::RepoError;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod catalog_service;
pub mod payment_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level error taxonomy surfaced to callers.
#[derive(Debug)]
pub enum ServiceError {
    /// Malformed or missing input; the operation was never attempted.
    Validation(ModelValidationError),
    /// List query input failed normalization.
    Query(QueryError),
    /// Referenced or target entity is absent; distinct from denial.
    NotFound { resource: &'static str, id: Uuid },
    /// Access decision denied the operation.
    Unauthorized(DecisionReason),
    /// Persistence failure after all checks passed.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Query(err) => write!(f, "{err}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            // Message conveys denial only; ownership details stay internal.
            Self::Unauthorized(_) => write!(f, "operation not permitted"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Query(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotFound { .. } | Self::Unauthorized(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound { resource, id } => Self::NotFound { resource, id },
            other => Self::Repo(other),
        }
    }
}

impl From<QueryError> for ServiceError {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}

impl From<ModelValidationError> for ServiceError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Runs the access decision and converts denial into `Unauthorized`.
///
/// Denials are logged with their reason code; the returned error message
/// stays opaque.
pub(crate) fn authorize(
    actor: &Actor,
    operation: Operation,
    target_owner: Option<ActorId>,
    resource: &'static str,
) -> ServiceResult<Decision> {
    let decision = decide(actor, operation, target_owner);
    if !decision.allowed {
        warn!(
            "event=access_denied module=access resource={resource} operation={} actor_role={} reason={}",
            operation.as_str(),
            actor.role.as_str(),
            decision.reason.as_str()
        );
        return Err(ServiceError::Unauthorized(decision.reason));
    }
    Ok(decision)
}
