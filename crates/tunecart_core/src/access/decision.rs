//! Access decision engine.
//!
//! # Responsibility
//! - Decide whether an actor may run one operation against one owner scope.
//! - Attach a stable reason code to every outcome for diagnostics.
//!
//! # Invariants
//! - `decide` is deterministic and side-effect free; identical inputs always
//!   produce identical decisions.
//! - Privileged actors are allowed unconditionally, even when the target
//!   does not exist — existence is an independent upstream gate.
//! - Unprivileged list access requires an owner scope; an absent scope is a
//!   distinct denial from a mismatched one.

use crate::model::actor::{Actor, ActorId};

/// Operation kind evaluated by the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    List,
    Update,
    Delete,
}

impl Operation {
    /// Stable string id used in audit logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::List => "list",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Reason code attached to every decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    /// Allowed: target owner matches the acting identity.
    SelfOwned,
    /// Allowed: actor role bypasses ownership checks.
    Privileged,
    /// Denied: target owner differs from the acting identity.
    NotOwner,
    /// Denied: list access without an owner scope.
    MissingOwnerFilter,
}

impl DecisionReason {
    /// Stable string id used in audit logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SelfOwned => "self",
            Self::Privileged => "privileged",
            Self::NotOwner => "denied_not_owner",
            Self::MissingOwnerFilter => "denied_missing_filter",
        }
    }
}

/// Allow/deny outcome with reason code.
///
/// Computed fresh per request; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub reason: DecisionReason,
}

impl Decision {
    fn allow(reason: DecisionReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    fn deny(reason: DecisionReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}

/// Decides whether `actor` may run `operation` against the given owner scope.
///
/// `target_owner` semantics:
/// - create/read/update/delete: the declared or resolved owner of the target
///   resource; `None` marks an unowned resource, which only privileged
///   actors may mutate.
/// - list: the owner scope extracted from the normalized filter; `None`
///   means the request supplied no owner scope.
///
/// Callers must resolve target existence before invoking this function for
/// read/update/delete, so that NotFound is never conflated with denial.
pub fn decide(actor: &Actor, operation: Operation, target_owner: Option<ActorId>) -> Decision {
    if actor.is_privileged() {
        return Decision::allow(DecisionReason::Privileged);
    }

    match operation {
        Operation::List => match target_owner {
            None => Decision::deny(DecisionReason::MissingOwnerFilter),
            Some(owner) if owner == actor.id => Decision::allow(DecisionReason::SelfOwned),
            Some(_) => Decision::deny(DecisionReason::NotOwner),
        },
        Operation::Create | Operation::Read | Operation::Update | Operation::Delete => {
            match target_owner {
                Some(owner) if owner == actor.id => Decision::allow(DecisionReason::SelfOwned),
                // An unowned target can never be claimed by a non-admin.
                Some(_) | None => Decision::deny(DecisionReason::NotOwner),
            }
        }
    }
}
