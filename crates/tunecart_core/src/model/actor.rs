//! Authenticated caller identity and role.
//!
//! # Responsibility
//! - Define the read-only actor record produced by authentication.
//! - Provide stable role string parsing for upstream token/claim adapters.
//!
//! # Invariants
//! - An actor is immutable for the lifetime of one request.
//! - `Role::Admin` is the only role exempt from ownership checks.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for an authenticated actor.
pub type ActorId = Uuid;

/// Role string value for privileged actors.
pub const ROLE_ADMIN: &str = "admin";
/// Role string value for regular actors.
pub const ROLE_USER: &str = "user";

/// Caller role as assigned by authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Bypasses ownership checks for every operation.
    Admin,
    /// Subject to ownership scoping on owned resources.
    User,
}

impl Role {
    /// Stable string id used in claims and audit logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::User => ROLE_USER,
        }
    }
}

/// Parses one role from its stable string value.
pub fn parse_role(value: &str) -> Result<Role, RoleParseError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(RoleParseError::EmptyRole);
    }

    match normalized {
        ROLE_ADMIN => Ok(Role::Admin),
        ROLE_USER => Ok(Role::User),
        other => Err(RoleParseError::UnsupportedRole(other.to_string())),
    }
}

/// Role parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleParseError {
    EmptyRole,
    UnsupportedRole(String),
}

impl Display for RoleParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRole => write!(f, "role value must not be empty"),
            Self::UnsupportedRole(value) => write!(f, "role is unsupported: {value}"),
        }
    }
}

impl Error for RoleParseError {}

/// Authenticated caller of one operation.
///
/// Produced by the authentication collaborator; read-only within core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable identity used for ownership comparison.
    pub id: ActorId,
    /// Assigned role.
    pub role: Role,
}

impl Actor {
    /// Creates an actor record from resolved identity and role.
    pub fn new(id: ActorId, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns whether this actor bypasses ownership checks.
    pub fn is_privileged(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_role, Actor, Role, RoleParseError};
    use uuid::Uuid;

    #[test]
    fn parses_supported_roles() {
        assert_eq!(parse_role("admin").expect("admin parse"), Role::Admin);
        assert_eq!(parse_role("user").expect("user parse"), Role::User);
    }

    #[test]
    fn rejects_empty_role() {
        let err = parse_role("   ").expect_err("empty role must fail");
        assert_eq!(err, RoleParseError::EmptyRole);
    }

    #[test]
    fn rejects_unsupported_and_non_lowercase_roles() {
        let err = parse_role("owner").expect_err("unsupported role must fail");
        assert_eq!(err, RoleParseError::UnsupportedRole("owner".to_string()));

        let err = parse_role("Admin").expect_err("capitalized role must fail");
        assert_eq!(err, RoleParseError::UnsupportedRole("Admin".to_string()));
    }

    #[test]
    fn only_admin_is_privileged() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let user = Actor::new(Uuid::new_v4(), Role::User);
        assert!(admin.is_privileged());
        assert!(!user.is_privileged());
    }
}
