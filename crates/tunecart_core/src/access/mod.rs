//! Ownership-scoped access control.
//!
//! # Responsibility
//! - Provide the single allow/deny seam used by every mutating service path.
//! - Keep role branching out of individual resource services.
//!
//! # Invariants
//! - Decisions are pure functions of actor, operation and target owner.
//! - Existence of the target is resolved upstream; absence is never encoded
//!   as a denial here.

pub mod decision;
