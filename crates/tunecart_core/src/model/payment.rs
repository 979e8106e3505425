//! Payment domain model — the owned resource.
//!
//! # Responsibility
//! - Define the user-owned payment record and its lifecycle states.
//! - Validate payment shape before persistence.
//!
//! # Invariants
//! - `owner_id` is the single ownership authority read by access decisions;
//!   core never rewrites it on behalf of unprivileged callers.
//! - `amount_cents` is never negative.

use crate::model::actor::ActorId;
use crate::model::catalog::RecordId;
use crate::model::ModelValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a payment.
pub type PaymentId = Uuid;

/// Payment status string value for pending payments.
pub const PAYMENT_STATUS_PENDING: &str = "pending";
/// Payment status string value for completed payments.
pub const PAYMENT_STATUS_COMPLETED: &str = "completed";
/// Payment status string value for refunded payments.
pub const PAYMENT_STATUS_REFUNDED: &str = "refunded";

/// Payment lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Refunded,
}

impl PaymentStatus {
    /// Stable string id used in storage and filters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => PAYMENT_STATUS_PENDING,
            Self::Completed => PAYMENT_STATUS_COMPLETED,
            Self::Refunded => PAYMENT_STATUS_REFUNDED,
        }
    }
}

/// Parses one payment status from its stable string value.
pub fn parse_payment_status(value: &str) -> Option<PaymentStatus> {
    match value {
        PAYMENT_STATUS_PENDING => Some(PaymentStatus::Pending),
        PAYMENT_STATUS_COMPLETED => Some(PaymentStatus::Completed),
        PAYMENT_STATUS_REFUNDED => Some(PaymentStatus::Refunded),
        _ => None,
    }
}

/// User payment for one catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    /// Identity of the owning actor; authority for access decisions.
    pub owner_id: ActorId,
    pub record_id: RecordId,
    /// Paid amount in integer cents; never negative.
    pub amount_cents: i64,
    pub status: PaymentStatus,
}

impl Payment {
    /// Creates a pending payment with a generated stable ID.
    pub fn new(owner_id: ActorId, record_id: RecordId, amount_cents: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            record_id,
            amount_cents,
            status: PaymentStatus::Pending,
        }
    }

    /// Checks shape invariants before persistence.
    ///
    /// Status strings are covered by the enum; only value ranges remain.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.amount_cents < 0 {
            return Err(ModelValidationError::NegativeAmount {
                resource: "payment",
                field: "amount_cents",
                value: self.amount_cents,
            });
        }
        Ok(())
    }
}
