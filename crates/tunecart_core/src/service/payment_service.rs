//! Payment use-case service — the ownership-scoped pipeline.
//!
//! # Responsibility
//! - Run every payment operation through validate → resolve → decide →
//!   normalize → persist.
//! - Keep list queries scoped to the acting identity for unprivileged
//!   callers, per the configured `ScopePolicy`.
//!
//! # Invariants
//! - The target payment is resolved before the access decision, so absence
//!   is never reported as denial.
//! - Unprivileged callers cannot re-home a payment to another owner.
//! - The owner filter of a list query is never trusted blindly: it is either
//!   injected by the normalizer or validated by the decision engine.

use crate::access::decision::Operation;
use crate::model::actor::{Actor, ActorId};
use crate::model::catalog::RecordId;
use crate::model::payment::{Payment, PaymentId, PaymentStatus};
use crate::query::fields::PAYMENT_LIST_FIELDS;
use crate::query::normalizer::{normalize, owner_scope, RawQuery, ScopePolicy};
use crate::repo::catalog_repo::CatalogRepository;
use crate::repo::payment_repo::PaymentRepository;
use crate::service::{authorize, ServiceError, ServiceResult};

/// Input shape for payment creation; new payments start pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDraft {
    /// Declared owner; unprivileged callers may only declare themselves.
    pub owner_id: ActorId,
    pub record_id: RecordId,
    pub amount_cents: i64,
}

/// Input shape for full payment replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentUpdate {
    pub owner_id: ActorId,
    pub record_id: RecordId,
    pub amount_cents: i64,
    pub status: PaymentStatus,
}

/// Use-case service for user-owned payments.
pub struct PaymentService<P: PaymentRepository, C: CatalogRepository> {
    payments: P,
    catalog: C,
    policy: ScopePolicy,
}

impl<P: PaymentRepository, C: CatalogRepository> PaymentService<P, C> {
    /// Creates a service with the deployment's owner scoping policy.
    pub fn new(payments: P, catalog: C, policy: ScopePolicy) -> Self {
        Self {
            payments,
            catalog,
            policy,
        }
    }

    /// Creates a payment after record resolution and ownership decision.
    pub fn create_payment(&self, actor: &Actor, draft: &PaymentDraft) -> ServiceResult<Payment> {
        let payment = Payment::new(draft.owner_id, draft.record_id, draft.amount_cents);
        payment.validate()?;
        self.resolve_record(draft.record_id)?;
        authorize(actor, Operation::Create, Some(draft.owner_id), "payment")?;
        self.payments.create_payment(&payment)?;
        Ok(payment)
    }

    /// Gets one payment; absence surfaces before the access decision.
    pub fn get_payment(&self, actor: &Actor, id: PaymentId) -> ServiceResult<Payment> {
        let payment = self.resolve_payment(id)?;
        authorize(actor, Operation::Read, Some(payment.owner_id), "payment")?;
        Ok(payment)
    }

    /// Lists payments under the normalized, owner-scoped filter.
    pub fn list_payments(&self, actor: &Actor, raw: &RawQuery) -> ServiceResult<Vec<Payment>> {
        let spec = normalize(raw, &PAYMENT_LIST_FIELDS, actor, self.policy)?;
        let scope = owner_scope(&spec, &PAYMENT_LIST_FIELDS)?;
        authorize(actor, Operation::List, scope, "payment")?;
        Ok(self.payments.list_payments(&spec)?)
    }

    /// Replaces a payment fully after ownership decisions on both the
    /// existing and the declared owner.
    pub fn update_payment(
        &self,
        actor: &Actor,
        id: PaymentId,
        update: &PaymentUpdate,
    ) -> ServiceResult<Payment> {
        let candidate = Payment {
            id,
            owner_id: update.owner_id,
            record_id: update.record_id,
            amount_cents: update.amount_cents,
            status: update.status,
        };
        candidate.validate()?;

        let existing = self.resolve_payment(id)?;
        self.resolve_record(update.record_id)?;
        authorize(actor, Operation::Update, Some(existing.owner_id), "payment")?;
        // Declared owner is decided separately so re-homing stays admin-only.
        authorize(actor, Operation::Update, Some(update.owner_id), "payment")?;

        self.payments.update_payment(&candidate)?;
        Ok(candidate)
    }

    /// Deletes a payment after resolution and ownership decision.
    pub fn delete_payment(&self, actor: &Actor, id: PaymentId) -> ServiceResult<()> {
        let existing = self.resolve_payment(id)?;
        authorize(actor, Operation::Delete, Some(existing.owner_id), "payment")?;
        self.payments.delete_payment(id)?;
        Ok(())
    }

    fn resolve_payment(&self, id: PaymentId) -> ServiceResult<Payment> {
        self.payments
            .get_payment(id)?
            .ok_or(ServiceError::NotFound {
                resource: "payment",
                id,
            })
    }

    fn resolve_record(&self, id: RecordId) -> ServiceResult<()> {
        self.catalog
            .get_record(id)?
            .map(|_| ())
            .ok_or(ServiceError::NotFound {
                resource: "record",
                id,
            })
    }
}
