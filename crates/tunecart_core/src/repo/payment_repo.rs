//! Payment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD + filtered listing over user-owned payments.
//! - Persist `owner_id` exactly as decided by the service layer.
//!
//! # Invariants
//! - Write paths call `Payment::validate()` before SQL mutations.
//! - Listing honors the normalized `FilterSpec` unchanged; owner scoping is
//!   already resolved upstream.

use crate::model::payment::{parse_payment_status, Payment, PaymentId};
use crate::query::normalizer::FilterSpec;
use crate::repo::{
    append_filter_clauses, append_order_and_page, ensure_connection_ready, parse_stored_uuid,
    RepoError, RepoResult, TableRequirement,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const PAYMENT_SELECT_SQL: &str =
    "SELECT uuid, owner_id, record_id, amount_cents, status FROM payments";

const PAYMENT_REQUIREMENTS: &[TableRequirement] = &[TableRequirement {
    table: "payments",
    columns: &[
        "uuid",
        "owner_id",
        "record_id",
        "amount_cents",
        "status",
        "created_at",
        "updated_at",
    ],
}];

/// Repository interface for payment persistence.
pub trait PaymentRepository {
    fn create_payment(&self, payment: &Payment) -> RepoResult<PaymentId>;
    fn update_payment(&self, payment: &Payment) -> RepoResult<()>;
    fn get_payment(&self, id: PaymentId) -> RepoResult<Option<Payment>>;
    fn list_payments(&self, spec: &FilterSpec) -> RepoResult<Vec<Payment>>;
    fn delete_payment(&self, id: PaymentId) -> RepoResult<()>;
}

/// SQLite-backed payment repository.
pub struct SqlitePaymentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePaymentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, PAYMENT_REQUIREMENTS)?;
        Ok(Self { conn })
    }
}

impl PaymentRepository for SqlitePaymentRepository<'_> {
    fn create_payment(&self, payment: &Payment) -> RepoResult<PaymentId> {
        payment.validate()?;
        self.conn.execute(
            "INSERT INTO payments (uuid, owner_id, record_id, amount_cents, status)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                payment.id.to_string(),
                payment.owner_id.to_string(),
                payment.record_id.to_string(),
                payment.amount_cents,
                payment.status.as_str(),
            ],
        )?;
        Ok(payment.id)
    }

    fn update_payment(&self, payment: &Payment) -> RepoResult<()> {
        payment.validate()?;
        let changed = self.conn.execute(
            "UPDATE payments
             SET
                owner_id = ?1,
                record_id = ?2,
                amount_cents = ?3,
                status = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?5;",
            params![
                payment.owner_id.to_string(),
                payment.record_id.to_string(),
                payment.amount_cents,
                payment.status.as_str(),
                payment.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                resource: "payment",
                id: payment.id,
            });
        }
        Ok(())
    }

    fn get_payment(&self, id: PaymentId) -> RepoResult<Option<Payment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PAYMENT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_payment_row(row)?));
        }
        Ok(None)
    }

    fn list_payments(&self, spec: &FilterSpec) -> RepoResult<Vec<Payment>> {
        let mut sql = format!("{PAYMENT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();
        append_filter_clauses(&mut sql, &mut bind_values, spec);
        append_order_and_page(&mut sql, &mut bind_values, spec);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut payments = Vec::new();
        while let Some(row) = rows.next()? {
            payments.push(parse_payment_row(row)?);
        }
        Ok(payments)
    }

    fn delete_payment(&self, id: PaymentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM payments WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                resource: "payment",
                id,
            });
        }
        Ok(())
    }
}

fn parse_payment_row(row: &Row<'_>) -> RepoResult<Payment> {
    let uuid_text: String = row.get("uuid")?;
    let owner_text: String = row.get("owner_id")?;
    let record_text: String = row.get("record_id")?;
    let status_text: String = row.get("status")?;
    let status = parse_payment_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid payment status `{status_text}` in payments.status"
        ))
    })?;

    let payment = Payment {
        id: parse_stored_uuid(&uuid_text, "payments", "uuid")?,
        owner_id: parse_stored_uuid(&owner_text, "payments", "owner_id")?,
        record_id: parse_stored_uuid(&record_text, "payments", "record_id")?,
        amount_cents: row.get("amount_cents")?,
        status,
    };
    payment.validate()?;
    Ok(payment)
}
