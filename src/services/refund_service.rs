use crate::models::payment::{ensure_positive_amount, PaymentStatus};
use crate::models::refund::{ensure_refund_within, Refund, RefundRequest, RefundStatus};
use crate::services::payment_service::PaymentWithOwner;
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt::AuthenticatedUser;
use rust_decimal::Decimal;
use sqlx::PgPool;
use validator::Validate;

#[derive(Clone)]
pub struct RefundService {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct RefundWithOwner {
    #[sqlx(flatten)]
    refund: Refund,
    customer_id: i32,
}

impl RefundService {
    pub fn new(pool: PgPool) -> Self {
        RefundService { pool }
    }

    /// Requests a refund against a succeeded payment. The payment row is
    /// locked while the already-refunded total is summed, so concurrent
    /// requests cannot jointly exceed the payment.
    pub async fn create(&self, user: &AuthenticatedUser, request: RefundRequest) -> AppResult<Refund> {
        request.validate()?;
        ensure_positive_amount(request.amount)?;

        let mut tx = self.pool.begin().await?;

        let payment = sqlx::query_as::<_, PaymentWithOwner>(
            r#"
            SELECT p.id, p.booking_id, p.amount, p.method, p.status, p.transaction_ref, p.created_at,
                b.customer_id
            FROM payments p
            JOIN bookings b ON b.id = p.booking_id
            WHERE p.id = $1
            FOR UPDATE OF p
            "#,
        )
        .bind(request.payment_id)
        .fetch_optional(&mut *tx)
        .await?
        .filter(|row| user.can_access(row.customer_id))
        .ok_or_else(|| AppError::NotFound("Payment not found".into()))?
        .payment;

        if payment.status != PaymentStatus::Succeeded {
            return Err(AppError::Conflict("Only succeeded payments can be refunded".into()));
        }

        let refunded: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM refunds WHERE payment_id = $1 AND status <> 'rejected'",
        )
        .bind(payment.id)
        .fetch_one(&mut *tx)
        .await?;

        ensure_refund_within(payment.amount, refunded, request.amount)?;

        let refund = sqlx::query_as::<_, Refund>(
            r#"
            INSERT INTO refunds (payment_id, booking_id, amount, reason, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING id, payment_id, booking_id, amount, reason, status, created_at
            "#,
        )
        .bind(payment.id)
        .bind(payment.booking_id)
        .bind(request.amount)
        .bind(request.reason.as_deref().map(str::trim))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(refund_id = refund.id, payment_id = payment.id, "refund requested");
        Ok(refund)
    }

    pub async fn list(&self, user: &AuthenticatedUser, payment_id: Option<i32>) -> AppResult<Vec<Refund>> {
        let owner = if user.is_admin() { None } else { Some(user.customer_id) };
        let refunds = sqlx::query_as::<_, Refund>(
            r#"
            SELECT r.id, r.payment_id, r.booking_id, r.amount, r.reason, r.status, r.created_at
            FROM refunds r
            JOIN bookings b ON b.id = r.booking_id
            WHERE ($1::INT IS NULL OR b.customer_id = $1)
            AND ($2::INT IS NULL OR r.payment_id = $2)
            ORDER BY r.created_at, r.id
            "#,
        )
        .bind(owner)
        .bind(payment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(refunds)
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: i32) -> AppResult<Refund> {
        sqlx::query_as::<_, RefundWithOwner>(
            r#"
            SELECT r.id, r.payment_id, r.booking_id, r.amount, r.reason, r.status, r.created_at,
                b.customer_id
            FROM refunds r
            JOIN bookings b ON b.id = r.booking_id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .filter(|row| user.can_access(row.customer_id))
        .map(|row| row.refund)
        .ok_or_else(|| AppError::NotFound("Refund not found".into()))
    }

    // Settles a pending refund
    pub async fn update_status(&self, id: i32, status: RefundStatus) -> AppResult<Refund> {
        let mut tx = self.pool.begin().await?;

        let current: RefundStatus = sqlx::query_scalar("SELECT status FROM refunds WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Refund not found".into()))?;

        if !current.can_transition_to(status) {
            return Err(AppError::Conflict(format!(
                "Refund cannot move from {} to {}",
                current, status
            )));
        }

        let refund = sqlx::query_as::<_, Refund>(
            r#"
            UPDATE refunds SET status = $2 WHERE id = $1
            RETURNING id, payment_id, booking_id, amount, reason, status, created_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(refund_id = id, %status, "refund settled");
        Ok(refund)
    }
}
