use crate::models::booking::BookingStatus;
use crate::models::payment::{
    ensure_positive_amount, ensure_within_balance, Payment, PaymentRequest, PaymentStatus,
};
use crate::services::booking_service::lock_booking;
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt::AuthenticatedUser;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct PaymentService {
    pool: PgPool,
}

impl PaymentService {
    pub fn new(pool: PgPool) -> Self {
        PaymentService { pool }
    }

    /// Records a payment against a booking. A succeeded payment that settles
    /// the booking total confirms a pending booking.
    pub async fn create(&self, user: &AuthenticatedUser, request: PaymentRequest) -> AppResult<Payment> {
        request.validate()?;
        ensure_positive_amount(request.amount)?;
        let status = request.status.unwrap_or(PaymentStatus::Succeeded);

        let mut tx = self.pool.begin().await?;
        let booking = lock_booking(&mut tx, user, request.booking_id).await?;

        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::Conflict("Cannot pay for a cancelled booking".into()));
        }

        if status == PaymentStatus::Succeeded {
            let paid: Decimal = sqlx::query_scalar(
                "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE booking_id = $1 AND status = 'succeeded'",
            )
            .bind(booking.id)
            .fetch_one(&mut *tx)
            .await?;

            let new_paid = ensure_within_balance(booking.total_amount, paid, request.amount)?;

            if new_paid == booking.total_amount && booking.status == BookingStatus::Pending {
                sqlx::query("UPDATE bookings SET status = $2 WHERE id = $1")
                    .bind(booking.id)
                    .bind(BookingStatus::Confirmed)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (booking_id, amount, method, status, transaction_ref)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, booking_id, amount, method, status, transaction_ref, created_at
            "#,
        )
        .bind(booking.id)
        .bind(request.amount)
        .bind(request.method.trim())
        .bind(status)
        .bind(Uuid::new_v4())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            payment_id = payment.id,
            booking_id = booking.id,
            status = %payment.status,
            "payment recorded"
        );
        Ok(payment)
    }

    pub async fn list(&self, user: &AuthenticatedUser, booking_id: Option<i32>) -> AppResult<Vec<Payment>> {
        let owner = if user.is_admin() { None } else { Some(user.customer_id) };
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT p.id, p.booking_id, p.amount, p.method, p.status, p.transaction_ref, p.created_at
            FROM payments p
            JOIN bookings b ON b.id = p.booking_id
            WHERE ($1::INT IS NULL OR b.customer_id = $1)
            AND ($2::INT IS NULL OR p.booking_id = $2)
            ORDER BY p.created_at, p.id
            "#,
        )
        .bind(owner)
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: i32) -> AppResult<Payment> {
        let row: Option<(Payment, i32)> = sqlx::query_as::<_, PaymentWithOwner>(
            r#"
            SELECT p.id, p.booking_id, p.amount, p.method, p.status, p.transaction_ref, p.created_at,
                b.customer_id
            FROM payments p
            JOIN bookings b ON b.id = p.booking_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(|row| (row.payment, row.customer_id));

        match row {
            Some((payment, owner)) if user.can_access(owner) => Ok(payment),
            _ => Err(AppError::NotFound("Payment not found".into())),
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PaymentWithOwner {
    #[sqlx(flatten)]
    pub payment: Payment,
    pub customer_id: i32,
}
