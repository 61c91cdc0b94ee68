use async_trait::async_trait;
use chrono::{Duration, Utc};
use ctor::dtor;
use flight_reservation::models::booking::{BookingRequest, BookingStatus};
use flight_reservation::models::customer::Role;
use flight_reservation::models::payment::{PaymentRequest, PaymentStatus};
use flight_reservation::models::refund::{RefundRequest, RefundStatus};
use flight_reservation::utils::error::AppError;
use flight_reservation::utils::jwt::AuthenticatedUser;
use rust_decimal::Decimal;
use test_context::{test_context, AsyncTestContext};

mod common {
    pub mod test_utils;
}
use common::test_utils::{seed_customer, seed_instance, TestDb, TestServices};

struct PaymentServiceContext {
    services: Option<TestServices>,
}

#[dtor]
fn cleanup() {
    if let Err(e) = TestDb::cleanup_database_sync() {
        eprintln!("Failed to cleanup test database: {}", e);
    }
}

#[async_trait]
impl AsyncTestContext for PaymentServiceContext {
    async fn setup() -> Self {
        PaymentServiceContext {
            services: TestServices::connect(file!()).await,
        }
    }

    async fn teardown(self) {
        if let Some(services) = self.services {
            services.pool.close().await;
        }
    }
}

impl PaymentServiceContext {
    // A pending two-seat booking worth 200.00, with its owner
    async fn booking(services: &TestServices) -> Result<(AuthenticatedUser, i32), AppError> {
        let (instance_id, seat_ids) =
            seed_instance(&services.pool, Utc::now() + Duration::days(6), 2, Decimal::new(10000, 2)).await?;
        let customer_id = seed_customer(&services.pool).await?;
        let booking = services
            .bookings
            .create(
                customer_id,
                BookingRequest {
                    flight_instance_id: instance_id,
                    seat_ids,
                },
            )
            .await?;
        let user = AuthenticatedUser {
            customer_id,
            role: Role::Customer,
        };
        Ok((user, booking.booking.id))
    }
}

fn payment(booking_id: i32, amount: i64, status: Option<PaymentStatus>) -> PaymentRequest {
    PaymentRequest {
        booking_id,
        amount: Decimal::new(amount, 2),
        method: "card".into(),
        status,
    }
}

fn refund(payment_id: i32, amount: i64) -> RefundRequest {
    RefundRequest {
        payment_id,
        amount: Decimal::new(amount, 2),
        reason: Some("schedule change".into()),
    }
}

#[test_context(PaymentServiceContext)]
#[tokio::test]
async fn test_full_payment_confirms_booking(ctx: &PaymentServiceContext) -> Result<(), AppError> {
    let Some(services) = &ctx.services else { return Ok(()) };
    let (user, booking_id) = PaymentServiceContext::booking(services).await?;

    let first = services.payments.create(&user, payment(booking_id, 5000, None)).await?;
    assert_eq!(first.status, PaymentStatus::Succeeded);
    assert_eq!(services.bookings.get(&user, booking_id).await?.booking.status, BookingStatus::Pending);

    // Failed attempts never count towards the balance
    services
        .payments
        .create(&user, payment(booking_id, 15000, Some(PaymentStatus::Failed)))
        .await?;
    assert_eq!(services.bookings.get(&user, booking_id).await?.booking.status, BookingStatus::Pending);

    services.payments.create(&user, payment(booking_id, 15000, None)).await?;
    assert_eq!(services.bookings.get(&user, booking_id).await?.booking.status, BookingStatus::Confirmed);

    let payments = services.payments.list(&user, Some(booking_id)).await?;
    assert_eq!(payments.len(), 3);
    assert_ne!(payments[0].transaction_ref, payments[1].transaction_ref);
    Ok(())
}

#[test_context(PaymentServiceContext)]
#[tokio::test]
async fn test_payment_cannot_exceed_balance(ctx: &PaymentServiceContext) -> Result<(), AppError> {
    let Some(services) = &ctx.services else { return Ok(()) };
    let (user, booking_id) = PaymentServiceContext::booking(services).await?;

    services.payments.create(&user, payment(booking_id, 15000, None)).await?;
    let over = services.payments.create(&user, payment(booking_id, 5001, None)).await;
    assert!(matches!(over, Err(AppError::ValidationError(_))));
    Ok(())
}

#[test_context(PaymentServiceContext)]
#[tokio::test]
async fn test_payment_guards(ctx: &PaymentServiceContext) -> Result<(), AppError> {
    let Some(services) = &ctx.services else { return Ok(()) };
    let (user, booking_id) = PaymentServiceContext::booking(services).await?;

    let stranger = AuthenticatedUser {
        customer_id: seed_customer(&services.pool).await?,
        role: Role::Customer,
    };
    let foreign = services.payments.create(&stranger, payment(booking_id, 100, None)).await;
    assert!(matches!(foreign, Err(AppError::NotFound(_))));

    services.bookings.cancel(&user, booking_id).await?;
    let cancelled = services.payments.create(&user, payment(booking_id, 100, None)).await;
    assert!(matches!(cancelled, Err(AppError::Conflict(_))));
    Ok(())
}

#[test_context(PaymentServiceContext)]
#[tokio::test]
async fn test_refunds_are_capped_by_payment(ctx: &PaymentServiceContext) -> Result<(), AppError> {
    let Some(services) = &ctx.services else { return Ok(()) };
    let (user, booking_id) = PaymentServiceContext::booking(services).await?;
    let paid = services.payments.create(&user, payment(booking_id, 10000, None)).await?;

    let first = services.refunds.create(&user, refund(paid.id, 6000)).await?;
    assert_eq!(first.status, RefundStatus::Pending);
    assert_eq!(first.booking_id, booking_id);

    let over = services.refunds.create(&user, refund(paid.id, 4001)).await;
    assert!(matches!(over, Err(AppError::ValidationError(_))));

    // A rejected refund gives its amount back to the cap
    let rejected = services.refunds.update_status(first.id, RefundStatus::Rejected).await?;
    assert_eq!(rejected.status, RefundStatus::Rejected);
    let second = services.refunds.create(&user, refund(paid.id, 10000)).await?;

    let processed = services.refunds.update_status(second.id, RefundStatus::Processed).await?;
    assert_eq!(processed.status, RefundStatus::Processed);
    let reopened = services.refunds.update_status(second.id, RefundStatus::Pending).await;
    assert!(matches!(reopened, Err(AppError::Conflict(_))));

    assert_eq!(services.refunds.list(&user, Some(paid.id)).await?.len(), 2);
    Ok(())
}

#[test_context(PaymentServiceContext)]
#[tokio::test]
async fn test_failed_payment_is_not_refundable(ctx: &PaymentServiceContext) -> Result<(), AppError> {
    let Some(services) = &ctx.services else { return Ok(()) };
    let (user, booking_id) = PaymentServiceContext::booking(services).await?;
    let failed = services
        .payments
        .create(&user, payment(booking_id, 10000, Some(PaymentStatus::Failed)))
        .await?;

    let result = services.refunds.create(&user, refund(failed.id, 100)).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    Ok(())
}
