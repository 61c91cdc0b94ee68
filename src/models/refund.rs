use crate::utils::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display, EnumString,
)]
#[sqlx(type_name = "refund_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RefundStatus {
    Pending,
    Processed,
    Rejected,
}

impl RefundStatus {
    // Only a pending refund can be settled, and only once
    pub fn can_transition_to(&self, next: RefundStatus) -> bool {
        matches!(
            (self, next),
            (RefundStatus::Pending, RefundStatus::Processed)
                | (RefundStatus::Pending, RefundStatus::Rejected)
        )
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Refund {
    pub id: i32,
    pub payment_id: i32,
    pub booking_id: i32,
    pub amount: Decimal,
    pub reason: Option<String>,
    pub status: RefundStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct RefundRequest {
    pub payment_id: i32,
    pub amount: Decimal,
    #[validate(length(max = 500, message = "Reason must be at most 500 characters."))]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RefundStatusRequest {
    pub status: RefundStatus,
}

/// Refunds against one payment, counted cumulatively, never exceed it.
pub fn ensure_refund_within(
    payment_amount: Decimal,
    already_refunded: Decimal,
    requested: Decimal,
) -> AppResult<()> {
    let remaining = payment_amount - already_refunded;
    if requested > remaining {
        return Err(AppError::ValidationError(format!(
            "Refund exceeds the remaining refundable amount of {}",
            remaining.max(Decimal::ZERO)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(value: i64) -> Decimal {
        Decimal::new(value, 2)
    }

    #[test]
    fn refunds_up_to_the_payment_are_allowed() {
        assert!(ensure_refund_within(cents(10000), cents(0), cents(10000)).is_ok());
        assert!(ensure_refund_within(cents(10000), cents(4000), cents(6000)).is_ok());
    }

    #[test]
    fn cumulative_refunds_cannot_exceed_the_payment() {
        let err = ensure_refund_within(cents(10000), cents(4000), cents(6001)).unwrap_err();
        assert!(err.to_string().contains("60.00"));
    }

    #[test]
    fn fully_refunded_payment_reports_nothing_left() {
        let err = ensure_refund_within(cents(10000), cents(10000), cents(1)).unwrap_err();
        assert!(err.to_string().contains("amount of 0"));
    }

    #[test]
    fn refund_settles_once() {
        assert!(RefundStatus::Pending.can_transition_to(RefundStatus::Processed));
        assert!(RefundStatus::Pending.can_transition_to(RefundStatus::Rejected));
        assert!(!RefundStatus::Processed.can_transition_to(RefundStatus::Rejected));
        assert!(!RefundStatus::Rejected.can_transition_to(RefundStatus::Pending));
        assert!(!RefundStatus::Pending.can_transition_to(RefundStatus::Pending));
    }
}
