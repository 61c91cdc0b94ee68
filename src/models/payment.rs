use crate::utils::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display, EnumString,
)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentStatus {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Payment {
    pub id: i32,
    pub booking_id: i32,
    pub amount: Decimal,
    pub method: String,
    pub status: PaymentStatus,
    pub transaction_ref: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct PaymentRequest {
    pub booking_id: i32,
    pub amount: Decimal,
    #[validate(length(min = 1, max = 32, message = "Payment method is required."))]
    pub method: String,
    // Recorded as succeeded when omitted
    pub status: Option<PaymentStatus>,
}

pub fn ensure_positive_amount(amount: Decimal) -> AppResult<()> {
    if amount <= Decimal::ZERO {
        return Err(AppError::ValidationError("Amount must be positive".into()));
    }
    if amount.scale() > 2 {
        return Err(AppError::ValidationError(
            "Amount cannot have more than two decimal places".into(),
        ));
    }
    Ok(())
}

/// A succeeded payment may not push the amount paid past the booking total.
/// Returns the new paid total.
pub fn ensure_within_balance(total: Decimal, paid: Decimal, amount: Decimal) -> AppResult<Decimal> {
    let new_paid = paid + amount;
    if new_paid > total {
        return Err(AppError::ValidationError(format!(
            "Payment exceeds the outstanding balance of {}",
            total - paid
        )));
    }
    Ok(new_paid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(value: i64) -> Decimal {
        Decimal::new(value, 2)
    }

    #[test]
    fn amounts_must_be_positive_cents() {
        assert!(ensure_positive_amount(cents(1)).is_ok());
        assert!(ensure_positive_amount(Decimal::ZERO).is_err());
        assert!(ensure_positive_amount(cents(-500)).is_err());
        assert!(ensure_positive_amount(Decimal::new(1001, 3)).is_err());
    }

    #[test]
    fn paying_the_exact_balance_is_allowed() {
        let paid = ensure_within_balance(cents(30000), cents(10000), cents(20000)).unwrap();
        assert_eq!(paid, cents(30000));
    }

    #[test]
    fn overpayment_is_rejected() {
        let err = ensure_within_balance(cents(30000), cents(10000), cents(20001)).unwrap_err();
        assert!(err.to_string().contains("200.00"));
    }
}
