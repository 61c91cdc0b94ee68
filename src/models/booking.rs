use crate::models::flight_seat::FlightSeat;
use crate::utils::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum_macros::{Display, EnumString};
use validator::Validate;

pub const REFERENCE_LEN: usize = 6;

// Booking status enum
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display, EnumString,
)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    // Active bookings hold their seats
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Booking {
    pub id: i32,
    pub reference: String,
    pub customer_id: i32,
    pub flight_instance_id: i32,
    pub status: BookingStatus,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct BookingRequest {
    pub flight_instance_id: i32,
    #[validate(length(min = 1, max = 9, message = "A booking holds between 1 and 9 seats."))]
    pub seat_ids: Vec<i32>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
    pub seats: Vec<FlightSeat>,
}

pub fn generate_reference() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REFERENCE_LEN)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

pub fn ensure_unique_seat_ids(seat_ids: &[i32]) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(seat_ids.len());
    for id in seat_ids {
        if !seen.insert(*id) {
            return Err(AppError::ValidationError(format!(
                "Seat {} is listed more than once",
                id
            )));
        }
    }
    Ok(())
}

/// Checks that every requested seat was found among the locked rows,
/// belongs to the flight instance being booked, and is still available.
pub fn ensure_seats_bookable(
    flight_instance_id: i32,
    requested: &[i32],
    locked: &[FlightSeat],
) -> AppResult<()> {
    for id in requested {
        let seat = locked
            .iter()
            .find(|seat| seat.id == *id)
            .ok_or_else(|| AppError::NotFound(format!("Seat {} not found", id)))?;

        if seat.flight_instance_id != flight_instance_id {
            return Err(AppError::ValidationError(format!(
                "Seat {} does not belong to flight instance {}",
                seat.seat_number, flight_instance_id
            )));
        }
        if !seat.is_available {
            return Err(AppError::Conflict(format!(
                "Seat {} is no longer available",
                seat.seat_number
            )));
        }
    }
    Ok(())
}
