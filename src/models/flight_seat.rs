use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct FlightSeat {
    pub id: i32,
    pub flight_instance_id: i32,
    pub seat_number: String,
    pub is_available: bool,
    pub price: Decimal,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct CreateFlightSeatRequest {
    pub flight_instance_id: i32,
    #[validate(length(min = 2, max = 4, message = "Seat number must be 2 to 4 characters."))]
    pub seat_number: String,
    pub price: Decimal,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateFlightSeatRequest {
    pub price: Option<Decimal>,
    pub is_available: Option<bool>,
}
