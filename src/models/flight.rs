use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Flight {
    pub id: i32,
    pub flight_number: String,
    pub route_id: i32,
    pub aircraft_id: i32,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct FlightRequest {
    #[validate(length(min = 2, max = 10, message = "Flight number must be 2 to 10 characters."))]
    pub flight_number: String,
    pub route_id: i32,
    // Falls back to the aircraft assigned to the route
    pub aircraft_id: Option<i32>,
}

// Single Flight Detail joined with its route endpoints
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct FlightDetail {
    pub id: i32,
    pub flight_number: String,
    pub route_id: i32,
    pub aircraft_id: i32,
    pub origin_code: String,
    pub destination_code: String,
}
