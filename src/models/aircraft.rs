use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Aircraft {
    pub id: i32,
    pub model: String,
    pub manufacturer: Option<String>,
    pub seat_capacity: i32,
    pub seats_per_row: i32,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct AircraftRequest {
    #[validate(length(min = 1, message = "Aircraft model is required."))]
    pub model: String,
    pub manufacturer: Option<String>,
    #[validate(range(min = 1, max = 1000, message = "Seat capacity must be between 1 and 1000."))]
    pub seat_capacity: i32,
    #[validate(range(min = 1, max = 10, message = "Seats per row must be between 1 and 10."))]
    pub seats_per_row: Option<i32>,
}

/// Seat labels for a cabin: row number then a letter per seat in the row
/// (`1A`, `1B`, ... `2A`). The last row may be partial.
pub fn seat_labels(seat_capacity: i32, seats_per_row: i32) -> Vec<String> {
    let per_row = seats_per_row.clamp(1, 26);
    (0..seat_capacity.max(0))
        .map(|index| {
            let row = index / per_row + 1;
            let letter = (b'A' + (index % per_row) as u8) as char;
            format!("{}{}", row, letter)
        })
        .collect()
}
