use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// How far the maintenance job moves a departed instance.
pub const SHIFT_DAYS: i64 = 3;

// Flight instance status enum
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display, EnumString,
)]
#[sqlx(type_name = "flight_instance_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FlightInstanceStatus {
    Scheduled,
    Expired,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct FlightInstance {
    pub id: i32,
    pub flight_id: i32,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub status: FlightInstanceStatus,
}

impl FlightInstance {
    pub fn is_bookable(&self, now: DateTime<Utc>) -> bool {
        self.status == FlightInstanceStatus::Scheduled && self.departure_time > now
    }

    /// The instance as it looks after one shift: both timestamps move
    /// forward, an expired instance is scheduled again.
    pub fn shifted(&self) -> FlightInstance {
        let offset = Duration::days(SHIFT_DAYS);
        FlightInstance {
            id: self.id,
            flight_id: self.flight_id,
            departure_time: self.departure_time + offset,
            arrival_time: self.arrival_time + offset,
            status: match self.status {
                FlightInstanceStatus::Expired => FlightInstanceStatus::Scheduled,
                other => other,
            },
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateFlightInstanceRequest {
    pub flight_id: i32,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    /// When set, one seat per aircraft seat is generated at this price.
    pub base_price: Option<Decimal>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateFlightInstanceRequest {
    pub departure_time: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
    pub status: Option<FlightInstanceStatus>,
}

#[derive(Debug, Default)]
pub struct FlightInstanceQuery {
    pub flight_id: Option<i32>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub status: Option<FlightInstanceStatus>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct FlightInstanceResponse {
    #[serde(flatten)]
    pub instance: FlightInstance,
    pub seats_generated: usize,
}

/// Outcome of one run of the expired-flight shifter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShiftReport {
    pub shifted: u64,
    pub failed: u64,
}
