pub mod aircraft_route;
pub mod airport_route;
pub mod auth_route;
pub mod booking_route;
pub mod catchers;
pub mod customer_route;
pub mod flight_instance_route;
pub mod flight_route;
pub mod flight_seat_route;
pub mod payment_route;
pub mod refund_route;
pub mod route_route;

use crate::utils::error::{AppError, AppResult};
use std::str::FromStr;

#[get("/")]
pub fn index() -> &'static str {
    "Flight Reservation API is running"
}

// Query filters arrive as text so a bad value is reported instead of dropped
pub fn parse_filter<T: FromStr>(value: Option<&str>, field: &str) -> AppResult<Option<T>> {
    value
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| AppError::BadRequest(format!("Invalid {} value", field)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_parse_or_fail_loudly() {
        assert_eq!(parse_filter::<i32>(None, "flight_id").unwrap(), None);
        assert_eq!(parse_filter::<i32>(Some(" 12 "), "flight_id").unwrap(), Some(12));
        assert_eq!(parse_filter::<bool>(Some("false"), "available").unwrap(), Some(false));
        assert!(matches!(
            parse_filter::<bool>(Some("maybe"), "available"),
            Err(AppError::BadRequest(msg)) if msg == "Invalid available value"
        ));
        assert!(parse_filter::<i32>(Some("abc"), "flight_id").is_err());
    }
}
