use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Route {
    pub id: i32,
    pub origin_airport_id: i32,
    pub destination_airport_id: i32,
    pub aircraft_id: i32,
    pub distance_km: Option<i32>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
#[validate(schema(function = "validate_distinct_airports"))]
pub struct RouteRequest {
    pub origin_airport_id: i32,
    pub destination_airport_id: i32,
    pub aircraft_id: i32,
    #[validate(range(min = 1, message = "Distance must be positive."))]
    pub distance_km: Option<i32>,
}

fn validate_distinct_airports(request: &RouteRequest) -> Result<(), ValidationError> {
    if request.origin_airport_id == request.destination_airport_id {
        return Err(ValidationError::new("route")
            .with_message("Origin and destination airports must differ.".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_cannot_loop_back_to_origin() {
        let request = RouteRequest {
            origin_airport_id: 1,
            destination_airport_id: 1,
            aircraft_id: 1,
            distance_km: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn distinct_airports_are_valid() {
        let request = RouteRequest {
            origin_airport_id: 1,
            destination_airport_id: 2,
            aircraft_id: 1,
            distance_km: Some(550),
        };
        assert!(request.validate().is_ok());
    }
}
