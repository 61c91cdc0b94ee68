use crate::models::flight_instance::{
    CreateFlightInstanceRequest, FlightInstance, FlightInstanceQuery, FlightInstanceResponse,
    FlightInstanceStatus, UpdateFlightInstanceRequest,
};
use crate::routes::parse_filter;
use crate::services::flight_instance_service::FlightInstanceService;
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt::AdminUser;
use chrono::{DateTime, NaiveDate, Utc};
use rocket::response::status::{Created, NoContent};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

// Accepts RFC 3339 timestamps or plain dates (midnight UTC)
pub fn parse_timestamp(value: &str, field: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| AppError::BadRequest(format!("Invalid {} format", field)))
}

/// Search scheduled departures
#[openapi(tag = "Flight Instances")]
#[get("/flightinstances?<flight_id>&<from>&<to>&<status>")]
pub async fn list_flight_instances(
    flight_id: Option<String>,
    from: Option<String>,
    to: Option<String>,
    status: Option<String>,
    flight_instance_service: &State<FlightInstanceService>,
) -> Result<Json<Vec<FlightInstance>>, AppError> {
    let query = FlightInstanceQuery {
        flight_id: parse_filter(flight_id.as_deref(), "flight_id")?,
        from: from.as_deref().map(|v| parse_timestamp(v, "from")).transpose()?,
        to: to.as_deref().map(|v| parse_timestamp(v, "to")).transpose()?,
        status: status
            .as_deref()
            .map(|v| {
                v.parse::<FlightInstanceStatus>()
                    .map_err(|_| AppError::BadRequest(format!("Unknown status {}", v)))
            })
            .transpose()?,
    };
    Ok(Json(flight_instance_service.list(query).await?))
}

#[openapi(tag = "Flight Instances")]
#[get("/flightinstances/<id>")]
pub async fn get_flight_instance(
    id: i32,
    flight_instance_service: &State<FlightInstanceService>,
) -> Result<Json<FlightInstance>, AppError> {
    Ok(Json(flight_instance_service.get(id).await?))
}

/// Schedule a departure, generating its seats when `base_price` is set
#[openapi(tag = "Flight Instances")]
#[post("/flightinstances", format = "json", data = "<request>")]
pub async fn create_flight_instance(
    request: Json<CreateFlightInstanceRequest>,
    _admin: AdminUser,
    flight_instance_service: &State<FlightInstanceService>,
) -> Result<Created<Json<FlightInstanceResponse>>, AppError> {
    let response = flight_instance_service.create(request.into_inner()).await?;
    Ok(Created::new(format!("/flightinstances/{}", response.instance.id)).body(Json(response)))
}

#[openapi(tag = "Flight Instances")]
#[put("/flightinstances/<id>", format = "json", data = "<request>")]
pub async fn update_flight_instance(
    id: i32,
    request: Json<UpdateFlightInstanceRequest>,
    _admin: AdminUser,
    flight_instance_service: &State<FlightInstanceService>,
) -> Result<Json<FlightInstance>, AppError> {
    Ok(Json(flight_instance_service.update(id, request.into_inner()).await?))
}

#[openapi(tag = "Flight Instances")]
#[delete("/flightinstances/<id>")]
pub async fn delete_flight_instance(
    id: i32,
    _admin: AdminUser,
    flight_instance_service: &State<FlightInstanceService>,
) -> Result<NoContent, AppError> {
    flight_instance_service.delete(id).await?;
    Ok(NoContent)
}
