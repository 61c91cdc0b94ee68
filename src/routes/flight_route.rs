use crate::models::flight::{Flight, FlightDetail, FlightRequest};
use crate::services::flight_service::FlightService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;
use rocket::response::status::{Created, NoContent};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Search flights, optionally by origin and destination airport code
#[openapi(tag = "Flights")]
#[get("/flights?<origin>&<destination>")]
pub async fn list_flights(
    origin: Option<String>,
    destination: Option<String>,
    flight_service: &State<FlightService>,
) -> Result<Json<Vec<FlightDetail>>, AppError> {
    let flights = flight_service
        .list(origin.as_deref(), destination.as_deref())
        .await?;
    Ok(Json(flights))
}

#[openapi(tag = "Flights")]
#[get("/flights/<id>")]
pub async fn get_flight(id: i32, flight_service: &State<FlightService>) -> Result<Json<Flight>, AppError> {
    Ok(Json(flight_service.get(id).await?))
}

/// Define a flight on a route
#[openapi(tag = "Flights")]
#[post("/flights", format = "json", data = "<request>")]
pub async fn create_flight(
    request: Json<FlightRequest>,
    _admin: AdminUser,
    flight_service: &State<FlightService>,
) -> Result<Created<Json<Flight>>, AppError> {
    let flight = flight_service.create(request.into_inner()).await?;
    Ok(Created::new(format!("/flights/{}", flight.id)).body(Json(flight)))
}

#[openapi(tag = "Flights")]
#[put("/flights/<id>", format = "json", data = "<request>")]
pub async fn update_flight(
    id: i32,
    request: Json<FlightRequest>,
    _admin: AdminUser,
    flight_service: &State<FlightService>,
) -> Result<Json<Flight>, AppError> {
    Ok(Json(flight_service.update(id, request.into_inner()).await?))
}

#[openapi(tag = "Flights")]
#[delete("/flights/<id>")]
pub async fn delete_flight(
    id: i32,
    _admin: AdminUser,
    flight_service: &State<FlightService>,
) -> Result<NoContent, AppError> {
    flight_service.delete(id).await?;
    Ok(NoContent)
}
