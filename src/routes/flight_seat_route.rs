use crate::models::flight_seat::{CreateFlightSeatRequest, FlightSeat, UpdateFlightSeatRequest};
use crate::routes::parse_filter;
use crate::services::flight_seat_service::FlightSeatService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;
use rocket::response::status::{Created, NoContent};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Seat inventory, optionally for one flight instance and by availability
#[openapi(tag = "Flight Seats")]
#[get("/flightseats?<flight_instance_id>&<available>")]
pub async fn list_flight_seats(
    flight_instance_id: Option<String>,
    available: Option<String>,
    flight_seat_service: &State<FlightSeatService>,
) -> Result<Json<Vec<FlightSeat>>, AppError> {
    let flight_instance_id = parse_filter(flight_instance_id.as_deref(), "flight_instance_id")?;
    let available = parse_filter(available.as_deref(), "available")?;
    Ok(Json(flight_seat_service.list(flight_instance_id, available).await?))
}

#[openapi(tag = "Flight Seats")]
#[get("/flightseats/<id>")]
pub async fn get_flight_seat(
    id: i32,
    flight_seat_service: &State<FlightSeatService>,
) -> Result<Json<FlightSeat>, AppError> {
    Ok(Json(flight_seat_service.get(id).await?))
}

#[openapi(tag = "Flight Seats")]
#[post("/flightseats", format = "json", data = "<request>")]
pub async fn create_flight_seat(
    request: Json<CreateFlightSeatRequest>,
    _admin: AdminUser,
    flight_seat_service: &State<FlightSeatService>,
) -> Result<Created<Json<FlightSeat>>, AppError> {
    let seat = flight_seat_service.create(request.into_inner()).await?;
    Ok(Created::new(format!("/flightseats/{}", seat.id)).body(Json(seat)))
}

/// Change a seat's price or take it off sale
#[openapi(tag = "Flight Seats")]
#[put("/flightseats/<id>", format = "json", data = "<request>")]
pub async fn update_flight_seat(
    id: i32,
    request: Json<UpdateFlightSeatRequest>,
    _admin: AdminUser,
    flight_seat_service: &State<FlightSeatService>,
) -> Result<Json<FlightSeat>, AppError> {
    Ok(Json(flight_seat_service.update(id, request.into_inner()).await?))
}

#[openapi(tag = "Flight Seats")]
#[delete("/flightseats/<id>")]
pub async fn delete_flight_seat(
    id: i32,
    _admin: AdminUser,
    flight_seat_service: &State<FlightSeatService>,
) -> Result<NoContent, AppError> {
    flight_seat_service.delete(id).await?;
    Ok(NoContent)
}
