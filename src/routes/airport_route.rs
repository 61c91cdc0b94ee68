use crate::models::airport::{Airport, AirportRequest};
use crate::services::airport_service::AirportService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;
use rocket::response::status::{Created, NoContent};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// List airports ordered by code
#[openapi(tag = "Airports")]
#[get("/airports")]
pub async fn list_airports(airport_service: &State<AirportService>) -> Result<Json<Vec<Airport>>, AppError> {
    Ok(Json(airport_service.list().await?))
}

#[openapi(tag = "Airports")]
#[get("/airports/<id>")]
pub async fn get_airport(id: i32, airport_service: &State<AirportService>) -> Result<Json<Airport>, AppError> {
    Ok(Json(airport_service.get(id).await?))
}

/// Add an airport
#[openapi(tag = "Airports")]
#[post("/airports", format = "json", data = "<request>")]
pub async fn create_airport(
    request: Json<AirportRequest>,
    _admin: AdminUser,
    airport_service: &State<AirportService>,
) -> Result<Created<Json<Airport>>, AppError> {
    let airport = airport_service.create(request.into_inner()).await?;
    Ok(Created::new(format!("/airports/{}", airport.id)).body(Json(airport)))
}

#[openapi(tag = "Airports")]
#[put("/airports/<id>", format = "json", data = "<request>")]
pub async fn update_airport(
    id: i32,
    request: Json<AirportRequest>,
    _admin: AdminUser,
    airport_service: &State<AirportService>,
) -> Result<Json<Airport>, AppError> {
    Ok(Json(airport_service.update(id, request.into_inner()).await?))
}

#[openapi(tag = "Airports")]
#[delete("/airports/<id>")]
pub async fn delete_airport(
    id: i32,
    _admin: AdminUser,
    airport_service: &State<AirportService>,
) -> Result<NoContent, AppError> {
    airport_service.delete(id).await?;
    Ok(NoContent)
}
