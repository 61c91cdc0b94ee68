use crate::models::aircraft::{Aircraft, AircraftRequest};
use crate::services::aircraft_service::AircraftService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;
use rocket::response::status::{Created, NoContent};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

#[openapi(tag = "Aircraft")]
#[get("/aircraft")]
pub async fn list_all_aircraft(aircraft_service: &State<AircraftService>) -> Result<Json<Vec<Aircraft>>, AppError> {
    Ok(Json(aircraft_service.list().await?))
}

#[openapi(tag = "Aircraft")]
#[get("/aircraft/<id>")]
pub async fn get_aircraft(id: i32, aircraft_service: &State<AircraftService>) -> Result<Json<Aircraft>, AppError> {
    Ok(Json(aircraft_service.get(id).await?))
}

/// Register an aircraft type and its seat configuration
#[openapi(tag = "Aircraft")]
#[post("/aircraft", format = "json", data = "<request>")]
pub async fn create_aircraft(
    request: Json<AircraftRequest>,
    _admin: AdminUser,
    aircraft_service: &State<AircraftService>,
) -> Result<Created<Json<Aircraft>>, AppError> {
    let aircraft = aircraft_service.create(request.into_inner()).await?;
    Ok(Created::new(format!("/aircraft/{}", aircraft.id)).body(Json(aircraft)))
}

#[openapi(tag = "Aircraft")]
#[put("/aircraft/<id>", format = "json", data = "<request>")]
pub async fn update_aircraft(
    id: i32,
    request: Json<AircraftRequest>,
    _admin: AdminUser,
    aircraft_service: &State<AircraftService>,
) -> Result<Json<Aircraft>, AppError> {
    Ok(Json(aircraft_service.update(id, request.into_inner()).await?))
}

#[openapi(tag = "Aircraft")]
#[delete("/aircraft/<id>")]
pub async fn delete_aircraft(
    id: i32,
    _admin: AdminUser,
    aircraft_service: &State<AircraftService>,
) -> Result<NoContent, AppError> {
    aircraft_service.delete(id).await?;
    Ok(NoContent)
}
