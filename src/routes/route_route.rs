use crate::models::route::{Route, RouteRequest};
use crate::services::route_service::RouteService;
use crate::utils::error::AppError;
use crate::utils::jwt::AdminUser;
use rocket::response::status::{Created, NoContent};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

#[openapi(tag = "Routes")]
#[get("/routes")]
pub async fn list_routes(route_service: &State<RouteService>) -> Result<Json<Vec<Route>>, AppError> {
    Ok(Json(route_service.list().await?))
}

#[openapi(tag = "Routes")]
#[get("/routes/<id>")]
pub async fn get_route(id: i32, route_service: &State<RouteService>) -> Result<Json<Route>, AppError> {
    Ok(Json(route_service.get(id).await?))
}

#[openapi(tag = "Routes")]
#[post("/routes", format = "json", data = "<request>")]
pub async fn create_route(
    request: Json<RouteRequest>,
    _admin: AdminUser,
    route_service: &State<RouteService>,
) -> Result<Created<Json<Route>>, AppError> {
    let route = route_service.create(request.into_inner()).await?;
    Ok(Created::new(format!("/routes/{}", route.id)).body(Json(route)))
}

#[openapi(tag = "Routes")]
#[put("/routes/<id>", format = "json", data = "<request>")]
pub async fn update_route(
    id: i32,
    request: Json<RouteRequest>,
    _admin: AdminUser,
    route_service: &State<RouteService>,
) -> Result<Json<Route>, AppError> {
    Ok(Json(route_service.update(id, request.into_inner()).await?))
}

#[openapi(tag = "Routes")]
#[delete("/routes/<id>")]
pub async fn delete_route(
    id: i32,
    _admin: AdminUser,
    route_service: &State<RouteService>,
) -> Result<NoContent, AppError> {
    route_service.delete(id).await?;
    Ok(NoContent)
}
