use crate::models::customer::{CustomerResponse, Role, UpdateProfileRequest};
use crate::services::customer_service::CustomerService;
use crate::utils::error::AppError;
use crate::utils::jwt::{AdminUser, AuthenticatedUser};
use rocket::response::status::NoContent;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RoleRequest {
    pub role: Role,
}

/// Profile of the logged-in customer
#[openapi(tag = "Customers")]
#[get("/customers/me")]
pub async fn get_profile(
    auth: AuthenticatedUser,
    customer_service: &State<CustomerService>,
) -> Result<Json<CustomerResponse>, AppError> {
    Ok(Json(customer_service.get(auth.customer_id).await?))
}

/// Update the logged-in customer's profile
#[openapi(tag = "Customers")]
#[put("/customers/me", format = "json", data = "<request>")]
pub async fn update_profile(
    request: Json<UpdateProfileRequest>,
    auth: AuthenticatedUser,
    customer_service: &State<CustomerService>,
) -> Result<Json<CustomerResponse>, AppError> {
    let customer = customer_service
        .update_profile(auth.customer_id, request.into_inner())
        .await?;
    Ok(Json(customer))
}

/// List all customers
#[openapi(tag = "Customers")]
#[get("/customers")]
pub async fn list_customers(
    _admin: AdminUser,
    customer_service: &State<CustomerService>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    Ok(Json(customer_service.list().await?))
}

#[openapi(tag = "Customers")]
#[get("/customers/<id>")]
pub async fn get_customer(
    id: i32,
    _admin: AdminUser,
    customer_service: &State<CustomerService>,
) -> Result<Json<CustomerResponse>, AppError> {
    Ok(Json(customer_service.get(id).await?))
}

/// Grant or revoke administrator access
#[openapi(tag = "Customers")]
#[put("/customers/<id>/role", format = "json", data = "<request>")]
pub async fn set_customer_role(
    id: i32,
    request: Json<RoleRequest>,
    admin: AdminUser,
    customer_service: &State<CustomerService>,
) -> Result<Json<CustomerResponse>, AppError> {
    if id == admin.customer_id && request.role != Role::Admin {
        return Err(AppError::Conflict("Administrators cannot revoke their own access".into()));
    }
    Ok(Json(customer_service.set_role(id, request.role).await?))
}

#[openapi(tag = "Customers")]
#[delete("/customers/<id>")]
pub async fn delete_customer(
    id: i32,
    _admin: AdminUser,
    customer_service: &State<CustomerService>,
) -> Result<NoContent, AppError> {
    customer_service.delete(id).await?;
    Ok(NoContent)
}
