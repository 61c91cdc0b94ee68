use crate::models::refund::{Refund, RefundRequest, RefundStatusRequest};
use crate::routes::parse_filter;
use crate::services::refund_service::RefundService;
use crate::utils::error::AppError;
use crate::utils::jwt::{AdminUser, AuthenticatedUser};
use rocket::response::status::Created;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Request a refund against a payment
#[openapi(tag = "Refunds")]
#[post("/refunds", format = "json", data = "<request>")]
pub async fn create_refund(
    request: Json<RefundRequest>,
    auth: AuthenticatedUser,
    refund_service: &State<RefundService>,
) -> Result<Created<Json<Refund>>, AppError> {
    let refund = refund_service.create(&auth, request.into_inner()).await?;
    Ok(Created::new(format!("/refunds/{}", refund.id)).body(Json(refund)))
}

#[openapi(tag = "Refunds")]
#[get("/refunds?<payment_id>")]
pub async fn list_refunds(
    payment_id: Option<String>,
    auth: AuthenticatedUser,
    refund_service: &State<RefundService>,
) -> Result<Json<Vec<Refund>>, AppError> {
    let payment_id = parse_filter(payment_id.as_deref(), "payment_id")?;
    Ok(Json(refund_service.list(&auth, payment_id).await?))
}

#[openapi(tag = "Refunds")]
#[get("/refunds/<id>")]
pub async fn get_refund(
    id: i32,
    auth: AuthenticatedUser,
    refund_service: &State<RefundService>,
) -> Result<Json<Refund>, AppError> {
    Ok(Json(refund_service.get(&auth, id).await?))
}

/// Mark a pending refund processed or rejected
#[openapi(tag = "Refunds")]
#[put("/refunds/<id>", format = "json", data = "<request>")]
pub async fn update_refund_status(
    id: i32,
    request: Json<RefundStatusRequest>,
    _admin: AdminUser,
    refund_service: &State<RefundService>,
) -> Result<Json<Refund>, AppError> {
    Ok(Json(refund_service.update_status(id, request.status).await?))
}
