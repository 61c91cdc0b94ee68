use crate::models::payment::{Payment, PaymentRequest};
use crate::routes::parse_filter;
use crate::services::payment_service::PaymentService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use rocket::response::status::Created;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Record a payment against a booking
#[openapi(tag = "Payments")]
#[post("/payments", format = "json", data = "<request>")]
pub async fn create_payment(
    request: Json<PaymentRequest>,
    auth: AuthenticatedUser,
    payment_service: &State<PaymentService>,
) -> Result<Created<Json<Payment>>, AppError> {
    let payment = payment_service.create(&auth, request.into_inner()).await?;
    Ok(Created::new(format!("/payments/{}", payment.id)).body(Json(payment)))
}

#[openapi(tag = "Payments")]
#[get("/payments?<booking_id>")]
pub async fn list_payments(
    booking_id: Option<String>,
    auth: AuthenticatedUser,
    payment_service: &State<PaymentService>,
) -> Result<Json<Vec<Payment>>, AppError> {
    let booking_id = parse_filter(booking_id.as_deref(), "booking_id")?;
    Ok(Json(payment_service.list(&auth, booking_id).await?))
}

#[openapi(tag = "Payments")]
#[get("/payments/<id>")]
pub async fn get_payment(
    id: i32,
    auth: AuthenticatedUser,
    payment_service: &State<PaymentService>,
) -> Result<Json<Payment>, AppError> {
    Ok(Json(payment_service.get(&auth, id).await?))
}
