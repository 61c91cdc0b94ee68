use crate::models::booking::{Booking, BookingRequest, BookingResponse};
use crate::services::booking_service::BookingService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;
use rocket::response::status::Created;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Book seats on a flight instance
#[openapi(tag = "Bookings")]
#[post("/bookings", format = "json", data = "<request>")]
pub async fn create_booking(
    request: Json<BookingRequest>,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Created<Json<BookingResponse>>, AppError> {
    let response = booking_service
        .create(auth.customer_id, request.into_inner())
        .await?;
    Ok(Created::new(format!("/bookings/{}", response.booking.id)).body(Json(response)))
}

/// Booking history of the logged-in customer
#[openapi(tag = "Bookings")]
#[get("/bookings")]
pub async fn list_bookings(
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(booking_service.list(&auth).await?))
}

#[openapi(tag = "Bookings")]
#[get("/bookings/<id>")]
pub async fn get_booking(
    id: i32,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingResponse>, AppError> {
    Ok(Json(booking_service.get(&auth, id).await?))
}

/// Cancel a booking and release its seats
#[openapi(tag = "Bookings")]
#[put("/bookings/<id>/cancel")]
pub async fn cancel_booking(
    id: i32,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingResponse>, AppError> {
    Ok(Json(booking_service.cancel(&auth, id).await?))
}
