#[macro_use]
extern crate rocket;

pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod scheduler;
pub mod services;
pub mod swagger;
pub mod utils;

use crate::config::AuthConfig;
use crate::swagger::swagger_ui;
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::make_swagger_ui;
use services::{
    aircraft_service::AircraftService, airport_service::AirportService,
    booking_service::BookingService, customer_service::CustomerService,
    flight_instance_service::FlightInstanceService, flight_seat_service::FlightSeatService,
    flight_service::FlightService, payment_service::PaymentService,
    refund_service::RefundService, route_service::RouteService,
};
use sqlx::PgPool;

// Assemble the HTTP server around an already-connected pool
pub fn build_rocket(auth: AuthConfig, pool: PgPool) -> Rocket<Build> {
    rocket::build()
        .manage(auth)
        .manage(CustomerService::new(pool.clone()))
        .manage(AirportService::new(pool.clone()))
        .manage(AircraftService::new(pool.clone()))
        .manage(RouteService::new(pool.clone()))
        .manage(FlightService::new(pool.clone()))
        .manage(FlightInstanceService::new(pool.clone()))
        .manage(FlightSeatService::new(pool.clone()))
        .manage(BookingService::new(pool.clone()))
        .manage(PaymentService::new(pool.clone()))
        .manage(RefundService::new(pool))
        .mount("/", routes![routes::index])
        .mount(
            "/",
            openapi_get_routes![
                routes::auth_route::register,
                routes::auth_route::login,
                routes::auth_route::logout,
                routes::customer_route::get_profile,
                routes::customer_route::update_profile,
                routes::customer_route::list_customers,
                routes::customer_route::get_customer,
                routes::customer_route::set_customer_role,
                routes::customer_route::delete_customer,
                routes::airport_route::list_airports,
                routes::airport_route::get_airport,
                routes::airport_route::create_airport,
                routes::airport_route::update_airport,
                routes::airport_route::delete_airport,
                routes::aircraft_route::list_all_aircraft,
                routes::aircraft_route::get_aircraft,
                routes::aircraft_route::create_aircraft,
                routes::aircraft_route::update_aircraft,
                routes::aircraft_route::delete_aircraft,
                routes::route_route::list_routes,
                routes::route_route::get_route,
                routes::route_route::create_route,
                routes::route_route::update_route,
                routes::route_route::delete_route,
                routes::flight_route::list_flights,
                routes::flight_route::get_flight,
                routes::flight_route::create_flight,
                routes::flight_route::update_flight,
                routes::flight_route::delete_flight,
                routes::flight_instance_route::list_flight_instances,
                routes::flight_instance_route::get_flight_instance,
                routes::flight_instance_route::create_flight_instance,
                routes::flight_instance_route::update_flight_instance,
                routes::flight_instance_route::delete_flight_instance,
                routes::flight_seat_route::list_flight_seats,
                routes::flight_seat_route::get_flight_seat,
                routes::flight_seat_route::create_flight_seat,
                routes::flight_seat_route::update_flight_seat,
                routes::flight_seat_route::delete_flight_seat,
                routes::booking_route::create_booking,
                routes::booking_route::list_bookings,
                routes::booking_route::get_booking,
                routes::booking_route::cancel_booking,
                routes::payment_route::create_payment,
                routes::payment_route::list_payments,
                routes::payment_route::get_payment,
                routes::refund_route::create_refund,
                routes::refund_route::list_refunds,
                routes::refund_route::get_refund,
                routes::refund_route::update_refund_status,
            ],
        )
        .mount("/swagger", make_swagger_ui(&swagger_ui()))
        .register("/", routes::catchers::catchers())
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
            })
        }))
}
