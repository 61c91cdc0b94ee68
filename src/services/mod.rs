pub mod aircraft_service;
pub mod airport_service;
pub mod booking_service;
pub mod customer_service;
pub mod flight_instance_service;
pub mod flight_seat_service;
pub mod flight_service;
pub mod payment_service;
pub mod refund_service;
pub mod route_service;
