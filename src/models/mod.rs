pub mod aircraft;
pub mod airport;
pub mod booking;
pub mod customer;
pub mod flight;
pub mod flight_instance;
pub mod flight_seat;
pub mod payment;
pub mod refund;
pub mod route;
