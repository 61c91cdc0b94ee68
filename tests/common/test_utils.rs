#![allow(dead_code)]

use chrono::{DateTime, Utc};
use dotenv::dotenv;
use flight_reservation::services::{
    booking_service::BookingService, customer_service::CustomerService,
    flight_instance_service::FlightInstanceService, flight_seat_service::FlightSeatService,
    payment_service::PaymentService, refund_service::RefundService,
};
use once_cell::sync::OnceCell;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool as Pool, PgPoolOptions};
use sqlx::{Error, Executor};
use std::env;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::OnceCell as AsyncOnceCell;

static DB_NAME: OnceCell<String> = OnceCell::new();
static DB_READY: AsyncOnceCell<String> = AsyncOnceCell::const_new();

pub struct TestDb;

// Admin connection string for the server hosting the throwaway databases
fn admin_url() -> Option<String> {
    dotenv().ok();
    env::var("TEST_DATABASE_URL").ok().filter(|url| !url.is_empty())
}

// Replace the database segment of a connection string
fn url_for(admin_url: &str, db_name: &str) -> String {
    let (base, query) = match admin_url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (admin_url, None),
    };
    let server = base.rsplit_once('/').map(|(server, _)| server).unwrap_or(base);
    match query {
        Some(query) => format!("{}/{}?{}", server, db_name, query),
        None => format!("{}/{}", server, db_name),
    }
}

impl TestDb {
    /// Pool on this test binary's database, or `None` when no test server
    /// is configured. The database is created and migrated once per run;
    /// every caller gets its own pool bound to its own runtime.
    pub async fn get_pool(test_file: &str) -> Result<Option<Pool>, Error> {
        let Some(admin_url) = admin_url() else {
            println!("TEST_DATABASE_URL is not set, skipping database test");
            return Ok(None);
        };

        let db_name = DB_READY
            .get_or_try_init(|| Self::setup_database(&admin_url, test_file))
            .await?
            .clone();

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&url_for(&admin_url, &db_name))
            .await?;
        Ok(Some(pool))
    }

    async fn setup_database(admin_url: &str, test_file: &str) -> Result<String, Error> {
        // Create a unique database name by timestamp for each test binary
        let stem = Path::new(test_file)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("test");
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let db_name = DB_NAME
            .get_or_init(|| format!("flights_{}_{}", stem, timestamp))
            .clone();

        println!("Setting up database: {}", db_name);
        let admin_pool = PgPoolOptions::new().max_connections(1).connect(admin_url).await?;
        admin_pool
            .execute(format!("CREATE DATABASE {}", db_name).as_str())
            .await?;
        admin_pool.close().await;

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&url_for(admin_url, &db_name))
            .await?;
        sqlx::migrate!().run(&pool).await?;
        pool.close().await;

        Ok(db_name)
    }

    // Teardown function to drop the database after the test run (not after each test)
    pub fn cleanup_database_sync() -> Result<(), Error> {
        let (Some(admin_url), Some(db_name)) = (admin_url(), DB_NAME.get()) else {
            return Ok(());
        };
        let runtime = tokio::runtime::Runtime::new().map_err(Error::Io)?;
        runtime.block_on(async {
            println!("Dropping database: {}", db_name);
            let admin_pool = PgPoolOptions::new().max_connections(1).connect(&admin_url).await?;
            admin_pool
                .execute(format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", db_name).as_str())
                .await?;
            admin_pool.close().await;
            Ok(())
        })
    }
}

/// Services wired to one test pool.
pub struct TestServices {
    pub pool: Pool,
    pub customers: CustomerService,
    pub flight_instances: FlightInstanceService,
    pub flight_seats: FlightSeatService,
    pub bookings: BookingService,
    pub payments: PaymentService,
    pub refunds: RefundService,
}

impl TestServices {
    pub fn new(pool: Pool) -> Self {
        TestServices {
            customers: CustomerService::new(pool.clone()),
            flight_instances: FlightInstanceService::new(pool.clone()),
            flight_seats: FlightSeatService::new(pool.clone()),
            bookings: BookingService::new(pool.clone()),
            payments: PaymentService::new(pool.clone()),
            refunds: RefundService::new(pool.clone()),
            pool,
        }
    }

    pub async fn connect(test_file: &str) -> Option<Self> {
        TestDb::get_pool(test_file)
            .await
            .expect("Failed to get test database instance")
            .map(TestServices::new)
    }
}

/// Short random suffix keeping fixture keys unique across parallel tests.
pub fn unique(prefix: &str) -> String {
    format!("{}{}", prefix, uuid::Uuid::new_v4().simple().to_string()[..10].to_uppercase())
}

/// Inserts a customer directly, skipping password hashing.
pub async fn seed_customer(pool: &Pool) -> Result<i32, Error> {
    seed_with_role(pool, "customer").await
}

pub async fn seed_admin(pool: &Pool) -> Result<i32, Error> {
    seed_with_role(pool, "admin").await
}

async fn seed_with_role(pool: &Pool, role: &str) -> Result<i32, Error> {
    let name = unique("c");
    sqlx::query_scalar(
        r#"
        INSERT INTO customers (username, email, password_hash, phone, role)
        VALUES ($1, $2, 'not-a-hash', '0123456789', $3::customer_role)
        RETURNING id
        "#,
    )
    .bind(&name)
    .bind(format!("{}@example.com", name.to_lowercase()))
    .bind(role)
    .fetch_one(pool)
    .await
}

/// Airport pair, aircraft, route and flight; returns the flight id.
pub async fn seed_flight(pool: &Pool, seat_capacity: i32) -> Result<i32, Error> {
    let origin: i32 = sqlx::query_scalar(
        "INSERT INTO airports (code, name, city, country) VALUES ($1, 'Origin', 'Toronto', 'Canada') RETURNING id",
    )
    .bind(unique("O"))
    .fetch_one(pool)
    .await?;
    let destination: i32 = sqlx::query_scalar(
        "INSERT INTO airports (code, name, city, country) VALUES ($1, 'Destination', 'London', 'UK') RETURNING id",
    )
    .bind(unique("D"))
    .fetch_one(pool)
    .await?;
    let aircraft: i32 = sqlx::query_scalar(
        "INSERT INTO aircraft (model, seat_capacity, seats_per_row) VALUES ('A320', $1, 6) RETURNING id",
    )
    .bind(seat_capacity)
    .fetch_one(pool)
    .await?;
    let route: i32 = sqlx::query_scalar(
        "INSERT INTO routes (origin_airport_id, destination_airport_id, aircraft_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(origin)
    .bind(destination)
    .bind(aircraft)
    .fetch_one(pool)
    .await?;
    sqlx::query_scalar("INSERT INTO flights (flight_number, route_id, aircraft_id) VALUES ($1, $2, $3) RETURNING id")
        .bind(unique("FL"))
        .bind(route)
        .bind(aircraft)
        .fetch_one(pool)
        .await
}

/// Flight instance departing at `departure` with `seats` seats at `price`.
/// Returns the instance id and its seat ids in label order.
pub async fn seed_instance(
    pool: &Pool,
    departure: DateTime<Utc>,
    seats: i32,
    price: Decimal,
) -> Result<(i32, Vec<i32>), Error> {
    let flight_id = seed_flight(pool, seats.max(1)).await?;
    let instance_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO flight_instances (flight_id, departure_time, arrival_time)
        VALUES ($1, $2, $2 + INTERVAL '5 hours')
        RETURNING id
        "#,
    )
    .bind(flight_id)
    .bind(departure)
    .fetch_one(pool)
    .await?;

    let mut seat_ids = Vec::new();
    for n in 0..seats {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO flight_seats (flight_instance_id, seat_number, price) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(instance_id)
        .bind(format!("{}A", n + 1))
        .bind(price)
        .fetch_one(pool)
        .await?;
        seat_ids.push(id);
    }
    Ok((instance_id, seat_ids))
}
