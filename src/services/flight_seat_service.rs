use crate::models::flight_seat::{CreateFlightSeatRequest, FlightSeat, UpdateFlightSeatRequest};
use crate::utils::error::{AppError, AppResult};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use validator::Validate;

#[derive(Clone)]
pub struct FlightSeatService {
    pool: PgPool,
}

fn ensure_valid_price(price: Decimal) -> AppResult<()> {
    if price < Decimal::ZERO {
        return Err(AppError::ValidationError("Seat price cannot be negative".into()));
    }
    Ok(())
}

// Whether an active booking currently holds the seat
async fn is_held(tx: &mut Transaction<'_, Postgres>, seat_id: i32) -> AppResult<bool> {
    let held: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM booking_seats bs
            JOIN bookings b ON b.id = bs.booking_id
            WHERE bs.flight_seat_id = $1 AND b.status <> 'cancelled'
        )
        "#,
    )
    .bind(seat_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(held)
}

impl FlightSeatService {
    pub fn new(pool: PgPool) -> Self {
        FlightSeatService { pool }
    }

    pub async fn list(
        &self,
        flight_instance_id: Option<i32>,
        available: Option<bool>,
    ) -> AppResult<Vec<FlightSeat>> {
        let seats = sqlx::query_as::<_, FlightSeat>(
            r#"
            SELECT id, flight_instance_id, seat_number, is_available, price
            FROM flight_seats
            WHERE ($1::INT IS NULL OR flight_instance_id = $1)
            AND ($2::BOOLEAN IS NULL OR is_available = $2)
            ORDER BY flight_instance_id, id
            "#,
        )
        .bind(flight_instance_id)
        .bind(available)
        .fetch_all(&self.pool)
        .await?;
        Ok(seats)
    }

    pub async fn get(&self, id: i32) -> AppResult<FlightSeat> {
        sqlx::query_as::<_, FlightSeat>(
            "SELECT id, flight_instance_id, seat_number, is_available, price FROM flight_seats WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Seat not found".into()))
    }

    pub async fn create(&self, request: CreateFlightSeatRequest) -> AppResult<FlightSeat> {
        request.validate()?;
        ensure_valid_price(request.price)?;

        let instance: Option<i32> = sqlx::query_scalar("SELECT id FROM flight_instances WHERE id = $1")
            .bind(request.flight_instance_id)
            .fetch_optional(&self.pool)
            .await?;
        if instance.is_none() {
            return Err(AppError::NotFound("Flight instance not found".into()));
        }

        let seat = sqlx::query_as::<_, FlightSeat>(
            r#"
            INSERT INTO flight_seats (flight_instance_id, seat_number, price)
            VALUES ($1, $2, $3)
            RETURNING id, flight_instance_id, seat_number, is_available, price
            "#,
        )
        .bind(request.flight_instance_id)
        .bind(request.seat_number.trim().to_uppercase())
        .bind(request.price)
        .fetch_one(&self.pool)
        .await?;
        Ok(seat)
    }

    pub async fn update(&self, id: i32, request: UpdateFlightSeatRequest) -> AppResult<FlightSeat> {
        if let Some(price) = request.price {
            ensure_valid_price(price)?;
        }

        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, FlightSeat>(
            "SELECT id, flight_instance_id, seat_number, is_available, price FROM flight_seats WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Seat not found".into()))?;

        if request.is_available == Some(true) && !current.is_available && is_held(&mut tx, id).await? {
            return Err(AppError::Conflict(format!(
                "Seat {} is held by an active booking",
                current.seat_number
            )));
        }

        let seat = sqlx::query_as::<_, FlightSeat>(
            r#"
            UPDATE flight_seats SET price = $2, is_available = $3
            WHERE id = $1
            RETURNING id, flight_instance_id, seat_number, is_available, price
            "#,
        )
        .bind(id)
        .bind(request.price.unwrap_or(current.price))
        .bind(request.is_available.unwrap_or(current.is_available))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(seat)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        if is_held(&mut tx, id).await? {
            return Err(AppError::Conflict("Seat is held by an active booking".into()));
        }

        let result = sqlx::query("DELETE FROM flight_seats WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Seat not found".into()));
        }

        tx.commit().await?;
        Ok(())
    }
}
