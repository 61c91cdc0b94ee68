use crate::models::aircraft::seat_labels;
use crate::models::flight_instance::{
    CreateFlightInstanceRequest, FlightInstance, FlightInstanceQuery, FlightInstanceResponse,
    ShiftReport, UpdateFlightInstanceRequest,
};
use crate::utils::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

#[derive(Clone)]
pub struct FlightInstanceService {
    pool: PgPool,
}

fn ensure_arrival_after_departure(departure: DateTime<Utc>, arrival: DateTime<Utc>) -> AppResult<()> {
    if arrival <= departure {
        return Err(AppError::ValidationError(
            "Arrival time must be after departure time".into(),
        ));
    }
    Ok(())
}

impl FlightInstanceService {
    pub fn new(pool: PgPool) -> Self {
        FlightInstanceService { pool }
    }

    // Search the schedule; every filter is optional
    pub async fn list(&self, query: FlightInstanceQuery) -> AppResult<Vec<FlightInstance>> {
        let instances = sqlx::query_as::<_, FlightInstance>(
            r#"
            SELECT id, flight_id, departure_time, arrival_time, status
            FROM flight_instances
            WHERE ($1::INT IS NULL OR flight_id = $1)
            AND ($2::TIMESTAMPTZ IS NULL OR departure_time >= $2)
            AND ($3::TIMESTAMPTZ IS NULL OR departure_time < $3)
            AND ($4::flight_instance_status IS NULL OR status = $4)
            ORDER BY departure_time
            "#,
        )
        .bind(query.flight_id)
        .bind(query.from)
        .bind(query.to)
        .bind(query.status)
        .fetch_all(&self.pool)
        .await?;

        Ok(instances)
    }

    pub async fn get(&self, id: i32) -> AppResult<FlightInstance> {
        sqlx::query_as::<_, FlightInstance>(
            "SELECT id, flight_id, departure_time, arrival_time, status FROM flight_instances WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight instance not found".into()))
    }

    /// Schedules a departure and, when a base price is given, creates its
    /// seat inventory from the flight's aircraft in the same transaction.
    pub async fn create(&self, request: CreateFlightInstanceRequest) -> AppResult<FlightInstanceResponse> {
        ensure_arrival_after_departure(request.departure_time, request.arrival_time)?;
        if let Some(price) = request.base_price {
            if price < Decimal::ZERO {
                return Err(AppError::ValidationError("Base price cannot be negative".into()));
            }
        }

        let mut tx = self.pool.begin().await?;

        let cabin: Option<(i32, i32)> = sqlx::query_as(
            r#"
            SELECT a.seat_capacity, a.seats_per_row
            FROM flights f
            JOIN aircraft a ON f.aircraft_id = a.id
            WHERE f.id = $1
            "#,
        )
        .bind(request.flight_id)
        .fetch_optional(&mut *tx)
        .await?;
        let (seat_capacity, seats_per_row) =
            cabin.ok_or_else(|| AppError::NotFound("Flight not found".into()))?;

        let instance = sqlx::query_as::<_, FlightInstance>(
            r#"
            INSERT INTO flight_instances (flight_id, departure_time, arrival_time, status)
            VALUES ($1, $2, $3, 'scheduled')
            RETURNING id, flight_id, departure_time, arrival_time, status
            "#,
        )
        .bind(request.flight_id)
        .bind(request.departure_time)
        .bind(request.arrival_time)
        .fetch_one(&mut *tx)
        .await?;

        let mut seats_generated = 0;
        if let Some(price) = request.base_price {
            let labels = seat_labels(seat_capacity, seats_per_row);
            sqlx::query(
                r#"
                INSERT INTO flight_seats (flight_instance_id, seat_number, price)
                SELECT $1, label, $3 FROM UNNEST($2::TEXT[]) AS label
                "#,
            )
            .bind(instance.id)
            .bind(labels.as_slice())
            .bind(price)
            .execute(&mut *tx)
            .await?;
            seats_generated = labels.len();
        }

        tx.commit().await?;

        tracing::info!(
            flight_instance_id = instance.id,
            seats_generated,
            "flight instance scheduled"
        );
        Ok(FlightInstanceResponse {
            instance,
            seats_generated,
        })
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateFlightInstanceRequest,
    ) -> AppResult<FlightInstance> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, FlightInstance>(
            "SELECT id, flight_id, departure_time, arrival_time, status FROM flight_instances WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight instance not found".into()))?;

        let departure_time = request.departure_time.unwrap_or(current.departure_time);
        let arrival_time = request.arrival_time.unwrap_or(current.arrival_time);
        ensure_arrival_after_departure(departure_time, arrival_time)?;

        let updated = sqlx::query_as::<_, FlightInstance>(
            r#"
            UPDATE flight_instances
            SET departure_time = $2, arrival_time = $3, status = $4
            WHERE id = $1
            RETURNING id, flight_id, departure_time, arrival_time, status
            "#,
        )
        .bind(id)
        .bind(departure_time)
        .bind(arrival_time)
        .bind(request.status.unwrap_or(current.status))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    // Seats go with the instance; booked instances are kept
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM flight_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Flight instance not found".into()));
        }
        Ok(())
    }

    /// Moves every instance that departed before `now` forward by three
    /// days. Rows are shifted independently: a failing row is logged and
    /// counted, the rest still move.
    pub async fn shift_expired_flights(&self, now: DateTime<Utc>) -> AppResult<ShiftReport> {
        let expired = sqlx::query_as::<_, FlightInstance>(
            r#"
            SELECT id, flight_id, departure_time, arrival_time, status
            FROM flight_instances
            WHERE departure_time < $1
            ORDER BY id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        let mut report = ShiftReport::default();
        for instance in &expired {
            match self.shift_one(instance).await {
                Ok(true) => report.shifted += 1,
                // Moved by a concurrent run in the meantime
                Ok(false) => {}
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(flight_instance_id = instance.id, error = ?e, "failed to shift flight instance");
                }
            }
        }

        tracing::info!(
            shifted = report.shifted,
            failed = report.failed,
            "expired flight instances shifted"
        );
        Ok(report)
    }

    async fn shift_one(&self, instance: &FlightInstance) -> AppResult<bool> {
        let shifted = instance.shifted();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE flight_instances
            SET departure_time = $2, arrival_time = $3, status = $4
            WHERE id = $1 AND departure_time = $5
            "#,
        )
        .bind(instance.id)
        .bind(shifted.departure_time)
        .bind(shifted.arrival_time)
        .bind(shifted.status)
        .bind(instance.departure_time)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        // Free the seats no active booking holds
        sqlx::query(
            r#"
            UPDATE flight_seats fs
            SET is_available = TRUE
            WHERE fs.flight_instance_id = $1
            AND fs.is_available = FALSE
            AND NOT EXISTS (
                SELECT 1
                FROM booking_seats bs
                JOIN bookings b ON b.id = bs.booking_id
                WHERE bs.flight_seat_id = fs.id
                AND b.status <> 'cancelled'
            )
            "#,
        )
        .bind(instance.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
