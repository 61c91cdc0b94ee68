use crate::models::booking::{
    ensure_seats_bookable, ensure_unique_seat_ids, generate_reference, Booking, BookingRequest,
    BookingResponse, BookingStatus,
};
use crate::models::flight_instance::FlightInstance;
use crate::models::flight_seat::FlightSeat;
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt::AuthenticatedUser;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use validator::Validate;

#[derive(Clone)]
pub struct BookingService {
    pool: PgPool,
}

async fn seats_of(conn: &mut sqlx::PgConnection, booking_id: i32) -> AppResult<Vec<FlightSeat>> {
    let seats = sqlx::query_as::<_, FlightSeat>(
        r#"
        SELECT fs.id, fs.flight_instance_id, fs.seat_number, fs.is_available, fs.price
        FROM booking_seats bs
        JOIN flight_seats fs ON fs.id = bs.flight_seat_id
        WHERE bs.booking_id = $1
        ORDER BY fs.id
        "#,
    )
    .bind(booking_id)
    .fetch_all(conn)
    .await?;
    Ok(seats)
}

/// Loads a booking under a row lock, hiding bookings the caller does not own.
pub(crate) async fn lock_booking(
    tx: &mut Transaction<'_, Postgres>,
    user: &AuthenticatedUser,
    booking_id: i32,
) -> AppResult<Booking> {
    let booking = sqlx::query_as::<_, Booking>(
        r#"
        SELECT id, reference, customer_id, flight_instance_id, status, total_amount, created_at
        FROM bookings WHERE id = $1 FOR UPDATE
        "#,
    )
    .bind(booking_id)
    .fetch_optional(&mut **tx)
    .await?
    .filter(|booking| user.can_access(booking.customer_id))
    .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;
    Ok(booking)
}

impl BookingService {
    pub fn new(pool: PgPool) -> Self {
        BookingService { pool }
    }

    /// Reserves the requested seats for the customer. The instance row is
    /// share-locked and the seat rows are locked for update, so two
    /// concurrent bookings of one seat cannot both succeed.
    pub async fn create(&self, customer_id: i32, request: BookingRequest) -> AppResult<BookingResponse> {
        request.validate()?;
        ensure_unique_seat_ids(&request.seat_ids)?;

        let mut tx = self.pool.begin().await?;

        let instance = sqlx::query_as::<_, FlightInstance>(
            r#"
            SELECT id, flight_id, departure_time, arrival_time, status
            FROM flight_instances WHERE id = $1 FOR SHARE
            "#,
        )
        .bind(request.flight_instance_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight instance not found".into()))?;

        if !instance.is_bookable(Utc::now()) {
            return Err(AppError::Conflict(format!(
                "Flight instance {} is not open for booking",
                instance.id
            )));
        }

        let locked = sqlx::query_as::<_, FlightSeat>(
            r#"
            SELECT id, flight_instance_id, seat_number, is_available, price
            FROM flight_seats
            WHERE id = ANY($1)
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(request.seat_ids.as_slice())
        .fetch_all(&mut *tx)
        .await?;

        ensure_seats_bookable(instance.id, &request.seat_ids, &locked)?;
        let total_amount: Decimal = locked.iter().map(|seat| seat.price).sum();
        // Nothing left to pay on free seats
        let status = if total_amount.is_zero() {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Pending
        };

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (reference, customer_id, flight_instance_id, status, total_amount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, reference, customer_id, flight_instance_id, status, total_amount, created_at
            "#,
        )
        .bind(generate_reference())
        .bind(customer_id)
        .bind(instance.id)
        .bind(status)
        .bind(total_amount)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO booking_seats (booking_id, flight_seat_id)
            SELECT $1, seat_id FROM UNNEST($2::INT[]) AS seat_id
            "#,
        )
        .bind(booking.id)
        .bind(request.seat_ids.as_slice())
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE flight_seats SET is_available = FALSE WHERE id = ANY($1)")
            .bind(request.seat_ids.as_slice())
            .execute(&mut *tx)
            .await?;

        let seats = seats_of(&mut tx, booking.id).await?;
        tx.commit().await?;

        tracing::info!(
            booking_id = booking.id,
            reference = %booking.reference,
            seats = seats.len(),
            "booking created"
        );
        Ok(BookingResponse { booking, seats })
    }

    // Customers see their own bookings, admins see all
    pub async fn list(&self, user: &AuthenticatedUser) -> AppResult<Vec<Booking>> {
        let owner = if user.is_admin() { None } else { Some(user.customer_id) };
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, reference, customer_id, flight_instance_id, status, total_amount, created_at
            FROM bookings
            WHERE ($1::INT IS NULL OR customer_id = $1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: i32) -> AppResult<BookingResponse> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, reference, customer_id, flight_instance_id, status, total_amount, created_at
            FROM bookings WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .filter(|booking| user.can_access(booking.customer_id))
        .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        let mut conn = self.pool.acquire().await?;
        let seats = seats_of(&mut conn, booking.id).await?;
        Ok(BookingResponse { booking, seats })
    }

    // Cancels the booking and puts its seats back on sale
    pub async fn cancel(&self, user: &AuthenticatedUser, id: i32) -> AppResult<BookingResponse> {
        let mut tx = self.pool.begin().await?;
        let booking = lock_booking(&mut tx, user, id).await?;

        if !booking.status.is_active() {
            return Err(AppError::Conflict("Booking is already cancelled".into()));
        }

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET status = $2 WHERE id = $1
            RETURNING id, reference, customer_id, flight_instance_id, status, total_amount, created_at
            "#,
        )
        .bind(id)
        .bind(BookingStatus::Cancelled)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE flight_seats SET is_available = TRUE
            WHERE id IN (SELECT flight_seat_id FROM booking_seats WHERE booking_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let seats = seats_of(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(booking_id = id, "booking cancelled");
        Ok(BookingResponse { booking, seats })
    }
}
