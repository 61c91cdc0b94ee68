use crate::models::aircraft::{Aircraft, AircraftRequest};
use crate::utils::error::{AppError, AppResult};
use sqlx::PgPool;
use validator::Validate;

const DEFAULT_SEATS_PER_ROW: i32 = 6;

#[derive(Clone)]
pub struct AircraftService {
    pool: PgPool,
}

impl AircraftService {
    pub fn new(pool: PgPool) -> Self {
        AircraftService { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Aircraft>> {
        let aircraft = sqlx::query_as::<_, Aircraft>(
            "SELECT id, model, manufacturer, seat_capacity, seats_per_row FROM aircraft ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(aircraft)
    }

    pub async fn get(&self, id: i32) -> AppResult<Aircraft> {
        sqlx::query_as::<_, Aircraft>(
            "SELECT id, model, manufacturer, seat_capacity, seats_per_row FROM aircraft WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Aircraft not found".into()))
    }

    pub async fn create(&self, request: AircraftRequest) -> AppResult<Aircraft> {
        request.validate()?;
        let aircraft = sqlx::query_as::<_, Aircraft>(
            r#"
            INSERT INTO aircraft (model, manufacturer, seat_capacity, seats_per_row)
            VALUES ($1, $2, $3, $4)
            RETURNING id, model, manufacturer, seat_capacity, seats_per_row
            "#,
        )
        .bind(request.model.trim())
        .bind(request.manufacturer.as_deref())
        .bind(request.seat_capacity)
        .bind(request.seats_per_row.unwrap_or(DEFAULT_SEATS_PER_ROW))
        .fetch_one(&self.pool)
        .await?;
        Ok(aircraft)
    }

    // Seat inventory of existing flight instances is not regenerated
    pub async fn update(&self, id: i32, request: AircraftRequest) -> AppResult<Aircraft> {
        request.validate()?;
        sqlx::query_as::<_, Aircraft>(
            r#"
            UPDATE aircraft
            SET model = $2, manufacturer = $3, seat_capacity = $4, seats_per_row = $5
            WHERE id = $1
            RETURNING id, model, manufacturer, seat_capacity, seats_per_row
            "#,
        )
        .bind(id)
        .bind(request.model.trim())
        .bind(request.manufacturer.as_deref())
        .bind(request.seat_capacity)
        .bind(request.seats_per_row.unwrap_or(DEFAULT_SEATS_PER_ROW))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Aircraft not found".into()))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM aircraft WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Aircraft not found".into()));
        }
        Ok(())
    }
}
