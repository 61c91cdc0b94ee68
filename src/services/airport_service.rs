use crate::models::airport::{Airport, AirportRequest};
use crate::utils::error::{AppError, AppResult};
use sqlx::PgPool;
use validator::Validate;

#[derive(Clone)]
pub struct AirportService {
    pool: PgPool,
}

impl AirportService {
    pub fn new(pool: PgPool) -> Self {
        AirportService { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Airport>> {
        let airports = sqlx::query_as::<_, Airport>(
            "SELECT id, code, name, city, country FROM airports ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(airports)
    }

    pub async fn get(&self, id: i32) -> AppResult<Airport> {
        sqlx::query_as::<_, Airport>("SELECT id, code, name, city, country FROM airports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Airport not found".into()))
    }

    pub async fn create(&self, request: AirportRequest) -> AppResult<Airport> {
        request.validate()?;
        let airport = sqlx::query_as::<_, Airport>(
            r#"
            INSERT INTO airports (code, name, city, country)
            VALUES ($1, $2, $3, $4)
            RETURNING id, code, name, city, country
            "#,
        )
        .bind(request.code.to_uppercase())
        .bind(request.name.trim())
        .bind(request.city.trim())
        .bind(request.country.trim())
        .fetch_one(&self.pool)
        .await?;
        Ok(airport)
    }

    pub async fn update(&self, id: i32, request: AirportRequest) -> AppResult<Airport> {
        request.validate()?;
        sqlx::query_as::<_, Airport>(
            r#"
            UPDATE airports SET code = $2, name = $3, city = $4, country = $5
            WHERE id = $1
            RETURNING id, code, name, city, country
            "#,
        )
        .bind(id)
        .bind(request.code.to_uppercase())
        .bind(request.name.trim())
        .bind(request.city.trim())
        .bind(request.country.trim())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Airport not found".into()))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM airports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Airport not found".into()));
        }
        Ok(())
    }
}
