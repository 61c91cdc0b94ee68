use crate::models::route::{Route, RouteRequest};
use crate::utils::error::{AppError, AppResult};
use sqlx::PgPool;
use validator::Validate;

#[derive(Clone)]
pub struct RouteService {
    pool: PgPool,
}

impl RouteService {
    pub fn new(pool: PgPool) -> Self {
        RouteService { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Route>> {
        let routes = sqlx::query_as::<_, Route>(
            "SELECT id, origin_airport_id, destination_airport_id, aircraft_id, distance_km FROM routes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(routes)
    }

    pub async fn get(&self, id: i32) -> AppResult<Route> {
        sqlx::query_as::<_, Route>(
            "SELECT id, origin_airport_id, destination_airport_id, aircraft_id, distance_km FROM routes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Route not found".into()))
    }

    // Referenced rows must exist before the route is written
    async fn check_references(&self, request: &RouteRequest) -> AppResult<()> {
        let airports: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM airports WHERE id = $1 OR id = $2")
            .bind(request.origin_airport_id)
            .bind(request.destination_airport_id)
            .fetch_one(&self.pool)
            .await?;
        if airports < 2 {
            return Err(AppError::NotFound("Origin or destination airport not found".into()));
        }

        let aircraft: Option<i32> = sqlx::query_scalar("SELECT id FROM aircraft WHERE id = $1")
            .bind(request.aircraft_id)
            .fetch_optional(&self.pool)
            .await?;
        if aircraft.is_none() {
            return Err(AppError::NotFound("Aircraft not found".into()));
        }
        Ok(())
    }

    pub async fn create(&self, request: RouteRequest) -> AppResult<Route> {
        request.validate()?;
        self.check_references(&request).await?;

        let route = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (origin_airport_id, destination_airport_id, aircraft_id, distance_km)
            VALUES ($1, $2, $3, $4)
            RETURNING id, origin_airport_id, destination_airport_id, aircraft_id, distance_km
            "#,
        )
        .bind(request.origin_airport_id)
        .bind(request.destination_airport_id)
        .bind(request.aircraft_id)
        .bind(request.distance_km)
        .fetch_one(&self.pool)
        .await?;
        Ok(route)
    }

    pub async fn update(&self, id: i32, request: RouteRequest) -> AppResult<Route> {
        request.validate()?;
        self.check_references(&request).await?;

        sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET origin_airport_id = $2, destination_airport_id = $3, aircraft_id = $4, distance_km = $5
            WHERE id = $1
            RETURNING id, origin_airport_id, destination_airport_id, aircraft_id, distance_km
            "#,
        )
        .bind(id)
        .bind(request.origin_airport_id)
        .bind(request.destination_airport_id)
        .bind(request.aircraft_id)
        .bind(request.distance_km)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Route not found".into()))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM routes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Route not found".into()));
        }
        Ok(())
    }
}
