use crate::models::flight::{Flight, FlightDetail, FlightRequest};
use crate::utils::error::{AppError, AppResult};
use sqlx::PgPool;
use validator::Validate;

#[derive(Clone)]
pub struct FlightService {
    pool: PgPool,
}

impl FlightService {
    pub fn new(pool: PgPool) -> Self {
        FlightService { pool }
    }

    // List flights with their route endpoints, optionally between two airports
    pub async fn list(
        &self,
        origin: Option<&str>,
        destination: Option<&str>,
    ) -> AppResult<Vec<FlightDetail>> {
        let flights = sqlx::query_as::<_, FlightDetail>(
            r#"
            SELECT
                f.id,
                f.flight_number,
                f.route_id,
                f.aircraft_id,
                o.code AS origin_code,
                d.code AS destination_code
            FROM flights f
            JOIN routes r ON f.route_id = r.id
            JOIN airports o ON r.origin_airport_id = o.id
            JOIN airports d ON r.destination_airport_id = d.id
            WHERE ($1::TEXT IS NULL OR o.code = UPPER($1))
            AND ($2::TEXT IS NULL OR d.code = UPPER($2))
            ORDER BY f.flight_number
            "#,
        )
        .bind(origin)
        .bind(destination)
        .fetch_all(&self.pool)
        .await?;

        Ok(flights)
    }

    pub async fn get(&self, id: i32) -> AppResult<Flight> {
        sqlx::query_as::<_, Flight>(
            "SELECT id, flight_number, route_id, aircraft_id FROM flights WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".into()))
    }

    // The aircraft assigned to the flight, or to its route when none is given
    async fn resolve_aircraft(&self, request: &FlightRequest) -> AppResult<i32> {
        let route_aircraft: Option<i32> =
            sqlx::query_scalar("SELECT aircraft_id FROM routes WHERE id = $1")
                .bind(request.route_id)
                .fetch_optional(&self.pool)
                .await?;
        let route_aircraft =
            route_aircraft.ok_or_else(|| AppError::NotFound("Route not found".into()))?;

        match request.aircraft_id {
            Some(aircraft_id) => {
                let exists: Option<i32> = sqlx::query_scalar("SELECT id FROM aircraft WHERE id = $1")
                    .bind(aircraft_id)
                    .fetch_optional(&self.pool)
                    .await?;
                exists.ok_or_else(|| AppError::NotFound("Aircraft not found".into()))
            }
            None => Ok(route_aircraft),
        }
    }

    pub async fn create(&self, request: FlightRequest) -> AppResult<Flight> {
        request.validate()?;
        let aircraft_id = self.resolve_aircraft(&request).await?;

        let flight = sqlx::query_as::<_, Flight>(
            r#"
            INSERT INTO flights (flight_number, route_id, aircraft_id)
            VALUES ($1, $2, $3)
            RETURNING id, flight_number, route_id, aircraft_id
            "#,
        )
        .bind(request.flight_number.trim().to_uppercase())
        .bind(request.route_id)
        .bind(aircraft_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(flight)
    }

    pub async fn update(&self, id: i32, request: FlightRequest) -> AppResult<Flight> {
        request.validate()?;
        let aircraft_id = self.resolve_aircraft(&request).await?;

        sqlx::query_as::<_, Flight>(
            r#"
            UPDATE flights SET flight_number = $2, route_id = $3, aircraft_id = $4
            WHERE id = $1
            RETURNING id, flight_number, route_id, aircraft_id
            "#,
        )
        .bind(id)
        .bind(request.flight_number.trim().to_uppercase())
        .bind(request.route_id)
        .bind(aircraft_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Flight not found".into()))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM flights WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Flight not found".into()));
        }
        Ok(())
    }
}
