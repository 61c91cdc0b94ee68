use crate::config::AuthConfig;
use crate::models::customer::{
    Customer, CustomerResponse, LoginRequest, LoginResponse, RegistrationRequest, Role,
    UpdateProfileRequest,
};
use crate::utils::error::{AppError, AppResult};
use crate::utils::jwt;
use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct CustomerService {
    pool: PgPool,
}

impl CustomerService {
    pub fn new(pool: PgPool) -> Self {
        CustomerService { pool }
    }

    // Register a new customer
    pub async fn register(&self, request: RegistrationRequest) -> AppResult<CustomerResponse> {
        let request = request.normalized();
        request.validate()?;

        // Check if email or username already exists
        let existing: Option<(String, String)> = sqlx::query_as(
            "SELECT email, username FROM customers WHERE email = $1 OR username = $2 LIMIT 1",
        )
        .bind(&request.email)
        .bind(&request.username)
        .fetch_optional(&self.pool)
        .await?;

        if let Some((email, _)) = existing {
            return Err(AppError::Conflict(if email == request.email {
                "email is already registered".into()
            } else {
                "username is already taken".into()
            }));
        }

        // Hash password
        let password_hash = hash(request.password.as_bytes(), DEFAULT_COST)
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        // Insert customer; a concurrent duplicate still surfaces as a unique violation
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (username, email, password_hash, phone, role)
            VALUES ($1, $2, $3, $4, 'customer')
            RETURNING id, username, email, password_hash, phone, role, created_at
            "#,
        )
        .bind(&request.username)
        .bind(&request.email)
        .bind(&password_hash)
        .bind(&request.phone)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(customer_id = customer.id, "customer registered");
        Ok(customer.into())
    }

    // Verify credentials and issue a session token
    pub async fn login(
        &self,
        request: LoginRequest,
        auth: &AuthConfig,
    ) -> AppResult<(LoginResponse, String)> {
        request.validate()?;
        let email = request.email.trim().to_lowercase();

        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, username, email, password_hash, phone, role, created_at FROM customers WHERE email = $1",
        )
        .bind(&email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::AuthError(INVALID_CREDENTIALS.into()))?;

        // Verify password
        let password_matches = verify(request.password.trim().as_bytes(), &customer.password_hash)
            .map_err(|_| AppError::AuthError(INVALID_CREDENTIALS.into()))?;

        if !password_matches {
            return Err(AppError::AuthError(INVALID_CREDENTIALS.into()));
        }

        let token = jwt::generate_token(customer.id, customer.role, auth)
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let redirect = customer.role.landing_page().to_string();
        Ok((
            LoginResponse {
                user: customer.into(),
                redirect,
            },
            token,
        ))
    }

    pub async fn get(&self, id: i32) -> AppResult<CustomerResponse> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, username, email, password_hash, phone, role, created_at FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

        Ok(customer.into())
    }

    pub async fn list(&self) -> AppResult<Vec<CustomerResponse>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, username, email, password_hash, phone, role, created_at FROM customers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers.into_iter().map(CustomerResponse::from).collect())
    }

    pub async fn update_profile(
        &self,
        id: i32,
        request: UpdateProfileRequest,
    ) -> AppResult<CustomerResponse> {
        let request = request.normalized();
        request.validate()?;

        let password_hash = match &request.password {
            Some(password) => Some(
                hash(password.as_bytes(), DEFAULT_COST)
                    .map_err(|e| AppError::DatabaseError(e.to_string()))?,
            ),
            None => None,
        };

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET username = COALESCE($2, username),
                phone = COALESCE($3, phone),
                password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            RETURNING id, username, email, password_hash, phone, role, created_at
            "#,
        )
        .bind(id)
        .bind(request.username.as_deref())
        .bind(request.phone.as_deref())
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

        Ok(customer.into())
    }

    /// Removes the customer with their bookings. Seats held by their active
    /// bookings go back on sale in the same transaction.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        // Blocks bookings being inserted for this customer meanwhile
        sqlx::query_scalar::<_, i32>("SELECT id FROM customers WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

        let released = sqlx::query(
            r#"
            UPDATE flight_seats SET is_available = TRUE
            WHERE id IN (
                SELECT bs.flight_seat_id
                FROM booking_seats bs
                JOIN bookings b ON b.id = bs.booking_id
                WHERE b.customer_id = $1 AND b.status <> 'cancelled'
            )
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(customer_id = id, seats_released = released, "customer deleted");
        Ok(())
    }

    // Grant or revoke the administrator role
    pub async fn set_role(&self, id: i32, role: Role) -> AppResult<CustomerResponse> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET role = $2 WHERE id = $1
            RETURNING id, username, email, password_hash, phone, role, created_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

        tracing::info!(customer_id = id, %role, "customer role changed");
        Ok(customer.into())
    }
}
