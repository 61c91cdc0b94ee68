use crate::config::AuthConfig;
use crate::models::customer::Role;
use crate::services::customer_service::CustomerService;
use crate::utils::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use rocket_okapi::request::OpenApiFromRequest;
use serde::{Deserialize, Serialize};

pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // customer id
    pub role: Role, // role at login; guards use the stored one
    pub exp: usize,
}

#[derive(Debug, Clone, Copy, OpenApiFromRequest)]
pub struct AuthenticatedUser {
    pub customer_id: i32,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    // Admins act on any record, customers only on their own
    pub fn can_access(&self, owner_id: i32) -> bool {
        self.is_admin() || self.customer_id == owner_id
    }
}

#[derive(Debug, Clone, Copy, OpenApiFromRequest)]
pub struct AdminUser {
    pub customer_id: i32,
}

pub fn generate_token(
    customer_id: i32,
    role: Role,
    config: &AuthConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(config.token_ttl_hours))
        .unwrap_or_else(chrono::Utc::now)
        .timestamp() as usize;

    let claims = Claims {
        sub: customer_id,
        role,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
}

pub fn decode_token(token: &str, config: &AuthConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

// The session cookie wins over a bearer header
fn extract_token(request: &Request<'_>) -> Option<String> {
    if let Some(cookie) = request.cookies().get(TOKEN_COOKIE) {
        return Some(cookie.value().to_string());
    }
    match request.headers().get_one("Authorization") {
        Some(header) if header.starts_with("Bearer ") => Some(header[7..].to_string()),
        _ => None,
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let rocket = request.rocket();
        let (config, customers) = match (rocket.state::<AuthConfig>(), rocket.state::<CustomerService>()) {
            (Some(config), Some(customers)) => (config, customers),
            _ => return Outcome::Error((Status::InternalServerError, ())),
        };

        let token = match extract_token(request) {
            Some(token) => token,
            None => return Outcome::Error((Status::Unauthorized, ())),
        };

        let claims = match decode_token(&token, config) {
            Ok(claims) => claims,
            Err(_) => return Outcome::Error((Status::Unauthorized, ())),
        };

        // A deleted customer's token is dead, a changed role applies at once
        match customers.get(claims.sub).await {
            Ok(customer) => Outcome::Success(AuthenticatedUser {
                customer_id: customer.id,
                role: customer.role,
            }),
            Err(AppError::NotFound(_)) => Outcome::Error((Status::Unauthorized, ())),
            Err(e) => {
                tracing::error!(customer_id = claims.sub, error = ?e, "session lookup failed");
                Outcome::Error((Status::InternalServerError, ()))
            }
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedUser::from_request(request).await {
            Outcome::Success(user) if user.is_admin() => Outcome::Success(AdminUser {
                customer_id: user.customer_id,
            }),
            Outcome::Success(_) => Outcome::Error((Status::Forbidden, ())),
            Outcome::Error(e) => Outcome::Error(e),
            Outcome::Forward(f) => Outcome::Forward(f),
        }
    }
}
