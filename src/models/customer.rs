use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use validator::{Validate, ValidationError};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display, EnumString,
)]
#[sqlx(type_name = "customer_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    // Page the front-end navigates to after a successful login
    pub fn landing_page(&self) -> &'static str {
        match self {
            Role::Admin => "/admin.html",
            Role::Customer => "/index.html",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Customer {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct CustomerResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        CustomerResponse {
            id: customer.id,
            username: customer.username,
            email: customer.email,
            phone: customer.phone,
            role: customer.role,
            created_at: customer.created_at,
        }
    }
}

// `+` optionally, then 10 to 15 digits
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if (10..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message("Please enter a valid phone number.".into()))
    }
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct RegistrationRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters long."))]
    pub username: String,
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long."))]
    pub password: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
}

impl RegistrationRequest {
    // Surrounding whitespace is never part of a credential
    pub fn normalized(self) -> Self {
        RegistrationRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password: self.password.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required."))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct LoginResponse {
    pub user: CustomerResponse,
    pub redirect: String,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters long."))]
    pub username: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long."))]
    pub password: Option<String>,
}

impl UpdateProfileRequest {
    // Blank after trimming stays a value, so the length rules reject it
    pub fn normalized(self) -> Self {
        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());
        UpdateProfileRequest {
            username: trim(self.username),
            phone: trim(self.phone),
            password: trim(self.password),
        }
    }
}
