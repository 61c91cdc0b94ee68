use crate::config::AuthConfig;
use crate::models::customer::{CustomerResponse, LoginRequest, LoginResponse, RegistrationRequest};
use crate::services::customer_service::CustomerService;
use crate::utils::error::AppError;
use crate::utils::jwt::TOKEN_COOKIE;
use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::response::status::{Created, NoContent};
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

/// Register a new customer
#[openapi(tag = "Auth")]
#[post("/auth/register", format = "json", data = "<request>")]
pub async fn register(
    request: Json<RegistrationRequest>,
    customer_service: &State<CustomerService>,
) -> Result<Created<Json<CustomerResponse>>, AppError> {
    let customer = customer_service.register(request.into_inner()).await?;
    Ok(Created::new(format!("/customers/{}", customer.id)).body(Json(customer)))
}

/// Log in and receive the session cookie
#[openapi(tag = "Auth")]
#[post("/auth/login", format = "json", data = "<request>")]
pub async fn login(
    request: Json<LoginRequest>,
    cookies: &CookieJar<'_>,
    auth: &State<AuthConfig>,
    customer_service: &State<CustomerService>,
) -> Result<Json<LoginResponse>, AppError> {
    let (response, token) = customer_service.login(request.into_inner(), auth).await?;

    cookies.add(
        Cookie::build((TOKEN_COOKIE, token))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(rocket::time::Duration::hours(auth.token_ttl_hours)),
    );

    Ok(Json(response))
}

/// Clear the session cookie
#[openapi(tag = "Auth")]
#[post("/auth/logout")]
pub async fn logout(cookies: &CookieJar<'_>) -> NoContent {
    cookies.remove(Cookie::build((TOKEN_COOKIE, "")).path("/"));
    NoContent
}
