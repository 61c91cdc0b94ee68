use async_trait::async_trait;
use ctor::dtor;
use chrono::{Duration, Utc};
use flight_reservation::config::AuthConfig;
use flight_reservation::models::booking::BookingRequest;
use flight_reservation::models::customer::{LoginRequest, RegistrationRequest, Role, UpdateProfileRequest};
use flight_reservation::utils::error::AppError;
use flight_reservation::utils::jwt::decode_token;
use test_context::{test_context, AsyncTestContext};

mod common {
    pub mod test_utils;
}
use common::test_utils::{seed_customer, seed_instance, unique, TestDb, TestServices};
use rust_decimal::Decimal;

struct CustomerServiceContext {
    services: Option<TestServices>,
    auth: AuthConfig,
}

#[dtor]
fn cleanup() {
    if let Err(e) = TestDb::cleanup_database_sync() {
        eprintln!("Failed to cleanup test database: {}", e);
    }
}

#[async_trait]
impl AsyncTestContext for CustomerServiceContext {
    async fn setup() -> Self {
        CustomerServiceContext {
            services: TestServices::connect(file!()).await,
            auth: AuthConfig {
                jwt_secret: "customer-test-secret".into(),
                token_ttl_hours: 1,
            },
        }
    }

    async fn teardown(self) {
        if let Some(services) = self.services {
            services.pool.close().await;
        }
    }
}

fn registration(username: &str, email: &str) -> RegistrationRequest {
    RegistrationRequest {
        username: username.into(),
        email: email.into(),
        password: "secret1".into(),
        phone: "+14155550123".into(),
    }
}

#[test_context(CustomerServiceContext)]
#[tokio::test]
async fn test_register_and_login(ctx: &CustomerServiceContext) -> Result<(), AppError> {
    let Some(services) = &ctx.services else { return Ok(()) };
    let username = unique("user");
    let email = format!("{}@Example.com", username);

    let customer = services
        .customers
        .register(registration(&format!("  {}  ", username), &email))
        .await?;
    assert_eq!(customer.username, username);
    assert_eq!(customer.email, email.to_lowercase());
    assert_eq!(customer.role, Role::Customer);

    let (response, token) = services
        .customers
        .login(
            LoginRequest {
                email: email.to_uppercase(),
                password: " secret1 ".into(),
            },
            &ctx.auth,
        )
        .await?;
    assert_eq!(response.user.id, customer.id);
    assert_eq!(response.redirect, "/index.html");

    let claims = decode_token(&token, &ctx.auth).expect("token should decode");
    assert_eq!(claims.sub, customer.id);
    assert_eq!(claims.role, Role::Customer);
    Ok(())
}

#[test_context(CustomerServiceContext)]
#[tokio::test]
async fn test_register_duplicates(ctx: &CustomerServiceContext) -> Result<(), AppError> {
    let Some(services) = &ctx.services else { return Ok(()) };
    let username = unique("dup");
    let email = format!("{}@example.com", username.to_lowercase());
    services.customers.register(registration(&username, &email)).await?;

    let same_email = services
        .customers
        .register(registration(&unique("other"), &email))
        .await;
    match same_email {
        Err(AppError::Conflict(msg)) => assert!(msg.contains("email")),
        other => panic!("expected email conflict, got {:?}", other),
    }

    let same_username = services
        .customers
        .register(registration(&username, &format!("{}@example.com", unique("x"))))
        .await;
    match same_username {
        Err(AppError::Conflict(msg)) => assert!(msg.contains("username")),
        other => panic!("expected username conflict, got {:?}", other),
    }
    Ok(())
}

#[test_context(CustomerServiceContext)]
#[tokio::test]
async fn test_login_failures_are_indistinguishable(ctx: &CustomerServiceContext) -> Result<(), AppError> {
    let Some(services) = &ctx.services else { return Ok(()) };
    let username = unique("login");
    let email = format!("{}@example.com", username.to_lowercase());
    services.customers.register(registration(&username, &email)).await?;

    let wrong_password = services
        .customers
        .login(
            LoginRequest {
                email: email.clone(),
                password: "not-it".into(),
            },
            &ctx.auth,
        )
        .await;
    let unknown_email = services
        .customers
        .login(
            LoginRequest {
                email: format!("{}@example.com", unique("nobody")),
                password: "secret1".into(),
            },
            &ctx.auth,
        )
        .await;

    match (wrong_password, unknown_email) {
        (Err(AppError::AuthError(a)), Err(AppError::AuthError(b))) => assert_eq!(a, b),
        other => panic!("expected two auth errors, got {:?}", other),
    }
    Ok(())
}

#[test_context(CustomerServiceContext)]
#[tokio::test]
async fn test_admin_redirect_after_role_change(ctx: &CustomerServiceContext) -> Result<(), AppError> {
    let Some(services) = &ctx.services else { return Ok(()) };
    let username = unique("admin");
    let email = format!("{}@example.com", username.to_lowercase());
    let customer = services.customers.register(registration(&username, &email)).await?;

    let promoted = services.customers.set_role(customer.id, Role::Admin).await?;
    assert_eq!(promoted.role, Role::Admin);

    let (response, token) = services
        .customers
        .login(
            LoginRequest {
                email,
                password: "secret1".into(),
            },
            &ctx.auth,
        )
        .await?;
    assert_eq!(response.redirect, "/admin.html");
    assert_eq!(decode_token(&token, &ctx.auth).expect("token").role, Role::Admin);
    Ok(())
}

#[test_context(CustomerServiceContext)]
#[tokio::test]
async fn test_profile_update_keeps_omitted_fields(ctx: &CustomerServiceContext) -> Result<(), AppError> {
    let Some(services) = &ctx.services else { return Ok(()) };
    let username = unique("prof");
    let email = format!("{}@example.com", username.to_lowercase());
    let customer = services.customers.register(registration(&username, &email)).await?;

    let updated = services
        .customers
        .update_profile(
            customer.id,
            UpdateProfileRequest {
                username: None,
                phone: Some("0123456789".into()),
                password: None,
            },
        )
        .await?;
    assert_eq!(updated.username, username);
    assert_eq!(updated.phone, "0123456789");

    services.customers.delete(customer.id).await?;
    assert!(matches!(
        services.customers.get(customer.id).await,
        Err(AppError::NotFound(_))
    ));
    Ok(())
}

#[test_context(CustomerServiceContext)]
#[tokio::test]
async fn test_profile_update_trims_before_validating(ctx: &CustomerServiceContext) -> Result<(), AppError> {
    let Some(services) = &ctx.services else { return Ok(()) };
    let customer_id = seed_customer(&services.pool).await?;
    let before = services.customers.get(customer_id).await?;

    for username in ["  ab ", "   "] {
        let result = services
            .customers
            .update_profile(
                customer_id,
                UpdateProfileRequest {
                    username: Some(username.into()),
                    phone: None,
                    password: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))), "{:?} accepted", username);
    }
    assert_eq!(services.customers.get(customer_id).await?.username, before.username);

    let renamed = services
        .customers
        .update_profile(
            customer_id,
            UpdateProfileRequest {
                username: Some("  renamed  ".into()),
                phone: None,
                password: None,
            },
        )
        .await?;
    assert_eq!(renamed.username, "renamed");
    Ok(())
}

#[test_context(CustomerServiceContext)]
#[tokio::test]
async fn test_delete_releases_held_seats(ctx: &CustomerServiceContext) -> Result<(), AppError> {
    let Some(services) = &ctx.services else { return Ok(()) };
    let (instance_id, seat_ids) =
        seed_instance(&services.pool, Utc::now() + Duration::days(4), 2, Decimal::new(100, 0)).await?;
    let customer_id = seed_customer(&services.pool).await?;
    let other_id = seed_customer(&services.pool).await?;

    services
        .bookings
        .create(
            customer_id,
            BookingRequest {
                flight_instance_id: instance_id,
                seat_ids: vec![seat_ids[0]],
            },
        )
        .await?;
    services
        .bookings
        .create(
            other_id,
            BookingRequest {
                flight_instance_id: instance_id,
                seat_ids: vec![seat_ids[1]],
            },
        )
        .await?;

    services.customers.delete(customer_id).await?;

    assert!(services.flight_seats.get(seat_ids[0]).await?.is_available);
    // Someone else's booking keeps its seat
    assert!(!services.flight_seats.get(seat_ids[1]).await?.is_available);
    assert!(matches!(
        services.customers.delete(customer_id).await,
        Err(AppError::NotFound(_))
    ));
    Ok(())
}
