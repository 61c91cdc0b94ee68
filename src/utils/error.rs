use thiserror::Error;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::Request;
use rocket::Response;
use rocket::http::ContentType;
use std::io::Cursor;
use serde_json::json;
use serde::Serialize;
use rocket_okapi::JsonSchema;
use validator::ValidationErrors;

#[derive(Error, Debug, Serialize, JsonSchema)]
pub enum AppError {
    #[error("Database error")]
    DatabaseError(String),

    #[error("{0}")]
    AuthError(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    pub fn status(&self) -> Status {
        match self {
            AppError::ValidationError(_) => Status::BadRequest,
            AppError::NotFound(_) => Status::NotFound,
            AppError::DatabaseError(_) => Status::InternalServerError,
            AppError::AuthError(_) => Status::Unauthorized,
            AppError::Forbidden(_) => Status::Forbidden,
            AppError::Conflict(_) => Status::Conflict,
            AppError::BadRequest(_) => Status::BadRequest,
        }
    }
}

// Message for a unique constraint, named after the column the client sent
fn unique_violation_message(constraint: Option<&str>) -> String {
    match constraint {
        Some("customers_email_key") => "email is already registered".into(),
        Some("customers_username_key") => "username is already taken".into(),
        Some("airports_code_key") => "airport code already exists".into(),
        Some("flights_flight_number_key") => "flight number already exists".into(),
        Some("flight_seats_flight_instance_id_seat_number_key") => {
            "seat number already exists on this flight instance".into()
        }
        Some("bookings_reference_key") => "booking reference collision, please retry".into(),
        _ => "Record already exists".into(),
    }
}

// Convert sqlx::Error to AppError, keeping constraint failures client-facing
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => return AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(unique_violation_message(db_err.constraint()));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::Conflict(
                        "Operation conflicts with related records".into(),
                    );
                }
                if db_err.is_check_violation() {
                    return AppError::ValidationError(format!(
                        "Value rejected by constraint {}",
                        db_err.constraint().unwrap_or("check")
                    ));
                }
            }
            _ => {}
        }
        AppError::DatabaseError(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        AppError::ValidationError(messages.join(" "))
    }
}

// Define a type alias for the result type
pub type AppResult<T> = Result<T, AppError>;

// Format all errors from the route level into an HTTP response
#[rocket::async_trait]
impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = self.status();

        if let AppError::DatabaseError(detail) = &self {
            tracing::error!(method = %req.method(), uri = %req.uri(), error = %detail, "request failed");
        }

        let json = json!({
            "error": self.to_string()
        });

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(None, Cursor::new(json.to_string()))
            .ok()
    }
}

/// Failures that abort the process before the server is serving.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),

    #[error("server error: {0}")]
    Launch(#[from] Box<rocket::Error>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 3, message = "Username must be at least 3 characters long."))]
        name: String,
    }

    #[test]
    fn statuses_follow_error_taxonomy() {
        assert_eq!(AppError::ValidationError("x".into()).status(), Status::BadRequest);
        assert_eq!(AppError::AuthError("x".into()).status(), Status::Unauthorized);
        assert_eq!(AppError::Forbidden("x".into()).status(), Status::Forbidden);
        assert_eq!(AppError::NotFound("x".into()).status(), Status::NotFound);
        assert_eq!(AppError::Conflict("x".into()).status(), Status::Conflict);
        assert_eq!(
            AppError::DatabaseError("x".into()).status(),
            Status::InternalServerError
        );
    }

    #[test]
    fn database_detail_is_not_exposed() {
        let err = AppError::DatabaseError("connection refused on 10.0.0.5".into());
        assert_eq!(err.to_string(), "Database error");
    }

    #[test]
    fn unique_messages_name_the_field() {
        assert!(unique_violation_message(Some("customers_email_key")).contains("email"));
        assert!(unique_violation_message(Some("customers_username_key")).contains("username"));
        assert_eq!(unique_violation_message(None), "Record already exists");
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status(), Status::NotFound);
    }

    #[test]
    fn validation_errors_carry_field_messages() {
        let errors = Probe { name: "ab".into() }.validate().unwrap_err();
        let err: AppError = errors.into();
        assert_eq!(err.status(), Status::BadRequest);
        assert_eq!(err.to_string(), "Username must be at least 3 characters long.");
    }
}
