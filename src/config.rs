use sqlx::postgres::PgSslMode;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SHIFT_SCHEDULE: &str = "0 0 0 * * *";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub ssl_mode: PgSslMode,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    /// Six-field cron expression (seconds first), evaluated in server local time.
    pub shift_schedule: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    // Load the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let database = DatabaseConfig {
            url: required("DATABASE_URL")?,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            acquire_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                3,
            )?),
            ssl_mode: match lookup("DATABASE_SSL_MODE") {
                Some(value) => PgSslMode::from_str(&value).map_err(|_| ConfigError::Invalid {
                    key: "DATABASE_SSL_MODE",
                    value,
                })?,
                None => PgSslMode::Prefer,
            },
        };

        let auth = AuthConfig {
            jwt_secret: required("JWT_SECRET")?,
            token_ttl_hours: parse_or(&lookup, "TOKEN_TTL_HOURS", 24)?,
        };

        let scheduler = SchedulerConfig {
            enabled: parse_or(&lookup, "SHIFT_ENABLED", true)?,
            shift_schedule: lookup("SHIFT_SCHEDULE")
                .unwrap_or_else(|| DEFAULT_SHIFT_SCHEDULE.to_string()),
        };

        Ok(AppConfig {
            database,
            auth,
            scheduler,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
