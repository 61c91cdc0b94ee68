use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Airport {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
}

fn validate_iata_code(code: &str) -> Result<(), ValidationError> {
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new("code").with_message("Airport code must be 3 letters.".into()))
    }
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct AirportRequest {
    #[validate(custom(function = "validate_iata_code"))]
    pub code: String,
    #[validate(length(min = 1, message = "Airport name is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "City is required."))]
    pub city: String,
    #[validate(length(min = 1, message = "Country is required."))]
    pub country: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn airport_code_must_be_three_letters() {
        assert!(validate_iata_code("YYZ").is_ok());
        assert!(validate_iata_code("yyz").is_ok());
        assert!(validate_iata_code("YY").is_err());
        assert!(validate_iata_code("Y1Z").is_err());
    }
}
