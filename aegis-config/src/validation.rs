//! Custom validation functions for configuration.
//!
//! Provides shared validation logic used across multiple configuration
//! modules.

use validator::ValidationError;

/// Validate that a scenario key is a plain lowercase slug.
pub fn validate_scenario_key(key: &str) -> Result<(), ValidationError> {
    let re = regex::Regex::new("^[a-z0-9_-]+$").map_err(|_| ValidationError::new("invalid_regex"))?;
    if !key.is_empty() && key.len() <= 64 && re.is_match(key) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_scenario_key"))
    }
}

/// Validate that a fraction lies strictly inside (0, 1).
pub fn validate_fraction(value: f64) -> Result<(), ValidationError> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ValidationError::new("must_be_a_fraction"))
    }
}

/// Validate a latitude in degrees.
pub fn validate_latitude(value: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_latitude"))
    }
}

/// Validate a longitude in degrees.
pub fn validate_longitude(value: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_longitude"))
    }
}
