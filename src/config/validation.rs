//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts finite and > 0, metrics address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FloorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use crate::config::schema::FloorConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number of seconds greater than zero, got {value}")]
    InvalidTimeout { field: &'static str, value: f64 },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check that a seconds value can become a non-zero `Duration`.
pub fn validate_secs(field: &'static str, value: f64) -> Result<(), ValidationError> {
    secs_to_duration(field, value).map(|_| ())
}

/// Convert a seconds value into a non-zero `Duration`.
pub fn secs_to_duration(field: &'static str, value: f64) -> Result<Duration, ValidationError> {
    match Duration::try_from_secs_f64(value) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        _ => Err(ValidationError::InvalidTimeout { field, value }),
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &FloorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_secs("policy.floor_secs", config.policy.floor_secs) {
        errors.push(e);
    }
    if let Err(e) = validate_secs(
        "transport.default_timeout_secs",
        config.transport.default_timeout_secs,
    ) {
        errors.push(e);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
