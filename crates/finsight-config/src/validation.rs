//! Validation trait and helpers for configuration types

use crate::error::{ConfigError, Result};

/// Trait for validating configuration values
///
/// Implement this trait for any config type that needs validation beyond
/// type-level checks. Validation failures are fatal and reported before the
/// value is ever used.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Helper to validate an integer is above a minimum
pub fn validate_positive(field: impl Into<String>, value: usize, min: usize) -> Result<()> {
    if value <= min {
        return Err(ConfigError::InvalidInteger {
            field: field.into(),
            value,
            min,
        });
    }
    Ok(())
}

/// Helper to validate a value is within an inclusive range
pub fn validate_range(field: impl Into<String>, value: f64, min: f64, max: f64) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        });
    }
    Ok(())
}
