//! Input Validation Utilities
//!
//! Small checks shared by configuration validation and fragment construction.

use crate::core::ReflowError;

/// Validates that a float value is finite (not NaN or infinite).
#[inline]
pub fn validate_finite(value: f64, param_name: &str) -> Result<(), ReflowError> {
    if !value.is_finite() {
        return Err(ReflowError::InvalidInput {
            message: format!("Parameter '{}' must be finite, got: {}", param_name, value),
        });
    }
    Ok(())
}

/// Validates that a value is within a specified range (inclusive).
#[inline]
pub fn validate_range<T: PartialOrd + std::fmt::Display>(
    value: T,
    min: T,
    max: T,
    param_name: &str,
) -> Result<(), ReflowError> {
    if value < min || value > max {
        return Err(ReflowError::InvalidInput {
            message: format!(
                "Parameter '{}' must be in range [{}, {}], got: {}",
                param_name, min, max, value
            ),
        });
    }
    Ok(())
}

/// Validates that a value is positive (> 0).
#[inline]
pub fn validate_positive<T: PartialOrd + std::fmt::Display + Default>(
    value: T,
    param_name: &str,
) -> Result<(), ReflowError> {
    if value <= T::default() {
        return Err(ReflowError::InvalidInput {
            message: format!(
                "Parameter '{}' must be positive, got: {}",
                param_name, value
            ),
        });
    }
    Ok(())
}

/// Validates that a collection is not empty.
#[inline]
pub fn validate_non_empty<T>(items: &[T], param_name: &str) -> Result<(), ReflowError> {
    if items.is_empty() {
        return Err(ReflowError::InvalidInput {
            message: format!("Parameter '{}' cannot be empty", param_name),
        });
    }
    Ok(())
}

/// Validates that a rectangle has positive extent on both axes.
pub fn validate_rect(
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
    context: &str,
) -> Result<(), ReflowError> {
    if left >= right || top >= bottom {
        return Err(ReflowError::InvalidInput {
            message: format!(
                "{}: rectangle must satisfy left < right and top < bottom, got ({}, {}, {}, {})",
                context, left, top, right, bottom
            ),
        });
    }
    Ok(())
}
