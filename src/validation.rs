//! Configuration validation helpers.

use crate::types::{Error, Result};

/// Validate that a value is positive.
pub fn validate_positive(n: usize, field: &str) -> Result<()> {
    if n == 0 {
        return Err(Error::config(format!("{field} must be positive")));
    }
    Ok(())
}

/// Validate that a value does not exceed `max`.
pub fn validate_at_most(n: usize, max: usize, field: &str) -> Result<()> {
    if n > max {
        return Err(Error::config(format!(
            "{field} must be at most {max}, got {n}"
        )));
    }
    Ok(())
}
