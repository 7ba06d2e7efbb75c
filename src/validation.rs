//! Field validation utilities.

use std::path::Path;

use crate::types::{ConfigViolation, Error, Result, FILEPATH_MAX};

/// Longest dotted domain name (RFC 2181).
const DOMAIN_MAX: usize = 253;
/// Longest single label of a domain name.
const LABEL_MAX: usize = 63;

/// Validate that a string is not empty.
pub fn validate_non_empty(s: &str, field: &'static str) -> Result<()> {
    if s.is_empty() {
        return Err(ConfigViolation::Empty { field }.into());
    }
    Ok(())
}

/// Validate that a value is positive.
pub fn validate_positive(n: u64, field: &'static str) -> Result<()> {
    if n == 0 {
        return Err(ConfigViolation::NotPositive { field }.into());
    }
    Ok(())
}

/// Validate that a length does not exceed `max`.
pub fn validate_max_len(length: usize, max: usize, field: &'static str) -> Result<()> {
    if length > max {
        return Err(ConfigViolation::TooLong { field, length, max }.into());
    }
    Ok(())
}

/// Validate a path: bounded length, optionally absolute.
pub fn validate_path(path: &Path, field: &'static str, absolute: bool) -> Result<()> {
    let length = path.as_os_str().len();
    if length == 0 {
        return Err(ConfigViolation::Empty { field }.into());
    }
    validate_max_len(length, FILEPATH_MAX, field)?;
    if absolute && !path.is_absolute() {
        return Err(ConfigViolation::RelativePath {
            field,
            path: path.display().to_string(),
        }
        .into());
    }
    Ok(())
}

/// Validate a dotted host name. A single trailing dot is accepted.
pub fn validate_hostname(name: &str) -> Result<()> {
    let invalid = || -> Error { ConfigViolation::InvalidDomain(name.to_string()).into() };

    let trimmed = name.strip_suffix('.').unwrap_or(name);
    if trimmed.is_empty() || trimmed.len() > DOMAIN_MAX {
        return Err(invalid());
    }

    for label in trimmed.split('.') {
        if label.is_empty() || label.len() > LABEL_MAX {
            return Err(invalid());
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid());
        }
        if !label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return Err(invalid());
        }
    }
    Ok(())
}
