//! Validation helpers for request parameters and configuration values.

use crate::error::{AppResult, AverageError};
use std::ops::RangeInclusive;
use url::Url;

/// Parses the `windowSize` query parameter.
///
/// # Arguments
///
/// * `raw` - The raw query value, or `None` when the parameter is absent.
/// * `default` - Capacity used when the parameter is absent.
/// * `max` - Largest capacity a caller may request, or `None` for no limit.
///
/// # Returns
///
/// * `Ok(size)` with `size >= 1` (and `size <= max` when a limit is set).
/// * `Err(AverageError::InvalidWindowSize)` for empty, non-numeric, zero or
///   negative values, values that do not fit in `usize`, and values above `max`.
pub fn parse_window_size(
    raw: Option<&str>,
    default: usize,
    max: Option<usize>,
) -> AppResult<usize> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AverageError::InvalidWindowSize(format!(
            "must be a positive integer, got '{}'",
            raw
        )));
    }

    let size: usize = trimmed
        .parse()
        .map_err(|_| AverageError::InvalidWindowSize(format!("'{}' is too large", raw)))?;

    if size == 0 {
        return Err(AverageError::InvalidWindowSize(format!(
            "must be a positive integer, got '{}'",
            raw
        )));
    }
    if let Some(max) = max.filter(|&max| size > max) {
        return Err(AverageError::InvalidWindowSize(format!(
            "'{}' is too large (max {})",
            raw, max
        )));
    }

    Ok(size)
}

/// Validates if a given u16 value is a valid port number.
/// By type, the port is already within the 0-65535 range.
/// This function checks that the port is not 0, which is reserved.
pub fn is_valid_port(port: u16) -> Result<(), &'static str> {
    if port > 0 {
        Ok(())
    } else {
        Err("Port number must be greater than 0")
    }
}

/// Validates that a string is an absolute `http` or `https` URL with a host.
pub fn is_valid_url(url: &str) -> Result<(), &'static str> {
    let parsed = Url::parse(url.trim()).map_err(|_| "URL could not be parsed")?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err("URL scheme must be http or https");
    }
    if parsed.host().is_none() {
        return Err("URL must include a host");
    }
    Ok(())
}

/// Validates if a given value is within a specified numeric range.
pub fn is_in_range<T: PartialOrd>(value: T, range: RangeInclusive<T>) -> Result<(), &'static str> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err("Value is outside the specified range")
    }
}
