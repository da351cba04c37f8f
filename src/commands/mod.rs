//! Typed command handlers.
//!
//! Each command takes a deserialized request, validates it, invokes one
//! service operation and converts the result into its response DTO. The
//! HTTP layer in `server::api` only extracts requests and renders results.
//!
//! Commands are organized by resource:
//! - `team`: team creation and lookup
//! - `user`: activity flag and review listing
//! - `pull_request`: create, merge, reassign
//! - `statistics`: workload ranking

pub mod pull_request;
pub mod statistics;
pub mod team;
pub mod user;

use crate::error::AppError;
use chrono::{DateTime, SecondsFormat};

/// Longest accepted user, team or pull request identifier.
pub const MAX_ID_LEN: usize = 50;

/// Require an identifier of 1 to [`MAX_ID_LEN`] characters.
pub(crate) fn validate_id(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation_field(
            format!("{} is required", field),
            field,
        ));
    }
    if value.chars().count() > MAX_ID_LEN {
        return Err(AppError::validation_field(
            format!("{} must be at most {} characters", field, MAX_ID_LEN),
            field,
        ));
    }
    Ok(())
}

/// Require a non-blank string.
pub(crate) fn validate_non_empty(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation_field(
            format!("{} must not be empty", field),
            field,
        ));
    }
    Ok(())
}

/// Unwrap a required value or report the missing field.
pub(crate) fn require<T: Copy>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::validation_field(format!("{} is required", field), field))
}

/// Render a Unix timestamp as RFC 3339 in UTC.
pub(crate) fn format_timestamp(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| ts.to_string())
}
