//! Business logic services.
//!
//! Each operation takes the connection pool, opens its own connection or
//! write transaction, and maps store signals to `AppError` at the call site.

pub mod pull_requests;
pub mod reviewer_selection;
pub mod statistics;
pub mod teams;
pub mod users;

use std::time::{SystemTime, UNIX_EPOCH};

use crate::db::StoreError;
use crate::error::AppError;

/// Get the current Unix timestamp.
pub(crate) fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Map an unexpected store failure to a database error tagged with the
/// operation that hit it.
pub(crate) fn store_failure(operation: &'static str) -> impl Fn(StoreError) -> AppError {
    move |err| AppError::database_with_op(err.to_string(), operation)
}
