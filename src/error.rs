//! Application error types.
//!
//! Every engine operation returns `Result<_, AppError>`. Domain variants are
//! expected outcomes reported verbatim to the caller; `Database` and
//! `Internal` are unanticipated failures that are logged and rendered as a
//! generic internal error.

use serde::Serialize;
use thiserror::Error;

/// Machine-readable error code sent to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationFailed,
    TeamExists,
    UserExists,
    PrExists,
    NotFound,
    PrMerged,
    NotAssigned,
    NoCandidate,
    Timeout,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::TeamExists => "TEAM_EXISTS",
            Self::UserExists => "USER_EXISTS",
            Self::PrExists => "PR_EXISTS",
            Self::NotFound => "NOT_FOUND",
            Self::PrMerged => "PR_MERGED",
            Self::NotAssigned => "NOT_ASSIGNED",
            Self::NoCandidate => "NO_CANDIDATE",
            Self::Timeout => "TIMEOUT",
            Self::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or incomplete input.
    #[error("{message}")]
    ValidationFailed {
        message: String,
        field: Option<String>,
    },

    /// Team name is already taken.
    #[error("team '{name}' already exists")]
    TeamExists { name: String },

    /// User id is already taken.
    #[error("user '{id}' already exists")]
    UserExists { id: String },

    /// Pull request id is already taken.
    #[error("pull request '{id}' already exists")]
    PrExists { id: String },

    /// Requested resource not found.
    #[error("{resource} '{id}' not found")]
    NotFound { resource: String, id: String },

    /// Reassignment attempted after merge.
    #[error("cannot reassign on merged pull request '{id}'")]
    PrMerged { id: String },

    /// The reviewer being replaced is not on the pull request.
    #[error("reviewer '{reviewer_id}' is not assigned to pull request '{pr_id}'")]
    NotAssigned { pr_id: String, reviewer_id: String },

    /// No active teammate is left to take over the review.
    #[error("no active replacement candidate in team for pull request '{pr_id}'")]
    NoCandidate { pr_id: String },

    /// The request ran past its deadline and was abandoned.
    #[error("request timed out")]
    Timeout,

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        operation: Option<String>,
    },

    /// Internal application error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error naming the offending field.
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn team_exists(name: impl Into<String>) -> Self {
        Self::TeamExists { name: name.into() }
    }

    pub fn user_exists(id: impl Into<String>) -> Self {
        Self::UserExists { id: id.into() }
    }

    pub fn pr_exists(id: impl Into<String>) -> Self {
        Self::PrExists { id: id.into() }
    }

    /// Create a not found error for a resource kind and id.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn pr_merged(id: impl Into<String>) -> Self {
        Self::PrMerged { id: id.into() }
    }

    pub fn not_assigned(pr_id: impl Into<String>, reviewer_id: impl Into<String>) -> Self {
        Self::NotAssigned {
            pr_id: pr_id.into(),
            reviewer_id: reviewer_id.into(),
        }
    }

    pub fn no_candidate(pr_id: impl Into<String>) -> Self {
        Self::NoCandidate {
            pr_id: pr_id.into(),
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            operation: None,
        }
    }

    /// Create a database error with operation context.
    pub fn database_with_op(message: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            operation: Some(operation.into()),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The wire code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            Self::TeamExists { .. } => ErrorCode::TeamExists,
            Self::UserExists { .. } => ErrorCode::UserExists,
            Self::PrExists { .. } => ErrorCode::PrExists,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::PrMerged { .. } => ErrorCode::PrMerged,
            Self::NotAssigned { .. } => ErrorCode::NotAssigned,
            Self::NoCandidate { .. } => ErrorCode::NoCandidate,
            Self::Timeout => ErrorCode::Timeout,
            Self::Database { .. } | Self::Internal { .. } => ErrorCode::Internal,
        }
    }

    /// HTTP status code this error is reported with.
    pub fn status_code(&self) -> u16 {
        match self.code() {
            ErrorCode::ValidationFailed | ErrorCode::TeamExists | ErrorCode::UserExists => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::PrExists
            | ErrorCode::PrMerged
            | ErrorCode::NotAssigned
            | ErrorCode::NoCandidate => 409,
            ErrorCode::Timeout => 408,
            ErrorCode::Internal => 500,
        }
    }

    /// Check if this is an unanticipated failure rather than a domain outcome.
    pub fn is_internal(&self) -> bool {
        self.code() == ErrorCode::Internal
    }
}

// Conversions from common error types

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::database(err.to_string())
    }
}

impl From<crate::db::StoreError> for AppError {
    fn from(err: crate::db::StoreError) -> Self {
        Self::database(err.to_string())
    }
}
