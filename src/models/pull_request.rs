//! Pull request model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle status of a pull request.
///
/// The only transition is `Open` → `Merged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PullRequestStatus {
    Open,
    Merged,
}

impl From<&str> for PullRequestStatus {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "MERGED" => Self::Merged,
            _ => Self::Open,
        }
    }
}

impl std::fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Merged => write!(f, "MERGED"),
        }
    }
}

/// A pull request as stored in the `pull_requests` table.
///
/// Reviewers are kept in `pull_request_reviewers`, see
/// [`PullRequestWithReviewers`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PullRequest {
    /// Externally supplied pull request ID.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Author's user ID.
    pub author_id: String,

    /// Current status: `OPEN` or `MERGED`.
    pub status: String,

    /// Creation timestamp (Unix).
    pub created_at: i64,

    /// Merge timestamp (Unix, if merged).
    pub merged_at: Option<i64>,
}

impl PullRequest {
    /// Parse the status string into an enum.
    pub fn status_enum(&self) -> PullRequestStatus {
        PullRequestStatus::from(self.status.as_str())
    }

    /// Check if the pull request has been merged.
    pub fn is_merged(&self) -> bool {
        self.status_enum() == PullRequestStatus::Merged
    }
}

/// Input for inserting a pull request.
#[derive(Debug, Clone)]
pub struct NewPullRequest {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub created_at: i64,
}

/// A pull request with the IDs of its current reviewers, in assignment order.
#[derive(Debug, Clone)]
pub struct PullRequestWithReviewers {
    pub pull_request: PullRequest,
    pub reviewers: Vec<String>,
}

/// Result of replacing one reviewer with another.
#[derive(Debug, Clone)]
pub struct ReassignOutcome {
    pub pull_request: PullRequestWithReviewers,
    pub replaced_by: String,
}
