//! User model.

use serde::Serialize;
use sqlx::FromRow;

use super::PullRequest;

/// A team member who can author and review pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    /// Externally supplied user ID.
    pub id: String,

    /// Display name.
    pub username: String,

    /// Inactive users are never picked as reviewers.
    pub is_active: bool,

    /// Owning team, fixed at creation.
    pub team_id: String,

    /// Number of reviewed pull requests that have merged.
    pub assign_count: i64,
}

/// Input for inserting a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub username: String,
    pub is_active: bool,
    pub team_id: String,
}

/// A user with the name of the team it belongs to.
#[derive(Debug, Clone)]
pub struct UserWithTeam {
    pub user: User,
    pub team_name: String,
}

/// Pull requests a user currently reviews.
#[derive(Debug, Clone)]
pub struct UserReviews {
    pub user_id: String,
    pub pull_requests: Vec<PullRequest>,
}

/// Completed-review count for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStatistic {
    pub user_id: String,
    pub assign_count: i64,
}

impl From<&User> for UserStatistic {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            assign_count: user.assign_count,
        }
    }
}
