//! User commands.

use super::{require, validate_id};
use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::{PullRequest, PullRequestStatus, UserReviews, UserWithTeam};
use crate::services::users;
use serde::{Deserialize, Serialize};

/// Request body for flipping a user's active flag.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SetIsActiveRequest {
    pub user_id: String,
    pub is_active: Option<bool>,
}

/// Query for listing a user's reviews.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserReviewQuery {
    pub user_id: Option<String>,
}

/// A user with its team name.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl From<UserWithTeam> for UserResponse {
    fn from(view: UserWithTeam) -> Self {
        Self {
            user_id: view.user.id,
            username: view.user.username,
            team_name: view.team_name,
            is_active: view.user.is_active,
        }
    }
}

/// Pull request summary without reviewers or timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequestShortResponse {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
}

impl From<PullRequest> for PullRequestShortResponse {
    fn from(pr: PullRequest) -> Self {
        let status = pr.status_enum();
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserReviewsResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShortResponse>,
}

impl From<UserReviews> for UserReviewsResponse {
    fn from(reviews: UserReviews) -> Self {
        Self {
            user_id: reviews.user_id,
            pull_requests: reviews
                .pull_requests
                .into_iter()
                .map(PullRequestShortResponse::from)
                .collect(),
        }
    }
}

/// Set whether a user can be assigned reviews.
pub async fn set_is_active(
    pool: &DbPool,
    request: SetIsActiveRequest,
) -> Result<UserResponse, AppError> {
    validate_id(&request.user_id, "user_id")?;
    let is_active = require(request.is_active, "is_active")?;

    let view = users::set_active(pool, &request.user_id, is_active).await?;
    Ok(view.into())
}

/// List the pull requests a user reviews.
pub async fn get_review(
    pool: &DbPool,
    query: UserReviewQuery,
) -> Result<UserReviewsResponse, AppError> {
    let user_id = query.user_id.unwrap_or_default();
    validate_id(&user_id, "user_id")?;

    let reviews = users::get_reviews(pool, &user_id).await?;
    Ok(reviews.into())
}
