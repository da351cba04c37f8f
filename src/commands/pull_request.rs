//! Pull request commands.

use super::{format_timestamp, validate_id, validate_non_empty};
use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::{PullRequestStatus, PullRequestWithReviewers};
use crate::services::pull_requests;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePullRequestRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

impl CreatePullRequestRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_id(&self.pull_request_id, "pull_request_id")?;
        validate_non_empty(&self.pull_request_name, "pull_request_name")?;
        validate_id(&self.author_id, "author_id")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MergePullRequestRequest {
    pub pull_request_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReassignPullRequestRequest {
    pub pull_request_id: String,
    #[serde(alias = "old_user_id")]
    pub old_reviewer_id: String,
}

impl ReassignPullRequestRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_id(&self.pull_request_id, "pull_request_id")?;
        validate_id(&self.old_reviewer_id, "old_reviewer_id")
    }
}

/// Full pull request as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequestResponse {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PullRequestStatus,
    /// RFC 3339
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<String>,
    pub assigned_reviewers: Vec<String>,
}

impl From<PullRequestWithReviewers> for PullRequestResponse {
    fn from(value: PullRequestWithReviewers) -> Self {
        let pr = value.pull_request;
        let status = pr.status_enum();
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status,
            created_at: format_timestamp(pr.created_at),
            merged_at: pr.merged_at.map(format_timestamp),
            assigned_reviewers: value.reviewers,
        }
    }
}

/// `{"pr": ...}` envelope used by create and merge.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequestEnvelope {
    pub pr: PullRequestResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReassignResponse {
    pub pr: PullRequestResponse,
    pub replaced_by: String,
}

/// Create a pull request and assign its reviewers.
pub async fn create_pull_request(
    pool: &DbPool,
    request: CreatePullRequestRequest,
) -> Result<PullRequestEnvelope, AppError> {
    request.validate()?;

    let created = pull_requests::create_pull_request(
        pool,
        &request.pull_request_id,
        &request.pull_request_name,
        &request.author_id,
    )
    .await?;

    Ok(PullRequestEnvelope { pr: created.into() })
}

/// Merge a pull request. Safe to repeat.
pub async fn merge_pull_request(
    pool: &DbPool,
    request: MergePullRequestRequest,
) -> Result<PullRequestEnvelope, AppError> {
    validate_id(&request.pull_request_id, "pull_request_id")?;

    let merged = pull_requests::merge_pull_request(pool, &request.pull_request_id).await?;

    Ok(PullRequestEnvelope { pr: merged.into() })
}

/// Replace a reviewer on an open pull request.
pub async fn reassign_pull_request(
    pool: &DbPool,
    request: ReassignPullRequestRequest,
) -> Result<ReassignResponse, AppError> {
    request.validate()?;

    let outcome = pull_requests::reassign_reviewer(
        pool,
        &request.pull_request_id,
        &request.old_reviewer_id,
    )
    .await?;

    Ok(ReassignResponse {
        pr: outcome.pull_request.into(),
        replaced_by: outcome.replaced_by,
    })
}
