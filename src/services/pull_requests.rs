//! Pull request lifecycle: create, merge and reassign.
//!
//! Each operation runs in a single write transaction. All precondition
//! checks read through that transaction, so concurrent requests against the
//! same pull request are serialized by SQLite and observe each other's
//! committed effects.

use super::reviewer_selection::{choose_reviewers, MAX_REVIEWERS_PER_PR};
use super::{now, store_failure};
use crate::db::pool::DbPool;
use crate::db::{self, pull_requests, reviewers, users, StoreError};
use crate::error::AppError;
use crate::models::{
    NewPullRequest, PullRequestStatus, PullRequestWithReviewers, ReassignOutcome,
};

/// Create an open pull request and assign up to two reviewers from the
/// author's team.
///
/// # Errors
/// * `NotFound` if the author does not exist
/// * `PrExists` if the pull request ID is taken
pub async fn create_pull_request(
    pool: &DbPool,
    pull_request_id: &str,
    name: &str,
    author_id: &str,
) -> Result<PullRequestWithReviewers, AppError> {
    let mut tx = db::begin_write(pool).await?;

    let author = users::get_by_id(&mut *tx, author_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::not_found("User", author_id),
            other => store_failure("create_pull_request")(other),
        })?;

    let new_pr = NewPullRequest {
        id: pull_request_id.to_string(),
        name: name.to_string(),
        author_id: author.id.clone(),
        created_at: now(),
    };
    let pull_request = pull_requests::save(&mut *tx, &new_pr)
        .await
        .map_err(|e| match e {
            StoreError::AlreadyExists => AppError::pr_exists(pull_request_id),
            other => store_failure("create_pull_request")(other),
        })?;

    let members = users::get_by_team_id(&mut *tx, &author.team_id)
        .await
        .map_err(store_failure("create_pull_request"))?;
    let chosen = choose_reviewers(&members, &[author.id.as_str()]);

    for reviewer_id in &chosen {
        reviewers::save(&mut *tx, &pull_request.id, reviewer_id)
            .await
            .map_err(store_failure("create_pull_request"))?;
    }

    tx.commit().await?;

    log::info!(
        "Created pull request {} by {} with reviewers {:?}",
        pull_request.id,
        author.id,
        chosen
    );

    Ok(PullRequestWithReviewers {
        pull_request,
        reviewers: chosen,
    })
}

/// Merge a pull request and credit each current reviewer with one review.
///
/// Merging an already merged pull request returns it unchanged.
///
/// # Errors
/// * `NotFound` if the pull request does not exist
pub async fn merge_pull_request(
    pool: &DbPool,
    pull_request_id: &str,
) -> Result<PullRequestWithReviewers, AppError> {
    let mut tx = db::begin_write(pool).await?;

    let mut pull_request = pull_requests::get_by_id(&mut *tx, pull_request_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::not_found("Pull request", pull_request_id),
            other => store_failure("merge_pull_request")(other),
        })?;

    let reviewer_ids = reviewers::get_user_ids_for_pr(&mut *tx, pull_request_id)
        .await
        .map_err(store_failure("merge_pull_request"))?;

    if pull_request.is_merged() {
        log::debug!("Pull request {} already merged", pull_request_id);
        return Ok(PullRequestWithReviewers {
            pull_request,
            reviewers: reviewer_ids,
        });
    }

    pull_request.status = PullRequestStatus::Merged.to_string();
    pull_request.merged_at = Some(now());
    let pull_request = pull_requests::update(&mut *tx, &pull_request)
        .await
        .map_err(store_failure("merge_pull_request"))?;

    for reviewer_id in &reviewer_ids {
        users::increment_assign_count(&mut *tx, reviewer_id)
            .await
            .map_err(store_failure("merge_pull_request"))?;
    }

    tx.commit().await?;

    log::info!(
        "Merged pull request {}, credited {:?}",
        pull_request.id,
        reviewer_ids
    );

    Ok(PullRequestWithReviewers {
        pull_request,
        reviewers: reviewer_ids,
    })
}

/// Replace one reviewer of an open pull request with another teammate.
///
/// The replacement is the least-loaded active member of the author's team
/// who is neither the author nor already reviewing the pull request.
///
/// # Errors
/// * `NotFound` if the pull request does not exist
/// * `PrMerged` if the pull request is merged
/// * `NotAssigned` if `old_reviewer_id` is not a current reviewer
/// * `NoCandidate` if nobody is eligible to take over
pub async fn reassign_reviewer(
    pool: &DbPool,
    pull_request_id: &str,
    old_reviewer_id: &str,
) -> Result<ReassignOutcome, AppError> {
    let mut tx = db::begin_write(pool).await?;

    let pull_request = pull_requests::get_by_id(&mut *tx, pull_request_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::not_found("Pull request", pull_request_id),
            other => store_failure("reassign_reviewer")(other),
        })?;

    if pull_request.is_merged() {
        return Err(AppError::pr_merged(pull_request_id));
    }

    let current = reviewers::get_user_ids_for_pr(&mut *tx, pull_request_id)
        .await
        .map_err(store_failure("reassign_reviewer"))?;

    if !current.iter().any(|id| id == old_reviewer_id) {
        return Err(AppError::not_assigned(pull_request_id, old_reviewer_id));
    }

    let author = users::get_by_id(&mut *tx, &pull_request.author_id)
        .await
        .map_err(store_failure("reassign_reviewer"))?;
    let members = users::get_by_team_id(&mut *tx, &author.team_id)
        .await
        .map_err(store_failure("reassign_reviewer"))?;

    let mut excluded: Vec<&str> = vec![author.id.as_str(), old_reviewer_id];
    excluded.extend(current.iter().map(String::as_str));

    let replacement = choose_reviewers(&members, &excluded)
        .into_iter()
        .next()
        .ok_or_else(|| AppError::no_candidate(pull_request_id))?;

    let removed = reviewers::delete_by_pr_and_user(&mut *tx, pull_request_id, old_reviewer_id)
        .await
        .map_err(store_failure("reassign_reviewer"))?;
    if !removed {
        return Err(AppError::not_assigned(pull_request_id, old_reviewer_id));
    }

    let remaining = reviewers::get_user_ids_for_pr(&mut *tx, pull_request_id)
        .await
        .map_err(store_failure("reassign_reviewer"))?;
    if remaining.len() >= MAX_REVIEWERS_PER_PR {
        return Err(AppError::internal(format!(
            "pull request {} already has {} reviewers",
            pull_request_id,
            remaining.len()
        )));
    }

    reviewers::save(&mut *tx, pull_request_id, &replacement)
        .await
        .map_err(store_failure("reassign_reviewer"))?;

    let reviewer_ids = reviewers::get_user_ids_for_pr(&mut *tx, pull_request_id)
        .await
        .map_err(store_failure("reassign_reviewer"))?;

    tx.commit().await?;

    log::info!(
        "Reassigned pull request {}: {} -> {}",
        pull_request_id,
        old_reviewer_id,
        replacement
    );

    Ok(ReassignOutcome {
        pull_request: PullRequestWithReviewers {
            pull_request,
            reviewers: reviewer_ids,
        },
        replaced_by: replacement,
    })
}
