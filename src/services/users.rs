//! User activity flag and review assignments.

use super::store_failure;
use crate::db::pool::DbPool;
use crate::db::{self, pull_requests, teams, users, StoreError};
use crate::error::AppError;
use crate::models::{UserReviews, UserWithTeam};

/// Set whether a user can be picked as a reviewer.
///
/// The row is only written when the flag actually changes. Existing
/// assignments are left in place.
///
/// # Errors
/// * `NotFound` if the user does not exist
pub async fn set_active(
    pool: &DbPool,
    user_id: &str,
    is_active: bool,
) -> Result<UserWithTeam, AppError> {
    let mut tx = db::begin_write(pool).await?;

    let mut user = users::get_by_id(&mut *tx, user_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::not_found("User", user_id),
            other => store_failure("set_active")(other),
        })?;

    if user.is_active != is_active {
        user.is_active = is_active;
        user = users::update(&mut *tx, &user)
            .await
            .map_err(store_failure("set_active"))?;
        log::info!("User {} is_active set to {}", user.id, is_active);
    }

    let team = teams::get_by_id(&mut *tx, &user.team_id)
        .await
        .map_err(store_failure("set_active"))?;

    tx.commit().await?;

    Ok(UserWithTeam {
        user,
        team_name: team.name,
    })
}

/// List the pull requests a user currently reviews, open or merged.
///
/// # Errors
/// * `NotFound` if the user does not exist
pub async fn get_reviews(pool: &DbPool, user_id: &str) -> Result<UserReviews, AppError> {
    let mut conn = pool.acquire().await?;

    users::get_by_id(&mut conn, user_id)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::not_found("User", user_id),
            other => store_failure("get_reviews")(other),
        })?;

    let pull_requests = pull_requests::get_by_reviewer(&mut conn, user_id)
        .await
        .map_err(store_failure("get_reviews"))?;

    Ok(UserReviews {
        user_id: user_id.to_string(),
        pull_requests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTeamMember;
    use crate::services::pull_requests::{create_pull_request, merge_pull_request};
    use crate::services::teams::create_team;
    use tempfile::tempdir;

    async fn setup_test_db() -> DbPool {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        std::mem::forget(dir);

        let pool = crate::db::initialize(&db_path).await.unwrap();

        let members: Vec<NewTeamMember> = ["u1", "u2", "u3"]
            .iter()
            .map(|id| NewTeamMember {
                user_id: id.to_string(),
                username: id.to_uppercase(),
                is_active: true,
            })
            .collect();
        create_team(&pool, "backend", &members).await.unwrap();

        pool
    }

    #[tokio::test]
    async fn test_set_active_returns_team_name() {
        let pool = setup_test_db().await;

        let view = set_active(&pool, "u2", false).await.unwrap();
        assert!(!view.user.is_active);
        assert_eq!(view.team_name, "backend");

        // Same value again is a no-op but still succeeds
        let view = set_active(&pool, "u2", false).await.unwrap();
        assert!(!view.user.is_active);

        let view = set_active(&pool, "u2", true).await.unwrap();
        assert!(view.user.is_active);
    }

    #[tokio::test]
    async fn test_set_active_unknown_user() {
        let pool = setup_test_db().await;

        let err = set_active(&pool, "ghost", true).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_inactive_user_is_not_picked() {
        let pool = setup_test_db().await;
        set_active(&pool, "u2", false).await.unwrap();

        let created = create_pull_request(&pool, "pr-1", "Add search", "u1")
            .await
            .unwrap();
        assert_eq!(created.reviewers, vec!["u3"]);
    }

    #[tokio::test]
    async fn test_get_reviews_includes_merged() {
        let pool = setup_test_db().await;

        create_pull_request(&pool, "pr-1", "Add search", "u1")
            .await
            .unwrap();
        create_pull_request(&pool, "pr-2", "Fix search", "u1")
            .await
            .unwrap();
        merge_pull_request(&pool, "pr-1").await.unwrap();

        let reviews = get_reviews(&pool, "u2").await.unwrap();
        assert_eq!(reviews.user_id, "u2");
        let ids: Vec<&str> = reviews.pull_requests.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["pr-1", "pr-2"]);
        assert!(reviews.pull_requests[0].is_merged());

        assert!(get_reviews(&pool, "u1").await.unwrap().pull_requests.is_empty());
    }

    #[tokio::test]
    async fn test_get_reviews_unknown_user() {
        let pool = setup_test_db().await;

        let err = get_reviews(&pool, "ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
