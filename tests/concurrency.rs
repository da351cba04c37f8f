//! Concurrent request tests.
//!
//! Several requests race against the same rows through the shared pool.
//! Write transactions start with BEGIN IMMEDIATE, so exactly one racer wins
//! wherever the outcome must be unique.

use futures::future::join_all;
use review_assign_lib::db::pool::DbPool;
use review_assign_lib::error::AppError;
use review_assign_lib::models::NewTeamMember;
use review_assign_lib::services::{pull_requests, teams};
use tempfile::tempdir;

async fn setup_test_db() -> DbPool {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    std::mem::forget(dir);

    review_assign_lib::db::initialize(&db_path).await.unwrap()
}

fn members(ids: &[&str]) -> Vec<NewTeamMember> {
    ids.iter()
        .map(|id| NewTeamMember {
            user_id: id.to_string(),
            username: id.to_uppercase(),
            is_active: true,
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reassign_of_same_reviewer() {
    let pool = setup_test_db().await;
    teams::create_team(&pool, "backend", &members(&["a", "b", "c", "d", "e"]))
        .await
        .unwrap();
    pull_requests::create_pull_request(&pool, "p1", "Change", "a")
        .await
        .unwrap();

    let results = join_all((0..2).map(|_| {
        let pool = pool.clone();
        tokio::spawn(async move { pull_requests::reassign_reviewer(&pool, "p1", "b").await })
    }))
    .await;

    let outcomes: Vec<Result<_, AppError>> = results.into_iter().map(|r| r.unwrap()).collect();
    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    let not_assigned = outcomes
        .iter()
        .filter(|r| matches!(r, Err(AppError::NotAssigned { .. })))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(not_assigned, 1);

    let reviewers: Vec<String> = sqlx::query_scalar(
        "SELECT user_id FROM pull_request_reviewers WHERE pull_request_id = 'p1' ORDER BY user_id",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(reviewers, vec!["c", "d"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_create_with_same_id() {
    let pool = setup_test_db().await;
    teams::create_team(&pool, "backend", &members(&["a", "b", "c"]))
        .await
        .unwrap();

    let results = join_all((0..4).map(|i| {
        let pool = pool.clone();
        tokio::spawn(async move {
            pull_requests::create_pull_request(&pool, "p1", &format!("Attempt {}", i), "a").await
        })
    }))
    .await;

    let outcomes: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .filter(|r| r.is_err())
        .all(|r| matches!(r, Err(AppError::PrExists { .. }))));

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pull_request_reviewers")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(links, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_merges_credit_once() {
    let pool = setup_test_db().await;
    teams::create_team(&pool, "backend", &members(&["a", "b", "c"]))
        .await
        .unwrap();
    pull_requests::create_pull_request(&pool, "p1", "Change", "a")
        .await
        .unwrap();

    let results = join_all((0..5).map(|_| {
        let pool = pool.clone();
        tokio::spawn(async move { pull_requests::merge_pull_request(&pool, "p1").await })
    }))
    .await;
    for result in results {
        assert!(result.unwrap().unwrap().pull_request.is_merged());
    }

    let counts: Vec<(String, i64)> =
        sqlx::query_as("SELECT id, assign_count FROM users ORDER BY id")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(
        counts,
        vec![
            ("a".to_string(), 0),
            ("b".to_string(), 1),
            ("c".to_string(), 1)
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_team_creation_with_same_name() {
    let pool = setup_test_db().await;

    let results = join_all((0..3).map(|i| {
        let pool = pool.clone();
        tokio::spawn(async move {
            let user = format!("u{}", i);
            teams::create_team(&pool, "backend", &members(&[user.as_str()])).await
        })
    }))
    .await;

    let outcomes: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(users, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reassign_of_different_reviewers_keeps_cap() {
    let pool = setup_test_db().await;
    teams::create_team(&pool, "backend", &members(&["a", "b", "c", "d"]))
        .await
        .unwrap();
    let created = pull_requests::create_pull_request(&pool, "p1", "Change", "a")
        .await
        .unwrap();
    assert_eq!(created.reviewers, vec!["b", "c"]);

    let results = join_all(["b", "c"].into_iter().map(|old| {
        let pool = pool.clone();
        tokio::spawn(async move { pull_requests::reassign_reviewer(&pool, "p1", old).await })
    }))
    .await;

    // The first to commit takes d; the second takes the reviewer the first released
    let mut replacements: Vec<String> = Vec::new();
    for result in results {
        let outcome = result.unwrap().unwrap();
        assert!(outcome.pull_request.reviewers.len() <= 2);
        replacements.push(outcome.replaced_by);
    }
    assert_eq!(replacements.len(), 2);
    assert!(replacements.contains(&"d".to_string()));

    let mut reviewers: Vec<String> = sqlx::query_scalar(
        "SELECT user_id FROM pull_request_reviewers WHERE pull_request_id = 'p1'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(reviewers.len(), 2);
    reviewers.sort();
    reviewers.dedup();
    assert_eq!(reviewers.len(), 2);
    assert!(!reviewers.contains(&"a".to_string()));
    assert!(reviewers.contains(&"d".to_string()));
}
