//! Database queries for pull requests.

use sqlx::SqliteConnection;

use super::StoreError;
use crate::models::{NewPullRequest, PullRequest};

const PR_COLUMNS: &str = "id, name, author_id, status, created_at, merged_at";

/// Insert an open pull request.
///
/// Fails with `StoreError::AlreadyExists` if the ID is taken.
pub async fn save(
    conn: &mut SqliteConnection,
    pr: &NewPullRequest,
) -> Result<PullRequest, StoreError> {
    let sql = format!(
        "INSERT INTO pull_requests (id, name, author_id, status, created_at) \
         VALUES (?, ?, ?, 'OPEN', ?) RETURNING {}",
        PR_COLUMNS
    );

    let created = sqlx::query_as::<_, PullRequest>(&sql)
        .bind(&pr.id)
        .bind(&pr.name)
        .bind(&pr.author_id)
        .bind(pr.created_at)
        .fetch_one(conn)
        .await?;

    Ok(created)
}

/// Get a pull request by ID.
pub async fn get_by_id(conn: &mut SqliteConnection, id: &str) -> Result<PullRequest, StoreError> {
    let sql = format!("SELECT {} FROM pull_requests WHERE id = ?", PR_COLUMNS);

    let pr = sqlx::query_as::<_, PullRequest>(&sql)
        .bind(id)
        .fetch_one(conn)
        .await?;

    Ok(pr)
}

/// Persist a pull request's name, status and merge time.
pub async fn update(
    conn: &mut SqliteConnection,
    pr: &PullRequest,
) -> Result<PullRequest, StoreError> {
    let sql = format!(
        "UPDATE pull_requests SET name = ?, status = ?, merged_at = ? WHERE id = ? RETURNING {}",
        PR_COLUMNS
    );

    let updated = sqlx::query_as::<_, PullRequest>(&sql)
        .bind(&pr.name)
        .bind(&pr.status)
        .bind(pr.merged_at)
        .bind(&pr.id)
        .fetch_one(conn)
        .await?;

    Ok(updated)
}

/// Get every pull request the user currently reviews, oldest first.
pub async fn get_by_reviewer(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Vec<PullRequest>, StoreError> {
    let prs = sqlx::query_as::<_, PullRequest>(
        r#"
        SELECT p.id, p.name, p.author_id, p.status, p.created_at, p.merged_at
        FROM pull_requests p
        JOIN pull_request_reviewers r ON r.pull_request_id = p.id
        WHERE r.user_id = ?
        ORDER BY p.created_at, p.id
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;

    Ok(prs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;
    use crate::models::PullRequestStatus;
    use tempfile::tempdir;

    async fn setup_test_db() -> DbPool {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        std::mem::forget(dir);

        let pool = crate::db::initialize(&db_path).await.unwrap();

        sqlx::query("INSERT INTO teams (id, name) VALUES ('t1', 'backend')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO users (id, username, is_active, team_id) VALUES ('u1', 'Alice', 1, 't1'), ('u2', 'Bob', 1, 't1')",
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    fn new_pr(id: &str, created_at: i64) -> NewPullRequest {
        NewPullRequest {
            id: id.to_string(),
            name: format!("Change {}", id),
            author_id: "u1".to_string(),
            created_at,
        }
    }

    #[tokio::test]
    async fn test_save_pull_request() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        let pr = save(&mut conn, &new_pr("pr-1", 1_700_000_000)).await.unwrap();
        assert_eq!(pr.status_enum(), PullRequestStatus::Open);
        assert_eq!(pr.created_at, 1_700_000_000);
        assert!(pr.merged_at.is_none());

        let err = save(&mut conn, &new_pr("pr-1", 1_700_000_001))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_save_requires_existing_author() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        let mut pr = new_pr("pr-1", 0);
        pr.author_id = "ghost".to_string();

        let err = save(&mut conn, &pr).await.unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }

    #[tokio::test]
    async fn test_update_status() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        let mut pr = save(&mut conn, &new_pr("pr-1", 10)).await.unwrap();
        pr.status = PullRequestStatus::Merged.to_string();
        pr.merged_at = Some(20);

        let updated = update(&mut conn, &pr).await.unwrap();
        assert!(updated.is_merged());
        assert_eq!(updated.merged_at, Some(20));
        assert_eq!(get_by_id(&mut conn, "pr-1").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_get_by_reviewer_orders_by_creation() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        save(&mut conn, &new_pr("pr-b", 20)).await.unwrap();
        save(&mut conn, &new_pr("pr-a", 20)).await.unwrap();
        save(&mut conn, &new_pr("pr-c", 10)).await.unwrap();
        save(&mut conn, &new_pr("pr-unreviewed", 5)).await.unwrap();

        for id in ["pr-b", "pr-a", "pr-c"] {
            crate::db::reviewers::save(&mut conn, id, "u2").await.unwrap();
        }

        let prs = get_by_reviewer(&mut conn, "u2").await.unwrap();
        let ids: Vec<&str> = prs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["pr-c", "pr-a", "pr-b"]);

        assert!(get_by_reviewer(&mut conn, "u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_pull_request() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        assert!(matches!(
            get_by_id(&mut conn, "pr-404").await,
            Err(StoreError::NotFound)
        ));
    }
}
