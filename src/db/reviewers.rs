//! Database queries for pull request reviewer links.

use sqlx::SqliteConnection;

use super::StoreError;

/// Link a reviewer to a pull request.
///
/// Fails with `StoreError::AlreadyExists` if the user already reviews it.
pub async fn save(
    conn: &mut SqliteConnection,
    pull_request_id: &str,
    user_id: &str,
) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO pull_request_reviewers (pull_request_id, user_id) VALUES (?, ?)")
        .bind(pull_request_id)
        .bind(user_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// Get the current reviewer IDs of a pull request, in assignment order.
pub async fn get_user_ids_for_pr(
    conn: &mut SqliteConnection,
    pull_request_id: &str,
) -> Result<Vec<String>, StoreError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT user_id FROM pull_request_reviewers WHERE pull_request_id = ? ORDER BY rowid",
    )
    .bind(pull_request_id)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Remove a reviewer link.
///
/// Returns `false` if the user was not assigned.
pub async fn delete_by_pr_and_user(
    conn: &mut SqliteConnection,
    pull_request_id: &str,
    user_id: &str,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        "DELETE FROM pull_request_reviewers WHERE pull_request_id = ? AND user_id = ?",
    )
    .bind(pull_request_id)
    .bind(user_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}
