//! Database queries for teams.

use sqlx::SqliteConnection;
use uuid::Uuid;

use super::StoreError;
use crate::models::Team;

/// Insert a team with a fresh ID.
///
/// Fails with `StoreError::AlreadyExists` if the name is taken.
pub async fn save(conn: &mut SqliteConnection, name: &str) -> Result<Team, StoreError> {
    let id = Uuid::new_v4().to_string();

    let team = sqlx::query_as::<_, Team>(
        "INSERT INTO teams (id, name) VALUES (?, ?) RETURNING id, name",
    )
    .bind(&id)
    .bind(name)
    .fetch_one(conn)
    .await?;

    Ok(team)
}

/// Get a team by its unique name.
pub async fn get_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Team, StoreError> {
    let team = sqlx::query_as::<_, Team>("SELECT id, name FROM teams WHERE name = ?")
        .bind(name)
        .fetch_one(conn)
        .await?;

    Ok(team)
}

/// Get a team by ID.
pub async fn get_by_id(conn: &mut SqliteConnection, id: &str) -> Result<Team, StoreError> {
    let team = sqlx::query_as::<_, Team>("SELECT id, name FROM teams WHERE id = ?")
        .bind(id)
        .fetch_one(conn)
        .await?;

    Ok(team)
}
