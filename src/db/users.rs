//! Database queries for users.

use sqlx::SqliteConnection;

use super::StoreError;
use crate::models::{NewUser, User};

const USER_COLUMNS: &str = "id, username, is_active, team_id, assign_count";

/// Insert a user.
///
/// Fails with `StoreError::AlreadyExists` if the ID is taken.
pub async fn save(conn: &mut SqliteConnection, user: &NewUser) -> Result<User, StoreError> {
    let sql = format!(
        "INSERT INTO users (id, username, is_active, team_id) VALUES (?, ?, ?, ?) RETURNING {}",
        USER_COLUMNS
    );

    let created = sqlx::query_as::<_, User>(&sql)
        .bind(&user.id)
        .bind(&user.username)
        .bind(user.is_active)
        .bind(&user.team_id)
        .fetch_one(conn)
        .await?;

    Ok(created)
}

/// Get a user by ID.
pub async fn get_by_id(conn: &mut SqliteConnection, id: &str) -> Result<User, StoreError> {
    let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);

    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_one(conn)
        .await?;

    Ok(user)
}

/// Get every member of a team, in the order they were created.
pub async fn get_by_team_id(
    conn: &mut SqliteConnection,
    team_id: &str,
) -> Result<Vec<User>, StoreError> {
    let sql = format!(
        "SELECT {} FROM users WHERE team_id = ? ORDER BY rowid",
        USER_COLUMNS
    );

    let users = sqlx::query_as::<_, User>(&sql)
        .bind(team_id)
        .fetch_all(conn)
        .await?;

    Ok(users)
}

/// Update a user's mutable fields (display name and active flag).
///
/// Team membership and the assignment counter are not touched here.
pub async fn update(conn: &mut SqliteConnection, user: &User) -> Result<User, StoreError> {
    let sql = format!(
        "UPDATE users SET username = ?, is_active = ? WHERE id = ? RETURNING {}",
        USER_COLUMNS
    );

    let updated = sqlx::query_as::<_, User>(&sql)
        .bind(&user.username)
        .bind(user.is_active)
        .bind(&user.id)
        .fetch_one(conn)
        .await?;

    Ok(updated)
}

/// Get all users.
pub async fn get_all(conn: &mut SqliteConnection) -> Result<Vec<User>, StoreError> {
    let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);

    let users = sqlx::query_as::<_, User>(&sql).fetch_all(conn).await?;

    Ok(users)
}

/// Add one completed review to a user's counter.
///
/// The increment happens inside the UPDATE statement, so concurrent merges
/// never lose an update.
pub async fn increment_assign_count(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<User, StoreError> {
    let sql = format!(
        "UPDATE users SET assign_count = assign_count + 1 WHERE id = ? RETURNING {}",
        USER_COLUMNS
    );

    let updated = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_one(conn)
        .await?;

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;
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

        pool
    }

    fn new_user(id: &str, is_active: bool) -> NewUser {
        NewUser {
            id: id.to_string(),
            username: format!("user {}", id),
            is_active,
            team_id: "t1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_user() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        let user = save(&mut conn, &new_user("u1", true)).await.unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.team_id, "t1");
        assert!(user.is_active);
        assert_eq!(user.assign_count, 0);

        let err = save(&mut conn, &new_user("u1", false)).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_get_by_team_id_keeps_creation_order() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        for id in ["u3", "u1", "u2"] {
            save(&mut conn, &new_user(id, true)).await.unwrap();
        }

        let members = get_by_team_id(&mut conn, "t1").await.unwrap();
        let ids: Vec<&str> = members.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u3", "u1", "u2"]);
    }

    #[tokio::test]
    async fn test_update_active_flag() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        let mut user = save(&mut conn, &new_user("u1", true)).await.unwrap();
        user.is_active = false;

        let updated = update(&mut conn, &user).await.unwrap();
        assert!(!updated.is_active);
        assert!(!get_by_id(&mut conn, "u1").await.unwrap().is_active);
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        let ghost = User {
            id: "ghost".to_string(),
            username: "Ghost".to_string(),
            is_active: true,
            team_id: "t1".to_string(),
            assign_count: 0,
        };
        assert!(matches!(
            update(&mut conn, &ghost).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_increment_assign_count() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        save(&mut conn, &new_user("u1", true)).await.unwrap();
        increment_assign_count(&mut conn, "u1").await.unwrap();
        let user = increment_assign_count(&mut conn, "u1").await.unwrap();
        assert_eq!(user.assign_count, 2);

        assert!(matches!(
            increment_assign_count(&mut conn, "ghost").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_get_all() {
        let pool = setup_test_db().await;
        let mut conn = pool.acquire().await.unwrap();

        save(&mut conn, &new_user("u2", true)).await.unwrap();
        save(&mut conn, &new_user("u1", false)).await.unwrap();

        let users = get_all(&mut conn).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, "u1");
    }
}
