//! Team creation and lookup.

use super::store_failure;
use crate::db::pool::DbPool;
use crate::db::{self, teams, users, StoreError};
use crate::error::AppError;
use crate::models::{NewTeamMember, NewUser, TeamWithMembers};

/// Create a team together with its members.
///
/// Either the team and every member are stored, or nothing is.
///
/// # Errors
/// * `TeamExists` if the name is taken
/// * `UserExists` if any member ID is taken
pub async fn create_team(
    pool: &DbPool,
    name: &str,
    members: &[NewTeamMember],
) -> Result<TeamWithMembers, AppError> {
    let mut tx = db::begin_write(pool).await?;

    let team = teams::save(&mut *tx, name).await.map_err(|e| match e {
        StoreError::AlreadyExists => AppError::team_exists(name),
        other => store_failure("create_team")(other),
    })?;

    let mut created = Vec::with_capacity(members.len());
    for member in members {
        let new_user = NewUser {
            id: member.user_id.clone(),
            username: member.username.clone(),
            is_active: member.is_active,
            team_id: team.id.clone(),
        };

        let user = users::save(&mut *tx, &new_user)
            .await
            .map_err(|e| match e {
                StoreError::AlreadyExists => AppError::user_exists(&member.user_id),
                other => store_failure("create_team")(other),
            })?;
        created.push(user);
    }

    tx.commit().await?;

    log::info!("Created team {} with {} members", team.name, created.len());

    Ok(TeamWithMembers {
        team,
        members: created,
    })
}

/// Get a team and its members by team name.
///
/// # Errors
/// * `NotFound` if no team has this name
pub async fn get_team(pool: &DbPool, name: &str) -> Result<TeamWithMembers, AppError> {
    let mut conn = pool.acquire().await?;

    let team = teams::get_by_name(&mut conn, name)
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::not_found("Team", name),
            other => store_failure("get_team")(other),
        })?;

    let members = users::get_by_team_id(&mut conn, &team.id)
        .await
        .map_err(store_failure("get_team"))?;

    Ok(TeamWithMembers { team, members })
}
