//! Team commands.

use super::{require, validate_id, validate_non_empty};
use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::{NewTeamMember, TeamWithMembers, User};
use crate::services::teams;
use serde::{Deserialize, Serialize};

/// One member in a team creation request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TeamMemberRequest {
    pub user_id: String,
    pub username: String,
    pub is_active: Option<bool>,
}

/// Request body for creating a team.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddTeamRequest {
    pub team_name: String,
    pub members: Vec<TeamMemberRequest>,
}

impl AddTeamRequest {
    /// Validate the request and convert members into service input.
    pub fn validate(&self) -> Result<Vec<NewTeamMember>, AppError> {
        validate_id(&self.team_name, "team_name")?;

        self.members
            .iter()
            .map(|m| -> Result<NewTeamMember, AppError> {
                validate_id(&m.user_id, "user_id")?;
                validate_non_empty(&m.username, "username")?;
                Ok(NewTeamMember {
                    user_id: m.user_id.clone(),
                    username: m.username.clone(),
                    is_active: require(m.is_active, "is_active")?,
                })
            })
            .collect()
    }
}

/// Query for looking up a team.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamQuery {
    #[serde(alias = "name")]
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamMemberResponse {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

impl From<User> for TeamMemberResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            is_active: user.is_active,
        }
    }
}

/// A team and its members as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct TeamResponse {
    pub team_name: String,
    pub members: Vec<TeamMemberResponse>,
}

impl From<TeamWithMembers> for TeamResponse {
    fn from(team: TeamWithMembers) -> Self {
        Self {
            team_name: team.team.name,
            members: team.members.into_iter().map(TeamMemberResponse::from).collect(),
        }
    }
}

/// Create a team with its members.
pub async fn add_team(pool: &DbPool, request: AddTeamRequest) -> Result<TeamResponse, AppError> {
    let members = request.validate()?;
    let team = teams::create_team(pool, &request.team_name, &members).await?;
    Ok(team.into())
}

/// Get a team by name.
pub async fn get_team(pool: &DbPool, query: TeamQuery) -> Result<TeamResponse, AppError> {
    let name = query.team_name.unwrap_or_default();
    validate_id(&name, "team_name")?;

    let team = teams::get_team(pool, &name).await?;
    Ok(team.into())
}
