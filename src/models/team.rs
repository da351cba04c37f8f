//! Team model.

use serde::Serialize;
use sqlx::FromRow;

use super::User;

/// A fixed group of users; reviewers are always drawn from the author's team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Team {
    /// Opaque team ID (UUID v4 string).
    pub id: String,

    /// Unique display name.
    pub name: String,
}

/// One member of a team being created.
///
/// The team reference is filled in once the team row exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeamMember {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

/// A team together with its members, in creation order.
#[derive(Debug, Clone)]
pub struct TeamWithMembers {
    pub team: Team,
    pub members: Vec<User>,
}
