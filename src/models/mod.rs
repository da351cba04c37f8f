//! Data models for the application.
//!
//! These models represent the core entities stored in the SQLite database
//! and the composite views the services return to the dispatcher.
//!
//! Row models derive FromRow for SQLx database queries.

pub mod pull_request;
pub mod team;
pub mod user;

// Re-exports for convenient access
pub use pull_request::{
    NewPullRequest, PullRequest, PullRequestStatus, PullRequestWithReviewers, ReassignOutcome,
};
pub use team::{NewTeamMember, Team, TeamWithMembers};
pub use user::{NewUser, User, UserReviews, UserStatistic, UserWithTeam};
