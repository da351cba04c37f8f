//! Statistics commands.

use crate::db::pool::DbPool;
use crate::error::AppError;
use crate::models::UserStatistic;
use crate::services::statistics;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct UserStatisticResponse {
    pub user_id: String,
    pub assign_count: i64,
}

impl From<UserStatistic> for UserStatisticResponse {
    fn from(stat: UserStatistic) -> Self {
        Self {
            user_id: stat.user_id,
            assign_count: stat.assign_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatisticsResponse {
    pub user_statistics: Vec<UserStatisticResponse>,
}

/// Users ranked by completed reviews.
pub async fn user_statistics(pool: &DbPool) -> Result<StatisticsResponse, AppError> {
    let stats = statistics::user_statistics(pool).await?;

    Ok(StatisticsResponse {
        user_statistics: stats.into_iter().map(UserStatisticResponse::from).collect(),
    })
}
