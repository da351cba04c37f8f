//! Review workload statistics.

use super::store_failure;
use crate::db::pool::DbPool;
use crate::db::users;
use crate::error::AppError;
use crate::models::UserStatistic;

/// Every user's completed-review count, busiest first.
///
/// Users with equal counts are ordered by ID.
pub async fn user_statistics(pool: &DbPool) -> Result<Vec<UserStatistic>, AppError> {
    let mut conn = pool.acquire().await?;

    let mut all = users::get_all(&mut conn)
        .await
        .map_err(store_failure("user_statistics"))?;

    all.sort_by(|a, b| {
        b.assign_count
            .cmp(&a.assign_count)
            .then_with(|| a.id.cmp(&b.id))
    });

    Ok(all.iter().map(UserStatistic::from).collect())
}
