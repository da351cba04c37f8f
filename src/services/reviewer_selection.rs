//! Reviewer selection.
//!
//! Picks the least-loaded active teammates for a pull request. Pure and
//! deterministic: the same member snapshot always yields the same choice.

use crate::models::User;

/// Maximum number of reviewers a pull request can hold.
pub const MAX_REVIEWERS_PER_PR: usize = 2;

/// Choose up to [`MAX_REVIEWERS_PER_PR`] reviewers from `members`.
///
/// Inactive users and any ID in `excluded` are skipped. The remaining
/// candidates are ordered by assignment counter, then by user ID. An empty
/// result is a valid outcome.
pub fn choose_reviewers(members: &[User], excluded: &[&str]) -> Vec<String> {
    let mut candidates: Vec<&User> = members
        .iter()
        .filter(|u| u.is_active && !excluded.contains(&u.id.as_str()))
        .collect();

    candidates.sort_by(|a, b| {
        a.assign_count
            .cmp(&b.assign_count)
            .then_with(|| a.id.cmp(&b.id))
    });

    candidates
        .into_iter()
        .take(MAX_REVIEWERS_PER_PR)
        .map(|u| u.id.clone())
        .collect()
}
