//! Leaderboard ranking.
//!
//! Rows come from the hosted `public_leaderboard` view. Ranking is computed
//! here so ordering rules stay independent of the backing store.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Fallback name for rows with no username, email or id.
pub const ANONYMOUS: &str = "Anonymous";

/// One row of the aggregated leaderboard view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    /// Profile id.
    pub id: Option<String>,
    /// Public handle.
    pub username: Option<String>,
    /// Sign-in address.
    pub email: Option<String>,
    /// Easy solve time.
    pub time_easy_ms: Option<u64>,
    /// Medium solve time.
    pub time_medium_ms: Option<u64>,
    /// Hard solve time.
    pub time_hard_ms: Option<u64>,
    /// Sum of all three times; null until every tier is solved.
    pub total_time_ms: Option<u64>,
}

impl LeaderboardRow {
    /// Number of tiers with a recorded time.
    pub fn solved_count(&self) -> u8 {
        [self.time_easy_ms, self.time_medium_ms, self.time_hard_ms]
            .into_iter()
            .map(|time| u8::from(time.is_some()))
            .sum()
    }

    /// Name shown on the board: username, then email, then id.
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.email.as_deref())
            .or(self.id.as_deref())
            .unwrap_or(ANONYMOUS)
    }
}

/// Ranked leaderboard entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// One-based position.
    pub rank: usize,
    /// Display name.
    pub username: String,
    /// Tiers solved.
    pub solved: u8,
    /// Total time, once all tiers are solved.
    pub total_time_ms: Option<u64>,
}

fn compare_totals(left: Option<u64>, right: Option<u64>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => l.cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Case-insensitive name order; names equal apart from case fall back to
/// their bytes so the ranking stays total.
fn compare_names(left: &str, right: &str) -> Ordering {
    left.chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase))
        .then_with(|| left.cmp(right))
}

/// Rank rows for display.
///
/// Rows sort by solved count descending, then total time ascending with null
/// totals last, then display name ascending. The sort is stable.
///
/// # Examples
/// ```
/// use coderush::domain::{rank_rows, LeaderboardRow};
///
/// let rows = vec![
///     LeaderboardRow { username: Some("slow".into()), time_easy_ms: Some(9), ..Default::default() },
///     LeaderboardRow {
///         username: Some("fast".into()),
///         time_easy_ms: Some(1),
///         time_medium_ms: Some(1),
///         ..Default::default()
///     },
/// ];
/// let ranked = rank_rows(rows);
/// assert_eq!(ranked[0].username, "fast");
/// assert_eq!(ranked[1].rank, 2);
/// ```
pub fn rank_rows(rows: Vec<LeaderboardRow>) -> Vec<LeaderboardEntry> {
    let mut keyed: Vec<(u8, Option<u64>, String)> = rows
        .into_iter()
        .map(|row| {
            (
                row.solved_count(),
                row.total_time_ms,
                row.display_name().to_owned(),
            )
        })
        .collect();

    keyed.sort_by(|(l_solved, l_total, l_name), (r_solved, r_total, r_name)| {
        r_solved
            .cmp(l_solved)
            .then_with(|| compare_totals(*l_total, *r_total))
            .then_with(|| compare_names(l_name, r_name))
    });

    keyed
        .into_iter()
        .enumerate()
        .map(|(index, (solved, total_time_ms, username))| LeaderboardEntry {
            rank: index + 1,
            username,
            solved,
            total_time_ms,
        })
        .collect()
}
