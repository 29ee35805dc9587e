//! Driven port for reading the aggregated leaderboard view.

use async_trait::async_trait;

use crate::domain::LeaderboardRow;

use super::define_port_error;

define_port_error! {
    /// Errors raised while reading leaderboard rows.
    pub enum LeaderboardSourceError {
        /// Source could not be reached.
        Connection { message: String } =>
            "leaderboard source connection failed: {message}",
        /// Query failed or returned an unreadable payload.
        Query { message: String } =>
            "leaderboard source query failed: {message}",
        /// No leaderboard source is configured.
        Unconfigured => "leaderboard source is not configured",
    }
}

/// Port for fetching unranked leaderboard rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    /// Fetch every row of the view, in any order.
    async fn fetch_rows(&self) -> Result<Vec<LeaderboardRow>, LeaderboardSourceError>;
}

/// Fixture source returning an empty board.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLeaderboardSource;

#[async_trait]
impl LeaderboardSource for FixtureLeaderboardSource {
    async fn fetch_rows(&self) -> Result<Vec<LeaderboardRow>, LeaderboardSourceError> {
        Ok(Vec::new())
    }
}
