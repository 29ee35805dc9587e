//! Driving port for the ranked leaderboard.

use async_trait::async_trait;

use crate::domain::{Error, LeaderboardEntry};

/// Use-case port returning ranked standings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StandingsQuery: Send + Sync {
    /// Every player, ranked.
    async fn standings(&self) -> Result<Vec<LeaderboardEntry>, Error>;
}
