//! Leaderboard standings service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{LeaderboardSource, LeaderboardSourceError, StandingsQuery};
use crate::domain::{BACKEND_UNCONFIGURED, Error, LeaderboardEntry, rank_rows};

/// Standings service implementing [`StandingsQuery`].
#[derive(Clone)]
pub struct StandingsService<L> {
    source: Arc<L>,
}

impl<L> StandingsService<L> {
    /// Create a new service over the leaderboard source.
    pub fn new(source: Arc<L>) -> Self {
        Self { source }
    }
}

fn map_source_error(error: LeaderboardSourceError) -> Error {
    warn!(error_kind = error.kind(), %error, "leaderboard source failed");
    match error {
        LeaderboardSourceError::Unconfigured => Error::service_unavailable(BACKEND_UNCONFIGURED),
        other => Error::service_unavailable(format!("leaderboard unavailable: {other}")),
    }
}

#[async_trait]
impl<L> StandingsQuery for StandingsService<L>
where
    L: LeaderboardSource,
{
    async fn standings(&self) -> Result<Vec<LeaderboardEntry>, Error> {
        let rows = self.source.fetch_rows().await.map_err(map_source_error)?;
        Ok(rank_rows(rows))
    }
}
