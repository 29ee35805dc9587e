//! Driving ports for reading and recording solve progress.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, Tier, TierDurations, UserId};

/// Use-case port for recording a solved tier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressCommand: Send + Sync {
    /// Store `duration_ms` for `tier`, keeping the other tiers' durations.
    async fn record_solve(
        &self,
        user_id: &UserId,
        token: &AccessToken,
        tier: Tier,
        duration_ms: u64,
    ) -> Result<TierDurations, Error>;
}

/// Use-case port for reading recorded progress.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressQuery: Send + Sync {
    /// Durations recorded for the player; all empty when nothing is stored.
    async fn durations(&self, user_id: &UserId, token: &AccessToken)
    -> Result<TierDurations, Error>;
}
