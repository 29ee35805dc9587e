//! Leaderboard handler.
//!
//! ```text
//! GET /api/v1/leaderboard
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{LeaderboardEntry, format_elapsed};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// One ranked player.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StandingResponse {
    #[schema(example = 1)]
    pub rank: usize,
    #[schema(example = "ada")]
    pub username: String,
    /// Tiers solved, 0 to 3.
    #[schema(example = 3)]
    pub solved: u8,
    /// Null until every tier is solved.
    #[schema(example = 754_000)]
    pub total_time_ms: Option<u64>,
    #[schema(example = "12:34")]
    pub total_time: Option<String>,
}

impl From<LeaderboardEntry> for StandingResponse {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            rank: entry.rank,
            username: entry.username,
            solved: entry.solved,
            total_time_ms: entry.total_time_ms,
            total_time: entry.total_time_ms.map(format_elapsed),
        }
    }
}

/// Ranked standings: most tiers solved first, then fastest total time.
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard",
    responses(
        (status = 200, description = "Ranked players", body = [StandingResponse]),
        (status = 503, description = "Hosted backend unavailable", body = ErrorSchema)
    ),
    tags = ["leaderboard"],
    operation_id = "leaderboard",
    security([])
)]
#[get("/leaderboard")]
pub async fn leaderboard(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<StandingResponse>>> {
    let entries = state.standings.standings().await?;
    Ok(web::Json(entries.into_iter().map(Into::into).collect()))
}
