//! Problem list handler.
//!
//! ```text
//! GET /api/v1/problems
//! ```
//!
//! Each problem carries the signed-in player's status for its tier. Locked
//! problems keep their title but hide the statement.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Problem, SolvedTiers, Tier, TierStatus, problem_path};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// One entry of the problem list.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSummary {
    #[schema(example = "findPairSum")]
    pub id: String,
    #[schema(value_type = crate::inbound::http::schemas::TierSchema)]
    pub tier: Tier,
    #[schema(example = "Find Pair Sum")]
    pub title: String,
    /// Absent while the tier is locked.
    pub description: Option<String>,
    #[schema(value_type = crate::inbound::http::schemas::TierStatusSchema)]
    pub status: TierStatus,
    /// Client route of the editor for this problem.
    #[schema(example = "/problem2")]
    pub path: String,
}

impl ProblemSummary {
    fn new(problem: &Problem, solved: SolvedTiers) -> Self {
        let status = solved.status(problem.tier);
        Self {
            id: problem.id.to_string(),
            tier: problem.tier,
            title: problem.title.clone(),
            description: (status != TierStatus::Locked).then(|| problem.description.clone()),
            status,
            path: problem_path(problem.tier).to_owned(),
        }
    }
}

/// List the problems in tier order.
#[utoipa::path(
    get,
    path = "/api/v1/problems",
    responses(
        (status = 200, description = "Problems with unlock status", body = [ProblemSummary]),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["problems"],
    operation_id = "listProblems"
)]
#[get("/problems")]
pub async fn list_problems(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ProblemSummary>>> {
    let player = session.require_player()?;
    let problems = state
        .catalogue
        .iter()
        .map(|problem| ProblemSummary::new(problem, player.solved))
        .collect();
    Ok(web::Json(problems))
}
