//! Route guard handler.
//!
//! ```text
//! POST /api/v1/navigate {"path":"/problem2"}
//! ```
//!
//! The client asks where a path leads before rendering it. Entering an
//! editor route opens an attempt on that problem, so the timer starts the
//! moment the page is shown.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{Error, View, resolve};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::attempts::begin_attempt;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/v1/navigate`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct NavigateRequest {
    #[schema(example = "/problem2")]
    pub path: String,
}

/// Where the client ends up.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResponse {
    #[schema(value_type = crate::inbound::http::schemas::ViewSchema)]
    pub view: View,
    /// Replacement location, when the requested path is not allowed.
    #[schema(example = "/problem1")]
    pub redirect: Option<String>,
    #[schema(example = "reverseString")]
    pub active_problem: Option<String>,
}

/// Resolve a client path for the current session.
#[utoipa::path(
    post,
    path = "/api/v1/navigate",
    request_body = NavigateRequest,
    responses(
        (status = 200, description = "Resolved view", body = NavigateResponse),
        (status = 403, description = "Problem locked", body = ErrorSchema)
    ),
    tags = ["navigation"],
    operation_id = "navigate",
    security([])
)]
#[post("/navigate")]
pub async fn navigate(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NavigateRequest>,
) -> ApiResult<web::Json<NavigateResponse>> {
    let mut player = session.player();
    let navigation = resolve(&payload.path, player.as_ref(), &state.catalogue);
    if let Some(redirect) = navigation.redirect {
        debug!(from = %payload.path, to = redirect, "navigation redirected");
    }

    if let (View::Editor(id), Some(player)) = (&navigation.view, player.as_mut()) {
        let problem = state
            .catalogue
            .find(id.as_ref())
            .ok_or_else(|| Error::not_found(format!("unknown problem: {id}")))?;
        begin_attempt(&state, &session, player, problem)?;
    }

    Ok(web::Json(NavigateResponse {
        view: navigation.view,
        redirect: navigation.redirect.map(str::to_owned),
        active_problem: player
            .and_then(|player| player.active_problem)
            .map(String::from),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SolvedTiers;
    use crate::inbound::http::attempts::current_attempt;
    use crate::inbound::http::test_utils::{
        MockPorts, SEED_PATH, fixed_now, next_cookie, seed_player, session_cookie,
        test_session_middleware,
    };
    use actix_web::cookie::Cookie;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn init()
    -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new(MockPorts::default().into_state(fixed_now())))
                .wrap(test_session_middleware())
                .route(SEED_PATH, web::post().to(seed_player))
                .service(
                    web::scope("/api/v1")
                        .service(navigate)
                        .service(current_attempt),
                ),
        )
        .await
    }

    async fn seeded<S>(app: &S, solved: SolvedTiers) -> Cookie<'static>
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let res = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri(SEED_PATH)
                .set_json(solved)
                .to_request(),
        )
        .await;
        session_cookie(&res)
    }

    fn request(path: &str) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/api/v1/navigate")
            .set_json(json!({ "path": path }))
    }

    async fn body(res: ServiceResponse) -> Value {
        serde_json::from_slice(&actix_test::read_body(res).await).expect("json body")
    }

    #[rstest]
    #[case("/")]
    #[case("/leaderboard")]
    #[case("/problem2")]
    #[actix_web::test]
    async fn visitors_are_sent_to_login(#[case] path: &str) {
        let app = init().await;
        let res = actix_test::call_service(&app, request(path).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let nav = body(res).await;
        assert_eq!(nav["view"], json!({ "kind": "login" }));
        assert_eq!(nav["redirect"], "/login");
        assert!(nav["activeProblem"].is_null());
    }

    #[rstest]
    #[case(SolvedTiers::default(), "/problem3", "reverseString", Some("/problem1"))]
    #[case(SolvedTiers { easy: true, medium: false, hard: false }, "/problem3", "findPairSum", Some("/problem2"))]
    #[case(SolvedTiers { easy: true, medium: false, hard: false }, "/problem2", "findPairSum", None)]
    #[case(SolvedTiers { easy: true, medium: true, hard: false }, "/problem3", "minCostPath", None)]
    #[actix_web::test]
    async fn problem_routes_follow_unlocks(
        #[case] solved: SolvedTiers,
        #[case] path: &str,
        #[case] problem: &str,
        #[case] redirect: Option<&str>,
    ) {
        let app = init().await;
        let cookie = seeded(&app, solved).await;
        let res = actix_test::call_service(&app, request(path).cookie(cookie).to_request()).await;
        let nav = body(res).await;
        assert_eq!(nav["view"], json!({ "kind": "editor", "problem": problem }));
        assert_eq!(nav["redirect"].as_str(), redirect);
        assert_eq!(nav["activeProblem"], problem);
    }

    #[actix_web::test]
    async fn entering_an_editor_starts_the_attempt() {
        let app = init().await;
        let cookie = seeded(&app, SolvedTiers::default()).await;
        let res = actix_test::call_service(
            &app,
            request("/problem1").cookie(cookie.clone()).to_request(),
        )
        .await;
        let cookie = next_cookie(&res, cookie);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/attempt")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body(res).await["problemId"], "reverseString");
    }

    #[actix_web::test]
    async fn signed_in_players_skip_login() {
        let app = init().await;
        let cookie = seeded(&app, SolvedTiers::default()).await;
        let res =
            actix_test::call_service(&app, request("/login").cookie(cookie).to_request()).await;
        let nav = body(res).await;
        assert_eq!(nav["view"], json!({ "kind": "home" }));
        assert_eq!(nav["redirect"], "/");
    }

    #[actix_web::test]
    async fn unknown_paths_render_not_found() {
        let app = init().await;
        let cookie = seeded(&app, SolvedTiers::default()).await;
        let res =
            actix_test::call_service(&app, request("/admin").cookie(cookie).to_request()).await;
        let nav = body(res).await;
        assert_eq!(nav["view"], json!({ "kind": "notFound" }));
        assert!(nav["redirect"].is_null());
    }
}
