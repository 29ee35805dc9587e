//! Shared app wiring for HTTP integration tests.
//!
//! Builds the full `/api/v1` and `/functions/v1` surface over a hosted
//! backend (usually the in-memory one), a scripted verification model and a
//! manually advanced clock.

use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::Value;

use coderush::Trace;
use coderush::domain::ports::{
    AuthGateway, LeaderboardSource, ProfileRepository, VerificationModel,
};
use coderush::domain::{
    AccountService, ProblemCatalogue, ProgressService, StandingsService, VerificationService,
};
use coderush::inbound::http::attempts::{
    current_attempt, start_attempt, submit_attempt, verify_attempt,
};
use coderush::inbound::http::editor::editor_key;
use coderush::inbound::http::leaderboard::leaderboard;
use coderush::inbound::http::navigation::navigate;
use coderush::inbound::http::problems::list_problems;
use coderush::inbound::http::state::{HttpState, HttpStatePorts};
use coderush::inbound::http::users::{current_player, login, logout, signup};
use coderush::inbound::http::verify_code::{VerifyCodeCors, verify_code, verify_code_preflight};

/// Clock that only moves when a test advances it.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        Self(Mutex::new(start))
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.0.lock().expect("clock lock");
        *now += chrono::Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

/// Handler state over `backend` and `model`.
pub fn http_state<B, M>(backend: Arc<B>, model: M, clock: Arc<ManualClock>) -> HttpState
where
    B: AuthGateway + ProfileRepository + LeaderboardSource + 'static,
    M: VerificationModel + 'static,
{
    let progress = Arc::new(ProgressService::new(backend.clone()));
    HttpState::new(HttpStatePorts {
        accounts: Arc::new(AccountService::new(backend.clone(), backend.clone())),
        progress: progress.clone(),
        progress_query: progress,
        standings: Arc::new(StandingsService::new(backend)),
        verifier: Arc::new(VerificationService::new(Arc::new(model))),
        clock,
        catalogue: ProblemCatalogue::default(),
    })
}

/// Initialise the full application around `state`.
pub async fn init_app(
    state: HttpState,
    cors: VerifyCodeCors,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session)
                    .service(login)
                    .service(signup)
                    .service(logout)
                    .service(current_player)
                    .service(list_problems)
                    .service(navigate)
                    .service(start_attempt)
                    .service(current_attempt)
                    .service(verify_attempt)
                    .service(submit_attempt)
                    .service(leaderboard)
                    .service(editor_key),
            )
            .service(
                web::scope("/functions/v1")
                    .app_data(web::Data::new(cors))
                    .service(verify_code_preflight)
                    .service(verify_code),
            ),
    )
    .await
}

/// Cookie jar holding one browser's session.
#[derive(Default)]
pub struct Browser {
    cookie: Option<Cookie<'static>>,
}

impl Browser {
    /// Send `req` with the current session cookie and keep any replacement.
    pub async fn send<S>(&mut self, app: &S, req: test::TestRequest) -> ServiceResponse
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let req = match &self.cookie {
            Some(cookie) => req.cookie(cookie.clone()),
            None => req,
        };
        let res = test::call_service(app, req.to_request()).await;
        if let Some(cookie) = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
        {
            self.cookie = Some(cookie.into_owned());
        }
        res
    }

    /// Send `req` and decode the JSON reply.
    pub async fn json<S>(&mut self, app: &S, req: test::TestRequest) -> (u16, Value)
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let res = self.send(app, req).await;
        let status = res.status().as_u16();
        let body = test::read_body(res).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("json body")
        };
        (status, value)
    }
}
