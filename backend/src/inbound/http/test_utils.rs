//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    AccessToken, AuthenticatedUser, ProblemCatalogue, SolvedTiers, UserId, Username,
};
use crate::domain::ports::{
    MockAccountCommand, MockCodeVerifier, MockProgressCommand, MockProgressQuery,
    MockStandingsQuery,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Id of the player seeded by [`seed_player`].
pub const TEST_USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
/// Access token of the player seeded by [`seed_player`].
pub const TEST_TOKEN: &str = "token-1";
/// Route that [`seed_player`] is mounted on by test apps.
pub const SEED_PATH: &str = "/test/seed";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler signing in a fixture player with the posted solved flags.
pub async fn seed_player(
    session: SessionContext,
    solved: actix_web::web::Json<SolvedTiers>,
) -> actix_web::HttpResponse {
    let user = AuthenticatedUser {
        id: UserId::new(TEST_USER_ID).expect("fixture id"),
        username: Username::new("ada").expect("fixture username"),
        access_token: AccessToken::new(TEST_TOKEN),
    };
    let mut player = session.sign_in(&user);
    player.solved = solved.into_inner();
    session.save_player(&player);
    actix_web::HttpResponse::Ok().finish()
}

/// Keep the newest session cookie: `current` unless `res` replaced it.
pub fn next_cookie(res: &ServiceResponse, current: Cookie<'static>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .unwrap_or(current)
}

/// Extract the session cookie set by a response.
pub fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Fixed instant used as "now" in handler tests.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26)
        .single()
        .expect("valid timestamp")
}

/// Clock pinned to a single instant.
pub struct FixtureClock(pub DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Mock ports for handler tests; every port is strict, so tests set only the
/// expectations they need.
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccountCommand,
    pub progress: MockProgressCommand,
    pub progress_query: MockProgressQuery,
    pub standings: MockStandingsQuery,
    pub verifier: MockCodeVerifier,
}

impl MockPorts {
    /// Assemble handler state around the mocks and a clock pinned to `now`.
    pub fn into_state(self, now: DateTime<Utc>) -> HttpState {
        self.into_state_with_clock(Arc::new(FixtureClock(now)))
    }

    /// Assemble handler state around the mocks and `clock`.
    pub fn into_state_with_clock(self, clock: Arc<dyn Clock>) -> HttpState {
        HttpState::new(HttpStatePorts {
            accounts: Arc::new(self.accounts),
            progress: Arc::new(self.progress),
            progress_query: Arc::new(self.progress_query),
            standings: Arc::new(self.standings),
            verifier: Arc::new(self.verifier),
            clock,
            catalogue: ProblemCatalogue::default(),
        })
    }
}
