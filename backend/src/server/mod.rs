//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, ServerConfig};

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use coderush::Trace;
#[cfg(debug_assertions)]
use coderush::doc::ApiDoc;
use coderush::inbound::http::attempts::{
    current_attempt, start_attempt, submit_attempt, verify_attempt,
};
use coderush::inbound::http::editor::editor_key;
use coderush::inbound::http::health::{HealthState, live, ready};
use coderush::inbound::http::leaderboard::leaderboard;
use coderush::inbound::http::navigation::navigate;
use coderush::inbound::http::problems::list_problems;
use coderush::inbound::http::session_config::fingerprint::key_fingerprint;
use coderush::inbound::http::state::HttpState;
use coderush::inbound::http::users::{current_player, login, logout, signup};
use coderush::inbound::http::verify_code::{VerifyCodeCors, verify_code, verify_code_preflight};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cors: web::Data<VerifyCodeCors>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    session_ttl: Duration,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        cors,
        key,
        cookie_secure,
        same_site,
        session_ttl,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(session_ttl))
        .build();

    let api = web::scope("/api/v1")
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
        .service(editor_key);

    let functions = web::scope("/functions/v1")
        .app_data(cors)
        .service(verify_code_preflight)
        .service(verify_code);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(functions)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing session, binding and
///   outbound adapter settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when an outbound client cannot be built or
/// binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let (http_state, adapters) = build_http_state(&config)?;
    health_state.report_adapters(adapters);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        session_ttl,
        bind_addr,
        hosted_backend: _,
        model: _,
        http_timeout: _,
        build_mode: _,
        cors_allowed_origin,
    } = config;
    let cors = web::Data::new(VerifyCodeCors::new(cors_allowed_origin));

    info!(
        %bind_addr,
        cookie_secure,
        same_site = ?same_site,
        session_ttl_minutes = session_ttl.whole_minutes(),
        key_fingerprint = %key_fingerprint(&key),
        hosted_backend = adapters.hosted_backend,
        verification_model = adapters.verification_model,
        "starting server"
    );

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            cors: cors.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            session_ttl,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
