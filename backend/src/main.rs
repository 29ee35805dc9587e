//! Backend entry-point: loads settings, wires the HTTP server and runs it.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use coderush::inbound::http::health::HealthState;
use coderush::inbound::http::session_config::{BuildMode, session_settings_from_env};
use ortho_config::OrthoConfig;
use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let build_mode = BuildMode::from_debug_assertions();
    let session = session_settings_from_env(&DefaultEnv::new(), build_mode)
        .map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let config = ServerConfig::new(session, bind_addr)
        .with_build_mode(build_mode)
        .with_settings(&settings)
        .map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
