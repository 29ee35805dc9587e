//! Builders for HTTP state ports.
//!
//! Outbound adapters are chosen from the server configuration. Without
//! settings the verification model always reports its missing configuration;
//! the hosted backend falls back to an in-process stand-in in debug builds
//! and reports its missing configuration in release builds.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use coderush::domain::ports::{
    AuthGateway, CodeVerifier, LeaderboardSource, ProfileRepository,
    UnconfiguredVerificationModel,
};
use coderush::domain::{
    AccountService, ProblemCatalogue, ProgressService, StandingsService, VerificationService,
};
use coderush::inbound::http::health::AdapterReport;
use coderush::inbound::http::session_config::fingerprint::fingerprint;
use coderush::inbound::http::state::{HttpState, HttpStatePorts};
use coderush::outbound::codestral::CodestralHttpModel;
use coderush::outbound::memory::InMemoryHostedBackend;
use coderush::outbound::supabase::SupabaseHttpBackend;
use coderush::outbound::unconfigured::UnconfiguredHostedBackend;

use super::ServerConfig;

/// Ports over one hosted backend, shared by the account, progress and
/// standings services.
fn build_hosted_state<B>(backend: Arc<B>, verifier: Arc<dyn CodeVerifier>) -> HttpState
where
    B: AuthGateway + ProfileRepository + LeaderboardSource + 'static,
{
    let progress = Arc::new(ProgressService::new(backend.clone()));
    HttpState::new(HttpStatePorts {
        accounts: Arc::new(AccountService::new(backend.clone(), backend.clone())),
        progress: progress.clone(),
        progress_query: progress,
        standings: Arc::new(StandingsService::new(backend)),
        verifier,
        clock: Arc::new(mockable::DefaultClock),
        catalogue: ProblemCatalogue::default(),
    })
}

fn build_verifier(config: &ServerConfig) -> std::io::Result<(Arc<dyn CodeVerifier>, &'static str)> {
    match &config.model {
        Some(model) => {
            let adapter = CodestralHttpModel::new(
                model.url.clone(),
                model.api_key.as_str(),
                model.model.clone(),
                config.http_timeout,
            )
            .map_err(|err| std::io::Error::other(format!("verification model client: {err}")))?;
            info!(
                endpoint = %model.url,
                key_fingerprint = %fingerprint(model.api_key.as_bytes()),
                "verification model configured"
            );
            let verifier: Arc<dyn CodeVerifier> =
                Arc::new(VerificationService::new(Arc::new(adapter)));
            Ok((verifier, "codestral"))
        }
        None => {
            warn!("verification model not configured; verify-code will fail");
            let verifier: Arc<dyn CodeVerifier> = Arc::new(VerificationService::new(Arc::new(
                UnconfiguredVerificationModel,
            )));
            Ok((verifier, "unconfigured"))
        }
    }
}

/// Build the HTTP state from configuration, reporting which adapters were
/// chosen.
///
/// # Errors
/// Returns [`std::io::Error`] when an outbound HTTP client cannot be built.
pub(super) fn build_http_state(
    config: &ServerConfig,
) -> std::io::Result<(web::Data<HttpState>, AdapterReport)> {
    let (verifier, verification_model) = build_verifier(config)?;
    let (state, hosted_backend) = match &config.hosted_backend {
        Some(hosted) => {
            let backend = SupabaseHttpBackend::new(
                &hosted.url,
                hosted.anon_key.as_str(),
                config.http_timeout,
            )
            .map_err(|err| std::io::Error::other(format!("hosted backend client: {err}")))?;
            info!(
                project = %hosted.url,
                key_fingerprint = %fingerprint(hosted.anon_key.as_bytes()),
                "hosted backend configured"
            );
            (build_hosted_state(Arc::new(backend), verifier), "supabase")
        }
        None if config.build_mode.is_debug() => {
            warn!("hosted backend not configured; using in-memory accounts and progress");
            (
                build_hosted_state(Arc::new(InMemoryHostedBackend::new()), verifier),
                "in-memory",
            )
        }
        None => {
            warn!("hosted backend not configured; account and leaderboard calls will fail");
            (
                build_hosted_state(Arc::new(UnconfiguredHostedBackend), verifier),
                "unconfigured",
            )
        }
    };
    Ok((
        web::Data::new(state),
        AdapterReport {
            hosted_backend,
            verification_model,
        },
    ))
}
