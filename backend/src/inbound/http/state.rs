//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ProblemCatalogue;
use crate::domain::ports::{
    AccountCommand, CodeVerifier, ProgressCommand, ProgressQuery, StandingsQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub progress: Arc<dyn ProgressCommand>,
    pub progress_query: Arc<dyn ProgressQuery>,
    pub standings: Arc<dyn StandingsQuery>,
    pub verifier: Arc<dyn CodeVerifier>,
    pub clock: Arc<dyn Clock>,
    pub catalogue: ProblemCatalogue,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub progress: Arc<dyn ProgressCommand>,
    pub progress_query: Arc<dyn ProgressQuery>,
    pub standings: Arc<dyn StandingsQuery>,
    pub verifier: Arc<dyn CodeVerifier>,
    pub clock: Arc<dyn Clock>,
    pub catalogue: Arc<ProblemCatalogue>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use coderush::domain::ports::FixtureVerificationModel;
    /// use coderush::domain::{
    ///     AccountService, ProblemCatalogue, ProgressService, StandingsService,
    ///     VerificationService,
    /// };
    /// use coderush::inbound::http::state::{HttpState, HttpStatePorts};
    /// use coderush::outbound::memory::InMemoryHostedBackend;
    ///
    /// let backend = Arc::new(InMemoryHostedBackend::new());
    /// let progress = Arc::new(ProgressService::new(backend.clone()));
    /// let state = HttpState::new(HttpStatePorts {
    ///     accounts: Arc::new(AccountService::new(backend.clone(), backend.clone())),
    ///     progress: progress.clone(),
    ///     progress_query: progress,
    ///     standings: Arc::new(StandingsService::new(backend.clone())),
    ///     verifier: Arc::new(VerificationService::new(Arc::new(
    ///         FixtureVerificationModel::replying("CORRECT"),
    ///     ))),
    ///     clock: Arc::new(mockable::DefaultClock),
    ///     catalogue: ProblemCatalogue::default(),
    /// });
    /// let _catalogue = state.catalogue.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            progress,
            progress_query,
            standings,
            verifier,
            clock,
            catalogue,
        } = ports;
        Self {
            accounts,
            progress,
            progress_query,
            standings,
            verifier,
            clock,
            catalogue: Arc::new(catalogue),
        }
    }
}
