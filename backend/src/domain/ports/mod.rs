//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod auth_gateway;
mod code_verifier;
mod leaderboard_source;
mod profile_repository;
mod progress_command;
mod standings_query;
mod verification_model;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use auth_gateway::{AuthGateway, AuthGatewayError};
#[cfg(test)]
pub use code_verifier::MockCodeVerifier;
pub use code_verifier::CodeVerifier;
#[cfg(test)]
pub use leaderboard_source::MockLeaderboardSource;
pub use leaderboard_source::{FixtureLeaderboardSource, LeaderboardSource, LeaderboardSourceError};
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileIdentity, ProfileRepository, ProfileRepositoryError};
#[cfg(test)]
pub use progress_command::{MockProgressCommand, MockProgressQuery};
pub use progress_command::{ProgressCommand, ProgressQuery};
#[cfg(test)]
pub use standings_query::MockStandingsQuery;
pub use standings_query::StandingsQuery;
#[cfg(test)]
pub use verification_model::MockVerificationModel;
pub use verification_model::{
    FixtureVerificationModel, MISSING_MODEL_CONFIG, UnconfiguredVerificationModel,
    VerificationModel, VerificationModelError,
};
