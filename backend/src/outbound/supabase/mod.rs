//! Hosted auth and database adapters.
//!
//! This module provides a thin HTTP implementation of the `AuthGateway`,
//! `ProfileRepository` and `LeaderboardSource` ports against a Supabase
//! project.

mod dto;
mod http_backend;

pub use http_backend::{SupabaseBuildError, SupabaseHttpBackend};
