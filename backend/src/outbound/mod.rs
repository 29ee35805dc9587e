//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits:
//!
//! - **supabase**: hosted auth, profile and leaderboard access over HTTP
//! - **codestral**: the code-grading language model over HTTP
//! - **memory**: an in-process stand-in for the hosted backend
//! - **unconfigured**: a hosted backend that reports missing settings
//!
//! Adapters are thin translators that convert between domain types and
//! wire representations. They contain no business logic.

pub mod codestral;
pub mod memory;
pub mod supabase;
pub mod unconfigured;
