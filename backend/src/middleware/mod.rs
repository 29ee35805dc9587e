//! Actix middleware shared by the API and function scopes.

pub mod trace;

pub use trace::Trace;
