//! CodeRush backend library modules.
//!
//! The crate follows a hexagonal layout: [`domain`] holds the challenge
//! rules and ports, [`inbound`] exposes them over HTTP and [`outbound`]
//! talks to the hosted auth/database service and the verification model.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
