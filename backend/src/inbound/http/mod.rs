//! HTTP inbound adapter exposing REST endpoints.

pub mod attempts;
pub mod editor;
pub mod error;
pub mod health;
pub mod leaderboard;
pub mod navigation;
pub mod problems;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod verify_code;

pub use error::ApiResult;
