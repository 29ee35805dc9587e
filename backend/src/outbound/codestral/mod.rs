//! Verification model adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `VerificationModel` port against a chat-completions endpoint.

mod dto;
mod http_model;

pub use http_model::{CodestralHttpModel, DEFAULT_MODEL};
