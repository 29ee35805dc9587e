//! Reqwest-backed verification model adapter.
//!
//! Posts the grading prompt as a single user message and hands the first
//! choice back to the domain untouched. Nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url};
use tracing::{debug, error};
use zeroize::Zeroizing;

use super::dto::{ChatRequestDto, ChatResponseDto};
use crate::domain::VerificationPrompt;
use crate::domain::ports::{VerificationModel, VerificationModelError};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "codestral-latest";

/// Chat-completions client for the verification model.
pub struct CodestralHttpModel {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
    model: String,
}

impl CodestralHttpModel {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        model: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: Zeroizing::new(api_key.into()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> VerificationModelError {
    if error.is_timeout() {
        VerificationModelError::timeout(error.to_string())
    } else {
        VerificationModelError::transport(error.to_string())
    }
}

#[async_trait]
impl VerificationModel for CodestralHttpModel {
    async fn complete(
        &self,
        prompt: &VerificationPrompt,
    ) -> Result<Option<String>, VerificationModelError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key.as_str()))
            .json(&ChatRequestDto::single_user_message(
                &self.model,
                prompt.as_str(),
            ))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            error!(
                status = status.as_u16(),
                body = %String::from_utf8_lossy(&body),
                "verification model returned an error response"
            );
            return Err(VerificationModelError::upstream(status.as_u16()));
        }

        let decoded: ChatResponseDto = serde_json::from_slice(&body).map_err(|error| {
            VerificationModelError::decode(format!("invalid completion payload: {error}"))
        })?;
        let reply = decoded.into_first_reply();
        debug!(reply = ?reply, "verification model replied");
        Ok(reply)
    }
}
