//! Editor key handler.
//!
//! ```text
//! POST /api/v1/editor/keys
//! {"text":"x = 1","selectionStart":0,"selectionEnd":5,"key":{"key":"/","ctrl":true},"language":"python"}
//! ```
//!
//! The client sends its buffer with every key event and replaces it with the
//! reply when `handled` is true. A handled edit also withdraws any verdict on
//! the session's running attempt, so the new buffer must be verified again.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EditorBuffer, Error, KeyPress, Language};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;

/// Key event as reported by the browser.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct KeyPressRequest {
    #[schema(example = "Tab")]
    pub key: String,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
}

impl From<KeyPressRequest> for KeyPress {
    fn from(value: KeyPressRequest) -> Self {
        Self {
            key: value.key,
            shift: value.shift,
            ctrl: value.ctrl,
            meta: value.meta,
        }
    }
}

/// Body for `POST /api/v1/editor/keys`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditorKeyRequest {
    pub text: String,
    /// UTF-8 byte offset.
    pub selection_start: usize,
    /// UTF-8 byte offset.
    pub selection_end: usize,
    pub key: KeyPressRequest,
    #[serde(default)]
    #[schema(value_type = Option<crate::inbound::http::schemas::LanguageSchema>)]
    pub language: Option<String>,
}

/// Buffer after the key event.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditorKeyResponse {
    pub text: String,
    pub selection_start: usize,
    pub selection_end: usize,
    /// False when the key is left to the client's default behaviour.
    pub handled: bool,
}

impl EditorKeyResponse {
    fn new(buffer: &EditorBuffer, handled: bool) -> Self {
        Self {
            text: buffer.text().to_owned(),
            selection_start: buffer.selection_start(),
            selection_end: buffer.selection_end(),
            handled,
        }
    }
}

/// Apply one key press to an editor buffer.
#[utoipa::path(
    post,
    path = "/api/v1/editor/keys",
    request_body = EditorKeyRequest,
    responses(
        (status = 200, description = "Edited buffer", body = EditorKeyResponse),
        (status = 400, description = "Invalid selection or language", body = ErrorSchema)
    ),
    tags = ["editor"],
    operation_id = "editorKey",
    security([])
)]
#[post("/editor/keys")]
pub async fn editor_key(
    session: SessionContext,
    payload: web::Json<EditorKeyRequest>,
) -> ApiResult<web::Json<EditorKeyResponse>> {
    let EditorKeyRequest {
        text,
        selection_start,
        selection_end,
        key,
        language,
    } = payload.into_inner();
    let language = language
        .map(|raw| raw.parse::<Language>())
        .transpose()
        .map_err(|err| Error::invalid_request(err.to_string()))?
        .unwrap_or_default();
    let buffer = EditorBuffer::new(text, selection_start, selection_end)
        .map_err(|err| Error::invalid_request(err.to_string()))?;

    let response = match buffer.apply_key(&key.into(), language) {
        Some(edited) => {
            withdraw_verdict(&session);
            EditorKeyResponse::new(&edited, true)
        }
        None => EditorKeyResponse::new(&buffer, false),
    };
    Ok(web::Json(response))
}

fn withdraw_verdict(session: &SessionContext) {
    if let Some(mut attempt) = session.attempt().filter(|attempt| attempt.is_verified()) {
        attempt.invalidate();
        session.save_attempt(&attempt);
    }
}
