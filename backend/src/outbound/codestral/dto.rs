//! Chat-completions request and response payloads.

use serde::{Deserialize, Serialize};

pub(super) const MAX_TOKENS: u32 = 10;

#[derive(Debug, Serialize)]
pub(super) struct ChatRequestDto<'a> {
    pub model: &'a str,
    pub messages: [ChatMessageDto<'a>; 1],
    pub max_tokens: u32,
    pub temperature: f32,
}

impl<'a> ChatRequestDto<'a> {
    /// Deterministic single-message request.
    pub(super) fn single_user_message(model: &'a str, content: &'a str) -> Self {
        Self {
            model,
            messages: [ChatMessageDto {
                role: "user",
                content,
            }],
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ChatMessageDto<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChatResponseDto {
    #[serde(default)]
    pub choices: Vec<ChoiceDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChoiceDto {
    pub message: Option<ReplyMessageDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ReplyMessageDto {
    pub content: Option<String>,
}

impl ChatResponseDto {
    /// Content of the first choice, when present.
    pub(super) fn into_first_reply(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
    }
}
