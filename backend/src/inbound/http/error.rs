//! Domain errors rendered as Actix responses.
//!
//! Every failure leaves the API as the JSON [`Error`] envelope. Internal
//! errors lose their message and details on the wire but keep the trace id,
//! and outages of the hosted backend or the verification model carry a
//! `Retry-After` hint.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

/// Seconds clients are asked to wait after a 503.
pub const RETRY_AFTER_SECS: u32 = 5;

const REDACTED_MESSAGE: &str = "Internal server error";

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Body sent to the client for `error`.
fn wire_body(error: &Error) -> Error {
    match error.code() {
        ErrorCode::InternalError => {
            let redacted = Error::internal(REDACTED_MESSAGE);
            match error.trace_id() {
                Some(id) => redacted.with_trace_id(id.to_owned()),
                None => redacted,
            }
        }
        _ => error.clone(),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                code = ?self.code(),
                message = %self.message(),
                trace_id = self.trace_id().unwrap_or_default(),
                "request failed"
            );
        }

        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if status == StatusCode::SERVICE_UNAVAILABLE {
            builder.insert_header((header::RETRY_AFTER, RETRY_AFTER_SECS.to_string()));
        }
        builder.json(wire_body(self))
    }
}
