//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TraceId;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request conflicts with the current state.
    Conflict,
    /// A collaborator (hosted backend, model endpoint) is unavailable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
/// - `trace_id`, when present, must be non-empty once trimmed.
///
/// # Examples
/// ```
/// use coderush::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::NotFound, "missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
    details: Option<Value>,
}

/// Validation errors emitted by the fallible constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The message was blank.
    #[error("error message must not be empty")]
    EmptyMessage,
    /// The trace identifier was blank.
    #[error("trace identifier must not be empty")]
    EmptyTraceId,
}

impl Error {
    /// Create a new error.
    ///
    /// Captures the current trace identifier if one is in scope so the error
    /// payload is correlated automatically. Blank messages are replaced by a
    /// generic description; use [`Error::try_new`] to reject them instead.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "unspecified error".to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self::new(code, message))
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier captured when the error was raised.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a trace identifier to the error.
    ///
    /// # Examples
    /// ```
    /// use coderush::domain::Error;
    ///
    /// let err = Error::forbidden("nope").with_trace_id("abc");
    /// assert_eq!(err.trace_id(), Some("abc"));
    /// ```
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach a trace identifier, rejecting blank values.
    pub fn try_with_trace_id(self, id: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        Ok(self.with_trace_id(id))
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use coderush::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "name" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(alias = "trace_id")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            trace_id: value.trace_id,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            trace_id,
            details,
        } = value;

        let mut error = Self::try_new(code, message)?;
        error.trace_id = match trace_id {
            Some(id) if id.trim().is_empty() => return Err(ErrorValidationError::EmptyTraceId),
            other => other,
        };
        error.details = details;
        Ok(error)
    }
}
