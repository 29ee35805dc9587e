//! Correlation id carried by every request.
//!
//! The id lives in Tokio task-local storage while a request is handled, so
//! [`Error`](crate::domain::Error) values and log lines can pick it up
//! without threading it through every call. Task-locals do not follow
//! `tokio::spawn`; wrap spawned work in [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request trace identifier.
///
/// # Examples
/// ```
/// use coderush::TraceId;
///
/// let adopted = TraceId::adopt_or_generate(Some("7b0c1a4e-5f7e-4b36-9c55-1e0f2f0f4d1a"));
/// assert_eq!(adopted.to_string(), "7b0c1a4e-5f7e-4b36-9c55-1e0f2f0f4d1a");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse a caller-supplied id when it is a UUID, otherwise mint one.
    ///
    /// The nil UUID is treated as absent so clients cannot collapse every
    /// request onto one id by sending zeros.
    #[must_use]
    pub fn adopt_or_generate(supplied: Option<&str>) -> Self {
        supplied
            .and_then(|raw| raw.trim().parse::<Self>().ok())
            .filter(|id| !id.0.is_nil())
            .unwrap_or_else(Self::generate)
    }

    /// The id in scope for the running task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` in scope.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
