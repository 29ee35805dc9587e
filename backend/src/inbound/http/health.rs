//! Orchestration probes.
//!
//! Readiness flips once the listener is bound and reports which outbound
//! adapters the process is running with, so a deployment that silently fell
//! back to the in-memory backend is visible from outside.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, HttpResponseBuilder, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Adapter choices made at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdapterReport {
    /// `supabase` or `in-memory`.
    #[schema(example = "supabase")]
    pub hosted_backend: &'static str,
    /// `codestral` or `unconfigured`.
    #[schema(example = "codestral")]
    pub verification_model: &'static str,
}

/// Readiness body.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    #[schema(example = "ready")]
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    adapters: Option<AdapterReport>,
}

/// Shared probe state.
#[derive(Default)]
pub struct HealthState {
    ready: AtomicBool,
    adapters: OnceLock<AdapterReport>,
}

impl HealthState {
    /// Not ready, no adapters reported.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the adapters chosen at startup. Later calls are ignored.
    pub fn report_adapters(&self, report: AdapterReport) {
        let _ = self.adapters.set(report);
    }

    /// Mark the service as ready once the listener is bound.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Whether [`mark_ready`](Self::mark_ready) has been called.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

fn uncached(mut builder: HttpResponseBuilder) -> HttpResponseBuilder {
    builder.insert_header((header::CACHE_CONTROL, "no-store"));
    builder
}

/// Readiness probe. 200 once the server accepts traffic, 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic", body = ReadinessResponse),
        (status = 503, description = "Server is still starting", body = ReadinessResponse)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    let (builder, status) = if state.is_ready() {
        (HttpResponse::Ok(), "ready")
    } else {
        (HttpResponse::ServiceUnavailable(), "starting")
    };
    uncached(builder).json(ReadinessResponse {
        status,
        adapters: state.adapters.get().copied(),
    })
}

/// Liveness probe. 200 whenever the worker can answer.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses((status = 200, description = "Server is alive"))
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    uncached(HttpResponse::Ok()).finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn probe(
        state: web::Data<HealthState>,
        uri: &str,
    ) -> (StatusCode, Option<String>, Value) {
        let app = test::init_service(App::new().app_data(state).service(ready).service(live))
            .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        let cache = res
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = test::read_body(res).await;
        let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, cache, body)
    }

    #[rstest]
    #[case(false, StatusCode::SERVICE_UNAVAILABLE, "starting")]
    #[case(true, StatusCode::OK, "ready")]
    #[actix_web::test]
    async fn readiness_follows_flag(
        #[case] ready_flag: bool,
        #[case] expected: StatusCode,
        #[case] label: &str,
    ) {
        let state = web::Data::new(HealthState::new());
        if ready_flag {
            state.mark_ready();
        }
        let (status, cache, body) = probe(state, "/health/ready").await;
        assert_eq!(status, expected);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert_eq!(body, json!({ "status": label }));
    }

    #[actix_web::test]
    async fn readiness_reports_adapters() {
        let state = web::Data::new(HealthState::new());
        state.report_adapters(AdapterReport {
            hosted_backend: "in-memory",
            verification_model: "unconfigured",
        });
        state.report_adapters(AdapterReport {
            hosted_backend: "supabase",
            verification_model: "codestral",
        });
        state.mark_ready();

        let (_, _, body) = probe(state, "/health/ready").await;
        assert_eq!(
            body,
            json!({
                "status": "ready",
                "adapters": {
                    "hostedBackend": "in-memory",
                    "verificationModel": "unconfigured"
                }
            })
        );
    }

    #[actix_web::test]
    async fn liveness_is_unconditional() {
        let (status, cache, _) = probe(web::Data::new(HealthState::new()), "/health/live").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("no-store"));
    }
}
