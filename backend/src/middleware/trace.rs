//! Request correlation middleware.
//!
//! Every request runs inside a [`TraceId`] scope. A valid `trace-id` header
//! from the client is kept so browser and server logs line up; otherwise a
//! fresh id is minted. The id is echoed on the response and one log line is
//! written per request with its status and latency.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, info, info_span, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware scoping each request to a [`TraceId`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use coderush::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

fn supplied_trace_id(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::adopt_or_generate(supplied_trace_id(&req));
        let span = info_span!(
            "request",
            %trace_id,
            method = %req.method(),
            path = %req.path()
        );
        let started = Instant::now();
        let fut = self.service.call(req);
        Box::pin(TraceId::scope(
            trace_id,
            async move {
                let mut res = fut.await?;
                info!(
                    status = res.status().as_u16(),
                    latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "request finished"
                );
                match HeaderValue::from_str(&trace_id.to_string()) {
                    Ok(value) => {
                        res.response_mut()
                            .headers_mut()
                            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                    }
                    Err(error) => warn!(%error, "trace id is not a valid header value"),
                }
                Ok(res)
            }
            .instrument(span),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApiResult, Error as DomainError};
    use actix_web::{App, HttpResponse, test, web};

    const CLIENT_ID: &str = "2d7c6a55-0b4e-4f0d-a1f4-7d5d1c9b8e21";

    async fn call_with<F, Fut, Res>(handler: F, supplied: Option<&str>) -> (ServiceResponse, String)
    where
        F: Fn() -> Fut + Clone + 'static,
        Fut: std::future::Future<Output = Res> + 'static,
        Res: actix_web::Responder + 'static,
    {
        let app =
            test::init_service(App::new().wrap(Trace).route("/", web::get().to(handler))).await;
        let mut req = test::TestRequest::get().uri("/");
        if let Some(id) = supplied {
            req = req.insert_header((TRACE_ID_HEADER, id));
        }
        let res = test::call_service(&app, req.to_request()).await;
        let trace_id = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("header is ascii")
            .to_owned();
        (res, trace_id)
    }

    async fn echo_trace_id() -> HttpResponse {
        let id = TraceId::current().expect("trace id in scope");
        HttpResponse::Ok().body(id.to_string())
    }

    #[actix_web::test]
    async fn handler_sees_the_echoed_id() {
        let (res, trace_id) = call_with(echo_trace_id, None).await;
        let body = test::read_body(res).await;
        assert_eq!(std::str::from_utf8(&body).expect("utf8 body"), trace_id);
    }

    #[actix_web::test]
    async fn client_id_is_adopted() {
        let (_, trace_id) = call_with(echo_trace_id, Some(CLIENT_ID)).await;
        assert_eq!(trace_id, CLIENT_ID);
    }

    #[actix_web::test]
    async fn garbage_client_id_is_replaced() {
        let (_, trace_id) = call_with(echo_trace_id, Some("editor-tab-3")).await;
        assert_ne!(trace_id, "editor-tab-3");
        assert!(trace_id.parse::<TraceId>().is_ok());
    }

    #[actix_web::test]
    async fn error_body_carries_the_id() {
        let (res, trace_id) = call_with(
            || async { ApiResult::<HttpResponse>::Err(DomainError::internal("boom")) },
            Some(CLIENT_ID),
        )
        .await;
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(trace_id, CLIENT_ID);
        assert_eq!(body["traceId"], CLIENT_ID);
    }
}
