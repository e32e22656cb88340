//! Transport layers every route sits behind.
//!
//! Outermost first:
//! - transport failures (deadline, layer errors) become the usual JSON error body
//! - `x-request-id` is set when the client did not send one
//! - access log span per request, tagged with that id
//! - the id is echoed on the response
//! - request body cap, then the overall deadline
//!
//! A JWKS fetch has its own, shorter timeout inside the authorizer.

use std::time::Duration;

use axum::body::Body;
use axum::error_handling::HandleErrorLayer;
use axum::http::{HeaderName, Request, StatusCode};
use axum::{Json, Router};
use tower::timeout::{TimeoutLayer, error::Elapsed};
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

use crate::error::ErrorResponse;

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
// Actor/movie payloads are a few hundred bytes
const BODY_LIMIT_BYTES: usize = 64 * 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn apply(router: Router) -> Router {
    let layers = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(transport_error))
        .layer(SetRequestIdLayer::new(REQUEST_ID, MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(REQUEST_ID))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT));

    router.layer(layers)
}

fn request_span(req: &Request<Body>) -> Span {
    let request_id = req
        .headers()
        .get(&REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        request_id = %request_id,
    )
}

async fn transport_error(err: BoxError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, message) = if err.is::<Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "request timed out")
    } else {
        tracing::error!(error = %err, "unhandled transport error");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    };

    let body = ErrorResponse {
        success: false,
        error: status.as_u16(),
        message: message.to_string(),
    };
    (status, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deadline_becomes_a_json_408() {
        let (status, Json(body)) = transport_error(Box::new(Elapsed::new())).await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert!(!body.success);
        assert_eq!(body.error, 408);
        assert_eq!(body.message, "request timed out");
    }

    #[tokio::test]
    async fn other_layer_errors_are_internal() {
        let (status, Json(body)) = transport_error("pool closed".into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, 500);
    }
}
