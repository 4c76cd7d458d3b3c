//! Trace Context Middleware.
//! Gives every inbound request a trace identity before handlers run.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::Instrument;

use crate::error::HopError;
use crate::trace::{embed, read_headers, strip_headers, write_headers, Tracer};

/// State for the trace context middleware.
#[derive(Clone, Debug)]
pub struct TraceContextState {
    pub tracer: Tracer,
    /// Write the hop's identity on the response, replacing any trace
    /// headers an upstream answered with.
    pub echo_response_headers: bool,
}

/// Parse the caller's identity from the trace headers, or originate a new
/// chain when they are missing or incomplete, and embed it in the request.
///
/// Everything behind this middleware may use `must_retrieve`.
pub async fn trace_context_middleware(
    State(state): State<TraceContextState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let inbound = read_headers(req.headers());
    let identity = if inbound.is_valid() {
        inbound
    } else {
        if !inbound.current_id.is_empty() || !inbound.entry_id.is_empty() {
            tracing::debug!(
                entry_tid = %inbound.entry_id,
                curr_tid = %inbound.current_id,
                "Incomplete inbound trace headers, starting a new chain"
            );
        }
        state.tracer.new_root()
    };

    let span = tracing::info_span!(
        "hop",
        entry_tid = %identity.entry_id,
        curr_tid = %identity.current_id,
        prev_tid = %identity.previous_id,
    );

    let req = match embed(identity.clone(), req) {
        Ok(req) => req,
        Err(e) => return HopError::from(e).into_response(),
    };

    let mut response = next.run(req).instrument(span).await;
    if state.echo_response_headers {
        // Replace whatever an upstream reported with this hop's identity.
        strip_headers(response.headers_mut());
        write_headers(&identity, response.headers_mut());
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{must_retrieve, SequenceGenerator, TraceIdentity, X_CURR_TID, X_ENTRY_TID, X_PREV_TID};
    use axum::{middleware, routing::get, Json, Router};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn whoami(req: Request<Body>) -> Json<TraceIdentity> {
        Json(must_retrieve(&req))
    }

    fn app(echo_response_headers: bool) -> Router {
        let state = TraceContextState {
            tracer: Tracer::new(Arc::new(SequenceGenerator::new("root-"))),
            echo_response_headers,
        };
        Router::new()
            .route("/", get(whoami))
            .layer(middleware::from_fn_with_state(state, trace_context_middleware))
    }

    async fn body_identity(response: Response) -> TraceIdentity {
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_originates_root_without_headers() {
        let response = app(true)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.headers()[X_CURR_TID], "root-1");
        assert_eq!(response.headers()[X_ENTRY_TID], "root-1");
        assert!(response.headers().get(X_PREV_TID).is_none());
        assert_eq!(body_identity(response).await, TraceIdentity::new("root-1", "root-1", ""));
    }

    #[tokio::test]
    async fn test_adopts_valid_inbound_identity() {
        let request = Request::builder()
            .uri("/")
            .header(X_CURR_TID, "B")
            .header(X_ENTRY_TID, "A")
            .header(X_PREV_TID, "A")
            .body(Body::empty())
            .unwrap();
        let response = app(false).oneshot(request).await.unwrap();

        assert!(response.headers().get(X_CURR_TID).is_none());
        assert_eq!(body_identity(response).await, TraceIdentity::new("A", "B", "A"));
    }

    #[tokio::test]
    async fn test_incomplete_inbound_starts_new_chain() {
        let request = Request::builder()
            .uri("/")
            .header(X_CURR_TID, "orphan")
            .body(Body::empty())
            .unwrap();
        let response = app(true).oneshot(request).await.unwrap();

        assert_eq!(body_identity(response).await, TraceIdentity::new("root-1", "root-1", ""));
    }
}
