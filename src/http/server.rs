//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the hop handler
//! - Wire up middleware (access log, trace context, timeout)
//! - Bind server to listener with graceful shutdown
//! - Forward requests upstream with a chained trace identity

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::HopConfig;
use crate::error::HopError;
use crate::http::middleware::{trace_context_middleware, TraceContextState};
use crate::lifecycle::Shutdown;
use crate::trace::{must_retrieve, strip_headers, write_headers, Tracer, UuidGenerator};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub tracer: Tracer,
    pub upstream: Option<Arc<str>>,
    pub upstream_timeout_secs: u64,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for one hop of a trace chain.
pub struct HttpServer {
    router: Router,
    config: HopConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: HopConfig) -> Self {
        let tracer = Tracer::new(Arc::new(UuidGenerator::new(config.trace.generator)));
        Self::with_tracer(config, tracer)
    }

    /// Create a server whose identities come from `tracer`.
    pub fn with_tracer(config: HopConfig, tracer: Tracer) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            tracer: tracer.clone(),
            upstream: config.upstream.url.as_deref().map(Arc::from),
            upstream_timeout_secs: config.timeouts.upstream_secs,
            client,
        };
        let trace_state = TraceContextState {
            tracer,
            echo_response_headers: config.trace.echo_response_headers,
        };

        let router = Self::build_router(&config, state, trace_state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &HopConfig, state: AppState, trace_state: TraceContextState) -> Router {
        Router::new()
            .route("/{*path}", any(hop_handler))
            .route("/", any(hop_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn_with_state(trace_state, trace_context_middleware))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = self.config.upstream.url.as_deref().unwrap_or("none"),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for serving it elsewhere.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Answer with this hop's identity, or forward upstream as a child hop.
async fn hop_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response, HopError> {
    let identity = must_retrieve(&request);

    let Some(upstream) = state.upstream.as_deref() else {
        tracing::debug!("No upstream configured, answering with trace identity");
        return Ok(Json(identity).into_response());
    };

    let child = state.tracer.chain(&identity)?;
    let (parts, body) = request.into_parts();
    let uri = upstream_uri(upstream, &parts.uri)?;

    let mut builder = Request::builder().method(parts.method).uri(uri.clone());
    if let Some(headers) = builder.headers_mut() {
        for (k, v) in parts.headers.iter() {
            if *k != header::HOST {
                headers.append(k.clone(), v.clone());
            }
        }
        strip_headers(headers);
        write_headers(&child, headers);
    }
    let req = builder.body(body)?;

    tracing::info!(
        next_tid = %child.current_id,
        upstream = %uri,
        "Forwarding request"
    );

    let timeout = Duration::from_secs(state.upstream_timeout_secs);
    let response = match tokio::time::timeout(timeout, state.client.request(req)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            tracing::error!(next_tid = %child.current_id, error = %e, "Upstream error");
            return Err(HopError::Upstream(e));
        }
        Err(_) => {
            tracing::error!(next_tid = %child.current_id, "Upstream timed out");
            return Err(HopError::Timeout(state.upstream_timeout_secs));
        }
    };

    let (parts, body) = response.into_parts();
    Ok(Response::from_parts(parts, Body::new(body)))
}

/// Join the upstream base URL with the inbound path and query.
fn upstream_uri(base: &str, inbound: &Uri) -> Result<Uri, HopError> {
    let path = inbound
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    format!("{}{}", base.trim_end_matches('/'), path)
        .parse::<Uri>()
        .map_err(|_| HopError::InvalidUpstream(base.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{SequenceGenerator, TraceIdentity, X_CURR_TID, X_ENTRY_TID};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[test]
    fn test_upstream_uri() {
        let inbound: Uri = "/api/v1?x=1".parse().unwrap();
        assert_eq!(
            upstream_uri("http://127.0.0.1:9001/", &inbound).unwrap(),
            "http://127.0.0.1:9001/api/v1?x=1"
        );
        assert_eq!(
            upstream_uri("http://127.0.0.1:9001/base", &inbound).unwrap(),
            "http://127.0.0.1:9001/base/api/v1?x=1"
        );
        assert!(upstream_uri("http://bad host", &inbound).is_err());
    }

    #[tokio::test]
    async fn test_terminal_hop_answers_with_identity() {
        let tracer = Tracer::new(Arc::new(SequenceGenerator::new("t")));
        let router = HttpServer::with_tracer(HopConfig::default(), tracer).into_router();

        let response = router
            .oneshot(Request::builder().uri("/anything").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[X_CURR_TID], "t1");
        assert_eq!(response.headers()[X_ENTRY_TID], "t1");

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let identity: TraceIdentity = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(identity, TraceIdentity::new("t1", "t1", ""));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        let mut config = HopConfig::default();
        // Port 9 (discard) on loopback: nothing listens there in CI.
        config.upstream.url = Some("http://127.0.0.1:9".into());
        let router = HttpServer::new(config).into_router();

        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().get(X_CURR_TID).is_some());
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let shutdown = Shutdown::new();
        let server = HttpServer::new(HopConfig::default());

        let running = shutdown.clone();
        let handle = tokio::spawn(async move { server.run(listener, &running).await });
        shutdown.trigger();

        let result = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("server should stop after shutdown");
        assert!(result.unwrap().is_ok());
    }
}
