//! Shared utilities for integration testing.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderMap, routing::any, Json, Router};
use tokio::net::TcpListener;

use trace_chain::lifecycle::Shutdown;
use trace_chain::{HopConfig, HttpServer, Tracer};
use trace_chain::trace::SequenceGenerator;

/// Start a mock upstream that answers with the trace headers it received.
pub async fn start_header_echo_backend() -> SocketAddr {
    async fn echo(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
        let seen = headers
            .iter()
            .filter(|(name, _)| name.as_str().ends_with("-tid"))
            .map(|(name, value)| (name.to_string(), value.to_str().unwrap_or_default().to_string()))
            .collect();
        Json(seen)
    }

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/{*path}", any(echo)).route("/", any(echo));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Start a mock upstream that never answers within `delay`.
#[allow(dead_code)]
pub async fn start_slow_backend(delay: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route(
        "/",
        any(move || async move {
            tokio::time::sleep(delay).await;
            "late"
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Start a hop whose ids are `{prefix}1`, `{prefix}2`, ...
pub async fn start_hop(prefix: &str, upstream: Option<SocketAddr>, shutdown: &Shutdown) -> SocketAddr {
    start_hop_with(prefix, upstream, shutdown, |_| {}).await
}

/// Like [`start_hop`], with a hook to adjust the config.
pub async fn start_hop_with(
    prefix: &str,
    upstream: Option<SocketAddr>,
    shutdown: &Shutdown,
    tweak: impl FnOnce(&mut HopConfig),
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = HopConfig::default();
    config.listener.bind_address = addr.to_string();
    config.upstream.url = upstream.map(|a| format!("http://{}", a));
    tweak(&mut config);

    let tracer = Tracer::new(Arc::new(SequenceGenerator::new(prefix)));
    let server = HttpServer::with_tracer(config, tracer);
    let shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = server.run(listener, &shutdown).await;
    });
    addr
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
