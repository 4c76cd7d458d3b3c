//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a hop.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::trace::UuidVersion;

/// Root configuration for a trace-propagating hop.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HopConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Downstream service to forward requests to.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Trace identity settings.
    pub trace: TraceConfig,

    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL such as "http://10.0.0.7:9000". When unset the hop answers
    /// with its own trace identity instead of forwarding.
    pub url: Option<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds.
    pub request_secs: u64,

    /// Timeout for the call to the upstream, in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 10,
        }
    }
}

/// Trace identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Id generator flavour for new hops.
    pub generator: UuidVersion,

    /// Write this hop's identity on responses.
    pub echo_response_headers: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            generator: UuidVersion::UuidV4,
            echo_response_headers: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "trace_chain=info,tower_http=info".to_string(),
            json: false,
        }
    }
}
