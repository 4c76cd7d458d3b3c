//! Error types shared across subsystems.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors from the trace identity core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// Entry or current id is missing.
    #[error("invalid trace identity")]
    InvalidTraceIdentity,
}

/// Errors raised while serving a request on a hop.
#[derive(Debug, Error)]
pub enum HopError {
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// The configured upstream could not be turned into a request URI.
    #[error("invalid upstream uri: {0}")]
    InvalidUpstream(String),

    /// Building the outbound request failed.
    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    /// The upstream call itself failed.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    /// The upstream did not answer in time.
    #[error("upstream timed out after {0} seconds")]
    Timeout(u64),
}

impl IntoResponse for HopError {
    fn into_response(self) -> Response {
        let status = match &self {
            HopError::Trace(_) | HopError::InvalidUpstream(_) | HopError::Request(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            HopError::Upstream(_) => StatusCode::BAD_GATEWAY,
            HopError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        };
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hop_error_status() {
        let resp = HopError::from(TraceError::InvalidTraceIdentity).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = HopError::Timeout(5).into_response();
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_trace_error_message() {
        assert_eq!(TraceError::InvalidTraceIdentity.to_string(), "invalid trace identity");
    }
}
