//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the upstream is an absolute plain-HTTP URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HopConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{uri::Scheme, Uri};
use thiserror::Error;

use crate::config::schema::HopConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("upstream.url '{0}' must be an absolute http:// URL")]
    UpstreamUrl(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Check `config` and collect every problem found.
pub fn validate_config(config: &HopConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Some(url) = &config.upstream.url {
        let valid = url
            .parse::<Uri>()
            .map(|uri| uri.scheme() == Some(&Scheme::HTTP) && uri.authority().is_some())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::UpstreamUrl(url.clone()));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
