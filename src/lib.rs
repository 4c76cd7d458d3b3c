//! Trace identity propagation across service hops.
//!
//! A request keeps one entry id for its whole journey through the fleet.
//! Each hop gets its own current id and remembers the hop that called it,
//! carried between services in `X-Entry-Tid`, `X-Curr-Tid` and `X-Prev-Tid`.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod trace;

pub use config::HopConfig;
pub use error::{HopError, TraceError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use trace::{TraceIdentity, Tracer};
