//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeouts, access log)
//!     → middleware/trace_context.rs (parse or originate identity, embed)
//!     → hop handler
//!         → no upstream: answer with the identity as JSON
//!         → upstream: chain identity, rewrite trace headers, forward
//!     → response carries this hop's identity headers
//! ```

pub mod middleware;
pub mod server;

pub use middleware::{trace_context_middleware, TraceContextState};
pub use server::HttpServer;
