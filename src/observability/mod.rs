//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!
//! Every request runs inside a `hop` span carrying
//! entry_tid / curr_tid / prev_tid, so log lines from any
//! subsystem can be joined back into one trace chain.
//! ```

pub mod logging;

pub use logging::init_logging;
