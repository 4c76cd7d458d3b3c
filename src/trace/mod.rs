//! Trace identity propagation.
//!
//! # Data Flow
//! ```text
//! inbound headers
//!     → codec.rs (read X-Curr-Tid / X-Prev-Tid / X-Entry-Tid)
//!     → identity.rs (validity check; originate a root if invalid)
//!     → carrier.rs (embed into the request scope)
//!     → handler (retrieve / must_retrieve)
//!     → tracer.rs (chain a child for each outbound call)
//!     → codec.rs (write child onto outbound headers)
//! ```
//!
//! # Design Decisions
//! - Identities are plain values; each hop clones and never mutates them
//! - The id generator is a strategy owned by a `Tracer`, not a global
//! - Parsing never fails; validity is checked by whoever uses the result

pub mod carrier;
pub mod codec;
pub mod generator;
pub mod identity;
pub mod tracer;

pub use carrier::{embed, must_retrieve, retrieve, RequestScope};
pub use codec::{
    read_headers, strip_headers, write_headers, CURR_TID, ENTRY_TID, PREV_TID, X_CURR_TID, X_ENTRY_TID,
    X_PREV_TID,
};
pub use generator::{IdGenerator, SequenceGenerator, UuidGenerator, UuidVersion};
pub use identity::TraceIdentity;
pub use tracer::Tracer;
