//! Root creation and parent → child chaining.

use std::sync::Arc;

use crate::error::TraceError;
use crate::trace::generator::{IdGenerator, UuidGenerator};
use crate::trace::identity::TraceIdentity;

/// Creates trace identities using an injected id generator.
///
/// Cheap to clone; share one per process.
#[derive(Clone)]
pub struct Tracer {
    generator: Arc<dyn IdGenerator>,
}

impl Tracer {
    pub fn new(generator: Arc<dyn IdGenerator>) -> Self {
        Self { generator }
    }

    /// Identity for a request that starts a new chain.
    pub fn new_root(&self) -> TraceIdentity {
        let tid = self.generator.generate();
        TraceIdentity {
            entry_id: tid.clone(),
            current_id: tid,
            previous_id: String::new(),
        }
    }

    /// Derive the identity for a downstream call made on behalf of `parent`.
    pub fn chain(&self, parent: &TraceIdentity) -> Result<TraceIdentity, TraceError> {
        if !parent.is_valid() {
            return Err(TraceError::InvalidTraceIdentity);
        }
        Ok(TraceIdentity {
            entry_id: parent.entry_id.clone(),
            previous_id: parent.current_id.clone(),
            current_id: self.generator.generate(),
        })
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::new(Arc::new(UuidGenerator::default()))
    }
}

impl std::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}
