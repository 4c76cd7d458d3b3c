//! Binding a trace identity to a request scope.
//!
//! The scope itself belongs to the HTTP stack (`http::Extensions`). This
//! module only derives a scope with one extra binding and looks it up again,
//! keyed by a type nobody outside this module can name.

use axum::http::{Extensions, Request};

use crate::error::TraceError;
use crate::trace::identity::TraceIdentity;

/// Private key under which the identity is stored.
#[derive(Debug, Clone)]
struct Binding(TraceIdentity);

/// A request-scoped value store.
pub trait RequestScope: Sized {
    /// Return this scope with `value` bound under its type.
    fn with_value<T>(self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static;

    /// Look up the value bound under type `T`.
    fn lookup<T>(&self) -> Option<&T>
    where
        T: Clone + Send + Sync + 'static;
}

impl RequestScope for Extensions {
    fn with_value<T>(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.insert(value);
        self
    }

    fn lookup<T>(&self) -> Option<&T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.get::<T>()
    }
}

impl<B> RequestScope for Request<B> {
    fn with_value<T>(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.extensions_mut().insert(value);
        self
    }

    fn lookup<T>(&self) -> Option<&T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.extensions().get::<T>()
    }
}

/// Bind `identity` to `scope`. Rejects invalid identities.
pub fn embed<S: RequestScope>(identity: TraceIdentity, scope: S) -> Result<S, TraceError> {
    if !identity.is_valid() {
        return Err(TraceError::InvalidTraceIdentity);
    }
    Ok(scope.with_value(Binding(identity)))
}

/// The identity bound to `scope`, if any. An invalid binding counts as absent.
pub fn retrieve<S: RequestScope>(scope: &S) -> Option<TraceIdentity> {
    scope
        .lookup::<Binding>()
        .filter(|binding| binding.0.is_valid())
        .map(|binding| binding.0.clone())
}

/// Like [`retrieve`], for code that only runs after the identity was embedded.
///
/// # Panics
///
/// Panics when no valid identity is bound, which means the embedding step was
/// skipped upstream.
pub fn must_retrieve<S: RequestScope>(scope: &S) -> TraceIdentity {
    match retrieve(scope) {
        Some(identity) => identity,
        None => panic!("trace identity should be embedded into the request scope before it is read"),
    }
}
