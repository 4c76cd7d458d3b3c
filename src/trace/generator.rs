//! Unique id sources for trace hops.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source of fresh hop identifiers.
///
/// Implementations must return values that are unique across the fleet with
/// overwhelming probability. Any `Fn() -> String` closure also qualifies.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

/// UUID flavour used by [`UuidGenerator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UuidVersion {
    /// Random (OS-seeded CSPRNG).
    #[default]
    UuidV4,
    /// Unix-time ordered with random tail.
    UuidV7,
}

/// Default generator: hyphenated lowercase UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator {
    version: UuidVersion,
}

impl UuidGenerator {
    pub fn new(version: UuidVersion) -> Self {
        Self { version }
    }
}

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        match self.version {
            UuidVersion::UuidV4 => Uuid::new_v4().to_string(),
            UuidVersion::UuidV7 => Uuid::now_v7().to_string(),
        }
    }
}

/// Deterministic generator yielding `{prefix}{n}` with n counting from 1.
///
/// Only unique within one instance; meant for tests and local debugging.
#[derive(Debug)]
pub struct SequenceGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequenceGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequenceGenerator {
    fn generate(&self) -> String {
        // Relaxed is enough: only uniqueness matters.
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }
}
