//! The trace identity value type.

use serde::{Deserialize, Serialize};

/// Position of one hop inside a trace chain.
///
/// `entry_id` names the hop that originated the chain and stays constant for
/// every descendant. `current_id` names this hop and `previous_id` the hop
/// that called it (empty for a root).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct TraceIdentity {
    pub entry_id: String,
    pub current_id: String,
    pub previous_id: String,
}

impl TraceIdentity {
    /// Build an identity from its three parts as-is.
    pub fn new(
        entry_id: impl Into<String>,
        current_id: impl Into<String>,
        previous_id: impl Into<String>,
    ) -> Self {
        Self {
            entry_id: entry_id.into(),
            current_id: current_id.into(),
            previous_id: previous_id.into(),
        }
    }

    /// Both entry and current ids must be present. `previous_id` is ignored.
    pub fn is_valid(&self) -> bool {
        !self.entry_id.is_empty() && !self.current_id.is_empty()
    }

    /// True for the first hop of a chain.
    pub fn is_root(&self) -> bool {
        self.previous_id.is_empty()
    }
}

impl std::fmt::Display for TraceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.previous_id.is_empty() {
            write!(f, "{}/{}", self.entry_id, self.current_id)
        } else {
            write!(f, "{}/{}<-{}", self.entry_id, self.current_id, self.previous_id)
        }
    }
}
