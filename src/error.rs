//! Structured error types for dashgrid.
//!
//! The transformation pipeline itself never lets an error escape to the
//! host (see the recovery rules in the crate docs); these types cover the
//! explicit boundary APIs (configuration parsing, capability results).

/// All errors that can occur in dashgrid configuration and capability handling.
#[derive(Debug, thiserror::Error)]
pub enum DashGridError {
    /// Configuration JSON could not be deserialized.
    #[error("config parsing: {0}")]
    Config(#[from] serde_json::Error),

    /// A host-supplied capability callback reported a failure.
    #[error("capability '{name}' failed: {message}")]
    Capability {
        /// Which capability failed (e.g. `sortScript:amount`, `load`).
        name: String,
        /// Failure detail as reported by the callback.
        message: String,
    },

    /// Catch-all for string errors at the host boundary.
    #[error("{0}")]
    Other(String),
}

impl DashGridError {
    /// Build a capability failure with a named source.
    pub fn capability(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Capability {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DashGridError>;

impl From<String> for DashGridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for DashGridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}
