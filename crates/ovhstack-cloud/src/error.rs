//! Provider error types.

/// Errors returned by the provider control plane.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// A referenced resource does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Resource kind (`project`, `user`, ...).
        kind: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// The provider refused the request (quota, permission, invalid policy).
    #[error("{resource} rejected by provider: {reason}")]
    Rejected {
        /// Logical name of the rejected resource.
        resource: String,
        /// Provider-supplied reason.
        reason: String,
    },

    /// The resource name is already used with an incompatible definition.
    #[error("{kind} {name} already exists with a different definition")]
    Conflict {
        /// Resource kind.
        kind: &'static str,
        /// Conflicting name.
        name: String,
    },

    /// Local emulator state could not be read or written.
    #[error("provider state I/O failed for {path}: {source}")]
    StateIo {
        /// The snapshot path.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Local emulator state is corrupt.
    #[error("provider state at {path} is corrupt: {source}")]
    StateCorrupt {
        /// The snapshot path.
        path: String,
        /// The underlying decode error.
        source: serde_json::Error,
    },
}

/// Convenience result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;
