//! Error types for the OVHStack core.

/// Core error type for OVHStack infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    /// Invalid environment identifier.
    #[error("invalid environment: {0:?} (must be non-empty lowercase letters and digits)")]
    InvalidEnvironment(String),

    /// A stack path component that is not a single path segment.
    #[error("invalid stack path segment: {0:?} (must be a single non-empty path component)")]
    InvalidPathSegment(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required stack output has not been exported.
    #[error("output {key:?} not found for stack {stack}")]
    OutputNotFound {
        /// The stack that was looked up.
        stack: String,
        /// The missing output key.
        key: String,
    },

    /// A stack output exists but does not have the expected shape.
    #[error("output {key:?} of stack {stack} has an unexpected shape: {source}")]
    OutputShape {
        /// The stack that was looked up.
        stack: String,
        /// The output key.
        key: String,
        /// The underlying decode error.
        source: serde_json::Error,
    },

    /// Failure while reading or writing the output state directory.
    #[error("output state I/O failed for {path}: {source}")]
    StateIo {
        /// The file or directory involved.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for OVHStack core operations.
pub type StackResult<T> = Result<T, StackError>;
