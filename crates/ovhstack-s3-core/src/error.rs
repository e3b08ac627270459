//! S3-side error types.

/// Errors raised while deriving resource names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    /// A purpose or prefix is not lowercase kebab-case.
    #[error("invalid {kind} {value:?}: must be lowercase letters, digits, and single hyphens")]
    InvalidSegment {
        /// What was being validated (`prefix` or `purpose`).
        kind: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The derived name is not a valid bucket name.
    #[error("Invalid bucket name: {name}: {reason}")]
    InvalidBucketName {
        /// The invalid bucket name.
        name: String,
        /// The reason for the error.
        reason: String,
    },
}

/// Errors raised while applying a lifecycle configuration.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// The lifecycle rule document does not exist.
    #[error("lifecycle rule file not found: {0}")]
    RuleFileMissing(String),

    /// The command could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The command exited unsuccessfully.
    #[error("lifecycle command for bucket {bucket} failed ({status}): {stderr}")]
    CommandFailed {
        /// Target bucket.
        bucket: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },
}
