//! Errors raised while building policy model values.

/// Policy model error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The action is not part of the supported storage vocabulary.
    #[error("unknown storage action: {0:?}")]
    UnknownAction(String),

    /// An action set must allow at least one action.
    #[error("action set must not be empty")]
    EmptyActionSet,

    /// A resource string is not an S3 bucket ARN.
    #[error("not an S3 bucket ARN: {0:?}")]
    InvalidArn(String),
}
