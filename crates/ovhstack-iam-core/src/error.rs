//! IAM error types.

use ovhstack_iam_model::ModelError;

/// Errors raised while building or loading a permission matrix.
#[derive(Debug, thiserror::Error)]
pub enum IamError {
    /// An action or action set is invalid.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A grant names an empty user or bucket.
    #[error("permission grant has an empty {0} name")]
    EmptyName(&'static str),

    /// A permission matrix document could not be decoded.
    #[error("invalid permission matrix document: {0}")]
    InvalidDocument(#[source] serde_json::Error),
}
