//! Deployment error types.

use ovhstack_cloud::ProviderError;
use ovhstack_core::StackError;
use ovhstack_iam_core::IamError;
use ovhstack_s3_core::{LifecycleError, NamingError};

/// Errors raised while planning or deploying a stack.
///
/// Every variant is fatal: the deployment stops at the first error and no
/// step is retried.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Configuration or cross-stack output failure.
    #[error(transparent)]
    Stack(#[from] StackError),

    /// Invalid permission matrix.
    #[error(transparent)]
    Iam(#[from] IamError),

    /// A resource name could not be derived.
    #[error(transparent)]
    Naming(#[from] NamingError),

    /// The out-of-band lifecycle command failed.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// The provider rejected a resource.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Neither configuration nor the project stack supplied a project id.
    #[error(
        "no project id for {environment}: set PROJECT_ID or deploy the project stack first ({source})"
    )]
    MissingProjectId {
        /// Target environment.
        environment: String,
        /// The failed output lookup.
        source: StackError,
    },

    /// The permission matrix override could not be read.
    #[error("failed to read permissions file {path}: {source}")]
    PermissionsFile {
        /// Configured path.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The permission matrix grants access to a user the stack does not declare.
    #[error("permission matrix references undeclared user {0}")]
    UndeclaredUser(String),

    /// The lifecycle credential owner is not a declared user.
    #[error("lifecycle credential owner {0} is not a declared user")]
    MissingLifecycleOwner(String),

    /// A bucket or user purpose is declared twice.
    #[error("{kind} purpose {purpose} is declared more than once")]
    DuplicatePurpose {
        /// `bucket` or `user`.
        kind: &'static str,
        /// The repeated purpose.
        purpose: String,
    },

    /// Two exported users share a name.
    #[error("duplicate user {0} in stack output")]
    DuplicateUser(String),

    /// A compiled policy could not be serialized.
    #[error("failed to encode policy for {user}: {source}")]
    PolicyEncode {
        /// Policy holder.
        user: String,
        /// The underlying encode error.
        source: serde_json::Error,
    },
}

/// Convenience result type for deployments.
pub type DeployResult<T> = Result<T, DeployError>;
