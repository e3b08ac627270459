//! Records exported by each stack and the lookups downstream consumers use.
//!
//! Field names are part of the contract: downstream deployments bind to
//! `project_id`, `storage_names` and `s3_users` directly.

use std::collections::HashSet;
use std::fmt;

use ovhstack_core::{
    Environment, OutputStore, STACK_DATA_KEY, StackPath, StackResult, require_output,
};
use serde::{Deserialize, Serialize};

use crate::catalog::{DATA_STACK, PROJECT_STACK};
use crate::error::{DeployError, DeployResult};

/// Output of the project stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainStackOutput {
    /// Provider-generated project identifier.
    pub project_id: String,
}

/// One service account's credential as exported by the data stack.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3UserOutput {
    /// Service-account name.
    pub user_name: String,
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
}

impl fmt::Debug for S3UserOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3UserOutput")
            .field("user_name", &self.user_name)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct RawDataStackOutput {
    storage_names: Vec<String>,
    s3_users: Vec<S3UserOutput>,
}

/// Output of the data stack.
///
/// User names are unique; [`DataStackOutput::new`] and deserialization both
/// enforce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDataStackOutput")]
pub struct DataStackOutput {
    storage_names: Vec<String>,
    s3_users: Vec<S3UserOutput>,
}

impl DataStackOutput {
    /// Build an output record.
    ///
    /// # Errors
    /// Returns [`DeployError::DuplicateUser`] if two entries share a user name.
    pub fn new(storage_names: Vec<String>, s3_users: Vec<S3UserOutput>) -> DeployResult<Self> {
        let mut seen = HashSet::new();
        for user in &s3_users {
            if !seen.insert(user.user_name.as_str()) {
                return Err(DeployError::DuplicateUser(user.user_name.clone()));
            }
        }
        Ok(Self {
            storage_names,
            s3_users,
        })
    }

    /// Bucket names, in declaration order.
    #[must_use]
    pub fn storage_names(&self) -> &[String] {
        &self.storage_names
    }

    /// Service-account credentials, in declaration order.
    #[must_use]
    pub fn s3_users(&self) -> &[S3UserOutput] {
        &self.s3_users
    }

    /// Credential of `user_name`, if exported.
    #[must_use]
    pub fn user(&self, user_name: &str) -> Option<&S3UserOutput> {
        self.s3_users.iter().find(|u| u.user_name == user_name)
    }
}

impl TryFrom<RawDataStackOutput> for DataStackOutput {
    type Error = DeployError;

    fn try_from(raw: RawDataStackOutput) -> Result<Self, Self::Error> {
        Self::new(raw.storage_names, raw.s3_users)
    }
}

/// Address of the project stack for `env`.
#[must_use]
pub fn main_stack_path(organization: &str, env: &Environment) -> StackPath {
    StackPath::new(organization, PROJECT_STACK, env.clone())
}

/// Address of the data stack for `env`.
#[must_use]
pub fn data_stack_path(organization: &str, env: &Environment) -> StackPath {
    StackPath::new(organization, DATA_STACK, env.clone())
}

/// Read the project stack's output.
///
/// # Errors
/// Fails with `OutputNotFound` if the stack was never deployed and with
/// `OutputShape` if the stored record no longer matches.
pub fn get_main_stack_output(
    store: &dyn OutputStore,
    organization: &str,
    env: &Environment,
) -> StackResult<MainStackOutput> {
    require_output(store, &main_stack_path(organization, env), STACK_DATA_KEY)
}

/// Read the data stack's output.
///
/// # Errors
/// See [`get_main_stack_output`].
pub fn get_data_stack_output(
    store: &dyn OutputStore,
    organization: &str,
    env: &Environment,
) -> StackResult<DataStackOutput> {
    require_output(store, &data_stack_path(organization, env), STACK_DATA_KEY)
}
