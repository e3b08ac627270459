//! The provider control-plane trait.

use async_trait::async_trait;

use crate::error::ProviderResult;
use crate::spec::{
    CredentialSpec, PolicySpec, Project, ProjectSpec, S3Credential, Storage, StorageSpec, User,
    UserSpec,
};

/// Cloud provider control plane.
///
/// Every call is a create-or-reconcile keyed on the request's logical name:
/// when a resource with that name already exists the existing resource is
/// returned instead of a duplicate. Failures are final; callers never retry.
///
/// The trait uses `#[async_trait]` so stacks can hold it as `&dyn CloudProvider`.
#[async_trait]
pub trait CloudProvider: Send + Sync + std::fmt::Debug {
    /// Create (or reuse) a cloud project.
    async fn create_project(&self, spec: &ProjectSpec) -> ProviderResult<Project>;

    /// Create (or reuse) an object-storage bucket in a project.
    async fn create_storage(&self, spec: &StorageSpec) -> ProviderResult<Storage>;

    /// Create (or reuse) a project user.
    async fn create_user(&self, spec: &UserSpec) -> ProviderResult<User>;

    /// Issue (or return) the user's S3 credential.
    async fn create_s3_credential(&self, spec: &CredentialSpec) -> ProviderResult<S3Credential>;

    /// Attach (or replace) the user's S3 policy.
    async fn put_s3_policy(&self, spec: &PolicySpec) -> ProviderResult<()>;
}
