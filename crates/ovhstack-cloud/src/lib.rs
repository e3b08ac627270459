//! Cloud provider control-plane interface for OVHStack.
//!
//! Stacks describe desired resources as typed specs and submit them through
//! the [`CloudProvider`] trait. The provider returns generated identifiers and
//! secrets. Reconciliation is keyed on each resource's logical name, so
//! submitting the same spec twice yields the same identity.
//!
//! [`LocalCloudProvider`] is an in-process emulator of the control plane used
//! for local deployments and tests; it optionally persists its state as a JSON
//! snapshot.
//!
//! # Architecture
//!
//! ```text
//! ProjectStack / DataStack
//!        |
//!        v
//! dyn CloudProvider (async)
//!        |
//!        v
//! LocalCloudProvider (DashMap state, JSON snapshot)
//! ```

pub mod error;
pub mod local;
pub mod provider;
pub mod spec;

pub use error::{ProviderError, ProviderResult};
pub use local::LocalCloudProvider;
pub use provider::CloudProvider;
pub use spec::{
    CredentialSpec, PolicySpec, Project, ProjectPlan, ProjectSpec, S3Credential, SseAlgorithm,
    Storage, StorageSpec, User, UserSpec,
};
