//! Side-effect-free descriptions of what a deployment would submit.

use std::collections::BTreeMap;

use ovhstack_cloud::{ProjectSpec, SseAlgorithm};
use ovhstack_core::StackPath;
use ovhstack_iam_model::PolicyDocument;
use serde::Serialize;

/// Desired state of the project stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStackPlan {
    /// Stack address.
    pub stack: StackPath,
    /// Project to create, or `None` when an existing project is referenced.
    pub project: Option<ProjectSpec>,
    /// Referenced project id, when configured.
    pub project_id: Option<String>,
}

/// A bucket the data stack will create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedStorage {
    /// Bucket name.
    pub name: String,
    /// Region.
    pub region: String,
    /// Server-side encryption.
    pub encryption: SseAlgorithm,
}

/// A service account the data stack will create, with its credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedUser {
    /// User name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Roles.
    pub role_names: Vec<String>,
}

/// The lifecycle command the data stack will run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedLifecycle {
    /// Target bucket.
    pub bucket: String,
    /// Service account whose credential is used.
    pub owner: String,
    /// Program and arguments.
    pub command: Vec<String>,
}

/// Desired state of the data stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStackPlan {
    /// Stack address.
    pub stack: StackPath,
    /// Configured project id; otherwise resolved from the project stack at deploy time.
    pub project_id: Option<String>,
    /// Buckets, in declaration order.
    pub storages: Vec<PlannedStorage>,
    /// Service accounts, in declaration order.
    pub users: Vec<PlannedUser>,
    /// Compiled policy per user.
    pub policies: BTreeMap<String, PolicyDocument>,
    /// Lifecycle step, unless disabled.
    pub lifecycle: Option<PlannedLifecycle>,
    /// Grants that reference buckets this stack does not create.
    pub warnings: Vec<String>,
}

/// Plan of either stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StackPlan {
    /// Project stack plan.
    Project(ProjectStackPlan),
    /// Data stack plan.
    Data(DataStackPlan),
}
