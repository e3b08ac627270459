//! Resource specs submitted to the provider and the resources it returns.

use chrono::{DateTime, Utc};
use ovhstack_core::AccessKeyPair;
use serde::{Deserialize, Serialize};

/// Billing plan of a cloud project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPlan {
    /// Plan code (e.g. `project.2018`).
    pub plan_code: String,
    /// Pricing mode (e.g. `default`, pay-as-you-go).
    pub pricing_mode: String,
    /// ISO-8601 billing period (e.g. `P1M`).
    pub duration: String,
}

/// Desired cloud project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    /// Logical name, the reconciliation key.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Billing subsidiary (e.g. `FR`).
    pub ovh_subsidiary: String,
    /// Billing plan.
    pub plan: ProjectPlan,
}

/// A provisioned cloud project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Provider-generated project identifier.
    pub id: String,
    /// Logical name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Server-side encryption algorithm of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SseAlgorithm {
    /// AES-256 managed keys.
    #[serde(rename = "AES256")]
    Aes256,
}

/// Desired object-storage bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSpec {
    /// Owning project.
    pub project_id: String,
    /// Bucket name, the reconciliation key within the project.
    pub name: String,
    /// Region (e.g. `EU-WEST-PAR`).
    pub region: String,
    /// Server-side encryption.
    pub encryption: SseAlgorithm,
}

/// A provisioned bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Storage {
    /// Provider-generated identifier.
    pub id: String,
    /// Owning project.
    pub project_id: String,
    /// Bucket name.
    pub name: String,
    /// Region.
    pub region: String,
    /// Server-side encryption.
    pub encryption: SseAlgorithm,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Desired project user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSpec {
    /// Owning project.
    pub project_id: String,
    /// User name, the reconciliation key within the project.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Coarse-grained roles.
    pub role_names: Vec<String>,
}

/// A provisioned project user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Provider-generated user identifier.
    pub id: String,
    /// Owning project.
    pub project_id: String,
    /// User name.
    pub name: String,
    /// Coarse-grained roles.
    pub role_names: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Request for a user's S3 credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSpec {
    /// Logical name.
    pub name: String,
    /// Owning project.
    pub project_id: String,
    /// Credential owner.
    pub user_id: String,
}

/// An issued S3 credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Credential {
    /// Credential owner.
    pub user_id: String,
    /// Access key pair.
    pub keys: AccessKeyPair,
}

/// Request attaching a policy document to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySpec {
    /// Logical name.
    pub name: String,
    /// Owning project.
    pub project_id: String,
    /// Policy holder.
    pub user_id: String,
    /// Policy document JSON.
    pub policy: String,
}
