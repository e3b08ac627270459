//! In-process emulator of the provider control plane.
//!
//! [`LocalCloudProvider`] keeps every resource in `DashMap`s keyed by its
//! reconciliation key and behaves like the real control plane where it
//! matters to the stacks:
//!
//! - re-submitting a spec returns the existing resource,
//! - each user owns exactly one credential,
//! - policies are parsed and every statement must target a bucket that
//!   exists in the user's project, otherwise the policy is rejected.
//!
//! State can be saved to and restored from a JSON snapshot so separate
//! deployments (project stack, then data stack) see the same resources.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use ovhstack_core::AccessKeyPair;
use ovhstack_iam_model::PolicyDocument;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::CloudProvider;
use crate::spec::{
    CredentialSpec, PolicySpec, Project, ProjectSpec, S3Credential, Storage, StorageSpec, User,
    UserSpec,
};

/// Serializable snapshot of the emulator state.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocalState {
    projects: Vec<Project>,
    storages: Vec<Storage>,
    users: Vec<User>,
    credentials: Vec<S3Credential>,
    policies: Vec<(String, PolicyDocument)>,
}

/// In-memory provider control plane.
#[derive(Debug, Default)]
pub struct LocalCloudProvider {
    /// Project name -> project.
    projects: DashMap<String, Project>,
    /// (project id, bucket name) -> bucket.
    storages: DashMap<(String, String), Storage>,
    /// (project id, user name) -> user.
    users: DashMap<(String, String), User>,
    /// User id -> credential.
    credentials: DashMap<String, S3Credential>,
    /// User id -> attached policy.
    policies: DashMap<String, PolicyDocument>,
}

/// Generate a 32-character hex identifier.
fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

impl LocalCloudProvider {
    /// Create an empty control plane.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a control plane from a snapshot, or start empty if `path` does
    /// not exist.
    pub fn load(path: &Path) -> ProviderResult<Self> {
        let raw = match std::fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(source) => {
                return Err(ProviderError::StateIo {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        let state: LocalState =
            serde_json::from_slice(&raw).map_err(|source| ProviderError::StateCorrupt {
                path: path.display().to_string(),
                source,
            })?;

        let provider = Self::new();
        for project in state.projects {
            provider.projects.insert(project.name.clone(), project);
        }
        for storage in state.storages {
            provider
                .storages
                .insert((storage.project_id.clone(), storage.name.clone()), storage);
        }
        for user in state.users {
            provider
                .users
                .insert((user.project_id.clone(), user.name.clone()), user);
        }
        for credential in state.credentials {
            provider
                .credentials
                .insert(credential.user_id.clone(), credential);
        }
        for (user_id, policy) in state.policies {
            provider.policies.insert(user_id, policy);
        }

        debug!(path = %path.display(), "restored provider state");
        Ok(provider)
    }

    /// Write a snapshot of the current state to `path`.
    pub fn save(&self, path: &Path) -> ProviderResult<()> {
        let mut state = LocalState {
            projects: self.projects.iter().map(|r| r.value().clone()).collect(),
            storages: self.storages.iter().map(|r| r.value().clone()).collect(),
            users: self.users.iter().map(|r| r.value().clone()).collect(),
            credentials: self.credentials.iter().map(|r| r.value().clone()).collect(),
            policies: self
                .policies
                .iter()
                .map(|r| (r.key().clone(), r.value().clone()))
                .collect(),
        };
        // DashMap iteration order is arbitrary; sort for stable snapshots.
        state.projects.sort_by(|a, b| a.name.cmp(&b.name));
        state.storages.sort_by(|a, b| a.name.cmp(&b.name));
        state.users.sort_by(|a, b| a.name.cmp(&b.name));
        state.credentials.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        state.policies.sort_by(|a, b| a.0.cmp(&b.0));

        let io_err = |source| ProviderError::StateIo {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_vec_pretty(&state).map_err(|source| {
            ProviderError::StateCorrupt {
                path: path.display().to_string(),
                source,
            }
        })?;
        std::fs::write(path, body).map_err(io_err)
    }

    /// Number of buckets across all projects.
    #[must_use]
    pub fn storage_count(&self) -> usize {
        self.storages.len()
    }

    /// Number of users across all projects.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// The user named `name` in `project_id`.
    #[must_use]
    pub fn user(&self, project_id: &str, name: &str) -> Option<User> {
        self.users
            .get(&(project_id.to_owned(), name.to_owned()))
            .map(|u| u.clone())
    }

    /// The policy currently attached to `user_id`.
    #[must_use]
    pub fn policy(&self, user_id: &str) -> Option<PolicyDocument> {
        self.policies.get(user_id).map(|p| p.clone())
    }

    fn project_exists(&self, project_id: &str) -> bool {
        self.projects.iter().any(|p| p.id == project_id)
    }

    fn require_project(&self, project_id: &str) -> ProviderResult<()> {
        if self.project_exists(project_id) {
            Ok(())
        } else {
            Err(ProviderError::NotFound {
                kind: "project",
                id: project_id.to_owned(),
            })
        }
    }

    fn find_user(&self, project_id: &str, user_id: &str) -> ProviderResult<User> {
        self.users
            .iter()
            .find(|u| u.project_id == project_id && u.id == user_id)
            .map(|u| u.value().clone())
            .ok_or_else(|| ProviderError::NotFound {
                kind: "user",
                id: user_id.to_owned(),
            })
    }
}

#[async_trait]
impl CloudProvider for LocalCloudProvider {
    async fn create_project(&self, spec: &ProjectSpec) -> ProviderResult<Project> {
        let project = self
            .projects
            .entry(spec.name.clone())
            .or_insert_with(|| {
                info!(project = %spec.name, "project created");
                Project {
                    id: generate_id(),
                    name: spec.name.clone(),
                    created_at: Utc::now(),
                }
            })
            .clone();
        Ok(project)
    }

    async fn create_storage(&self, spec: &StorageSpec) -> ProviderResult<Storage> {
        self.require_project(&spec.project_id)?;

        let key = (spec.project_id.clone(), spec.name.clone());
        if let Some(existing) = self.storages.get(&key) {
            if existing.region != spec.region || existing.encryption != spec.encryption {
                return Err(ProviderError::Conflict {
                    kind: "storage",
                    name: spec.name.clone(),
                });
            }
            return Ok(existing.clone());
        }

        let storage = Storage {
            id: generate_id(),
            project_id: spec.project_id.clone(),
            name: spec.name.clone(),
            region: spec.region.clone(),
            encryption: spec.encryption,
            created_at: Utc::now(),
        };
        self.storages.insert(key, storage.clone());
        info!(bucket = %spec.name, region = %spec.region, "storage created");
        Ok(storage)
    }

    async fn create_user(&self, spec: &UserSpec) -> ProviderResult<User> {
        self.require_project(&spec.project_id)?;

        let user = self
            .users
            .entry((spec.project_id.clone(), spec.name.clone()))
            .or_insert_with(|| {
                info!(user = %spec.name, "user created");
                User {
                    id: generate_id(),
                    project_id: spec.project_id.clone(),
                    name: spec.name.clone(),
                    role_names: spec.role_names.clone(),
                    created_at: Utc::now(),
                }
            })
            .clone();
        Ok(user)
    }

    async fn create_s3_credential(&self, spec: &CredentialSpec) -> ProviderResult<S3Credential> {
        self.require_project(&spec.project_id)?;
        self.find_user(&spec.project_id, &spec.user_id)?;

        let credential = self
            .credentials
            .entry(spec.user_id.clone())
            .or_insert_with(|| {
                info!(credential = %spec.name, "s3 credential issued");
                S3Credential {
                    user_id: spec.user_id.clone(),
                    keys: AccessKeyPair {
                        access_key_id: generate_id(),
                        secret_access_key: generate_id(),
                    },
                }
            })
            .clone();
        Ok(credential)
    }

    async fn put_s3_policy(&self, spec: &PolicySpec) -> ProviderResult<()> {
        self.require_project(&spec.project_id)?;
        self.find_user(&spec.project_id, &spec.user_id)?;

        let rejected = |reason: String| ProviderError::Rejected {
            resource: spec.name.clone(),
            reason,
        };

        let document = PolicyDocument::from_json(&spec.policy)
            .map_err(|e| rejected(format!("invalid policy syntax: {e}")))?;

        for statement in &document.statements {
            let buckets = statement.buckets().map_err(|e| rejected(e.to_string()))?;
            for bucket in buckets {
                let key = (spec.project_id.clone(), bucket.to_owned());
                if !self.storages.contains_key(&key) {
                    return Err(rejected(format!(
                        "statement {} references unknown bucket {bucket}",
                        statement.sid
                    )));
                }
            }
        }

        self.policies.insert(spec.user_id.clone(), document);
        info!(policy = %spec.name, "s3 policy attached");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ovhstack_iam_model::{ActionSet, Statement};

    use super::*;
    use crate::spec::{ProjectPlan, SseAlgorithm};

    fn project_spec() -> ProjectSpec {
        ProjectSpec {
            name: "P-Test-prod".to_owned(),
            description: "test".to_owned(),
            ovh_subsidiary: "FR".to_owned(),
            plan: ProjectPlan {
                plan_code: "project.2018".to_owned(),
                pricing_mode: "default".to_owned(),
                duration: "P1M".to_owned(),
            },
        }
    }

    fn storage_spec(project_id: &str, name: &str) -> StorageSpec {
        StorageSpec {
            project_id: project_id.to_owned(),
            name: name.to_owned(),
            region: "EU-WEST-PAR".to_owned(),
            encryption: SseAlgorithm::Aes256,
        }
    }

    fn user_spec(project_id: &str, name: &str) -> UserSpec {
        UserSpec {
            project_id: project_id.to_owned(),
            name: name.to_owned(),
            description: format!("User {name}"),
            role_names: vec!["objectstore_operator".to_owned()],
        }
    }

    fn policy_for(bucket: &str) -> String {
        PolicyDocument::new(vec![Statement::allow_bucket(
            format!("u-{bucket}"),
            bucket,
            ActionSet::parse(["get"]).unwrap(),
        )])
        .to_json()
        .unwrap()
    }

    #[tokio::test]
    async fn test_should_reuse_identity_on_resubmission() {
        let provider = LocalCloudProvider::new();
        let first = provider.create_project(&project_spec()).await.unwrap();
        let second = provider.create_project(&project_spec()).await.unwrap();
        assert_eq!(first.id, second.id);

        let u1 = provider.create_user(&user_spec(&first.id, "u")).await.unwrap();
        let u2 = provider.create_user(&user_spec(&first.id, "u")).await.unwrap();
        assert_eq!(u1.id, u2.id);
        assert_eq!(provider.user_count(), 1);
    }

    #[tokio::test]
    async fn test_should_issue_single_credential_per_user() {
        let provider = LocalCloudProvider::new();
        let project = provider.create_project(&project_spec()).await.unwrap();
        let user = provider.create_user(&user_spec(&project.id, "u")).await.unwrap();
        let spec = CredentialSpec {
            name: "cu".to_owned(),
            project_id: project.id.clone(),
            user_id: user.id.clone(),
        };
        let c1 = provider.create_s3_credential(&spec).await.unwrap();
        let c2 = provider.create_s3_credential(&spec).await.unwrap();
        assert_eq!(c1, c2);
        assert_eq!(c1.keys.access_key_id.len(), 32);
        assert_ne!(c1.keys.access_key_id, c1.keys.secret_access_key);
    }

    #[tokio::test]
    async fn test_should_reject_storage_in_unknown_project() {
        let provider = LocalCloudProvider::new();
        let err = provider
            .create_storage(&storage_spec("missing", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotFound { kind: "project", .. }));
    }

    #[tokio::test]
    async fn test_should_attach_policy_for_existing_bucket() {
        let provider = LocalCloudProvider::new();
        let project = provider.create_project(&project_spec()).await.unwrap();
        provider
            .create_storage(&storage_spec(&project.id, "raw-file"))
            .await
            .unwrap();
        let user = provider.create_user(&user_spec(&project.id, "u")).await.unwrap();

        provider
            .put_s3_policy(&PolicySpec {
                name: "pu".to_owned(),
                project_id: project.id.clone(),
                user_id: user.id.clone(),
                policy: policy_for("raw-file"),
            })
            .await
            .unwrap();
        assert_eq!(provider.policy(&user.id).unwrap().statements.len(), 1);
    }

    #[tokio::test]
    async fn test_should_reject_policy_for_unknown_bucket() {
        let provider = LocalCloudProvider::new();
        let project = provider.create_project(&project_spec()).await.unwrap();
        let user = provider.create_user(&user_spec(&project.id, "u")).await.unwrap();

        let err = provider
            .put_s3_policy(&PolicySpec {
                name: "pu".to_owned(),
                project_id: project.id.clone(),
                user_id: user.id.clone(),
                policy: policy_for("ghost"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Rejected { .. }));
        assert!(provider.policy(&user.id).is_none());
    }

    #[tokio::test]
    async fn test_should_reject_malformed_policy() {
        let provider = LocalCloudProvider::new();
        let project = provider.create_project(&project_spec()).await.unwrap();
        let user = provider.create_user(&user_spec(&project.id, "u")).await.unwrap();

        let err = provider
            .put_s3_policy(&PolicySpec {
                name: "pu".to_owned(),
                project_id: project.id.clone(),
                user_id: user.id.clone(),
                policy: "{not json".to_owned(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_should_reject_conflicting_storage_definition() {
        let provider = LocalCloudProvider::new();
        let project = provider.create_project(&project_spec()).await.unwrap();
        provider
            .create_storage(&storage_spec(&project.id, "b-1"))
            .await
            .unwrap();
        let mut moved = storage_spec(&project.id, "b-1");
        moved.region = "GRA".to_owned();
        let err = provider.create_storage(&moved).await.unwrap_err();
        assert!(matches!(err, ProviderError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_should_persist_and_restore_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provider.json");

        let provider = LocalCloudProvider::new();
        let project = provider.create_project(&project_spec()).await.unwrap();
        provider
            .create_storage(&storage_spec(&project.id, "raw-file"))
            .await
            .unwrap();
        provider.save(&path).unwrap();

        let restored = LocalCloudProvider::load(&path).unwrap();
        assert_eq!(restored.storage_count(), 1);
        let again = restored.create_project(&project_spec()).await.unwrap();
        assert_eq!(again.id, project.id);
    }

    #[test]
    fn test_should_start_empty_without_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalCloudProvider::load(&dir.path().join("missing.json")).unwrap();
        assert_eq!(provider.storage_count(), 0);
    }
}
