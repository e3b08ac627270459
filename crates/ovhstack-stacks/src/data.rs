//! The data stack: buckets, service accounts, credentials, policies and the
//! lifecycle side effect, all inside the project exported by the project
//! stack.
//!
//! Deployment is strictly sequential:
//!
//! ```text
//! validate + compile (no provider calls)
//!   -> resolve project id (config, then project stack output)
//!   -> buckets -> users + credentials -> policies
//!   -> lifecycle command (owner credential)
//!   -> export DataStackOutput
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

use ovhstack_cloud::{
    CloudProvider, CredentialSpec, PolicySpec, SseAlgorithm, StorageSpec, UserSpec,
};
use ovhstack_core::{Environment, OutputStore, STACK_DATA_KEY, StackConfig, export_output};
use ovhstack_iam_core::{PermissionMatrix, compile_all};
use ovhstack_iam_model::PolicyDocument;
use ovhstack_s3_core::{LifecycleCommand, NamingResolver};
use tracing::{debug, info, warn};

use crate::catalog::{
    BUCKET_PURPOSES, LIFECYCLE_BUCKET, LIFECYCLE_OWNER, USER_PURPOSES, USER_ROLE,
    default_permissions,
};
use crate::error::{DeployError, DeployResult};
use crate::output::{
    DataStackOutput, S3UserOutput, data_stack_path, get_main_stack_output,
};
use crate::plan::{DataStackPlan, PlannedLifecycle, PlannedStorage, PlannedUser};

/// Provisions the environment's buckets and service accounts.
#[derive(Debug)]
pub struct DataStack<'a> {
    config: &'a StackConfig,
    env: Environment,
    naming: NamingResolver,
    bucket_purposes: Vec<String>,
    user_purposes: Vec<String>,
    /// Purpose-keyed grants.
    permissions: PermissionMatrix,
}

/// Names and compiled policies derived from the catalog.
struct Resolved {
    buckets: Vec<String>,
    users: Vec<String>,
    policies: BTreeMap<String, PolicyDocument>,
    warnings: Vec<String>,
}

impl<'a> DataStack<'a> {
    /// Bind the stack to a configuration using the built-in catalog, or the
    /// permission matrix in `PERMISSIONS_FILE` when set.
    ///
    /// # Errors
    /// Fails on an invalid environment, prefix or permissions file.
    pub fn new(config: &'a StackConfig) -> DeployResult<Self> {
        let permissions = match &config.permissions_file {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| {
                    DeployError::PermissionsFile {
                        path: path.clone(),
                        source,
                    }
                })?;
                info!(path = %path, "using permission matrix override");
                PermissionMatrix::from_json(&raw)?
            }
            None => default_permissions()?,
        };
        Self::with_catalog(
            config,
            BUCKET_PURPOSES.iter().map(|p| (*p).to_owned()).collect(),
            USER_PURPOSES.iter().map(|p| (*p).to_owned()).collect(),
            permissions,
        )
    }

    /// Bind the stack to a custom set of bucket and user purposes.
    ///
    /// # Errors
    /// Fails on an invalid environment, organization or prefix.
    pub fn with_catalog(
        config: &'a StackConfig,
        bucket_purposes: Vec<String>,
        user_purposes: Vec<String>,
        permissions: PermissionMatrix,
    ) -> DeployResult<Self> {
        let env = config.environment()?;
        config.organization()?;
        let naming = NamingResolver::new(config.name_prefix.clone())?;
        Ok(Self {
            config,
            env,
            naming,
            bucket_purposes,
            user_purposes,
            permissions,
        })
    }

    /// Target environment.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Bucket names, in declaration order.
    ///
    /// # Errors
    /// Fails if a purpose does not yield a valid bucket name.
    pub fn bucket_names(&self) -> DeployResult<Vec<String>> {
        Ok(self.naming.bucket_names(&self.env, &self.bucket_purposes)?)
    }

    /// User names, in declaration order.
    ///
    /// # Errors
    /// Fails if a purpose is malformed.
    pub fn user_names(&self) -> DeployResult<Vec<String>> {
        Ok(self.naming.user_names(&self.env, &self.user_purposes)?)
    }

    /// Compiled policy per user name.
    ///
    /// # Errors
    /// Fails if the matrix names an undeclared user or a malformed purpose.
    pub fn policies(&self) -> DeployResult<BTreeMap<String, PolicyDocument>> {
        Ok(self.resolve()?.policies)
    }

    fn resolve(&self) -> DeployResult<Resolved> {
        ensure_unique("bucket", &self.bucket_purposes)?;
        ensure_unique("user", &self.user_purposes)?;
        if let Some(user) = self
            .permissions
            .users()
            .find(|u| !self.user_purposes.iter().any(|p| p.as_str() == *u))
        {
            return Err(DeployError::UndeclaredUser(user.to_owned()));
        }

        // Every declared user gets a policy, an empty one if it has no row.
        let mut permissions = self.permissions.clone();
        for user in &self.user_purposes {
            permissions.add_user(user.as_str());
        }

        let buckets = self.bucket_names()?;
        let users = self.user_names()?;
        let matrix = permissions.resolve(
            |user| self.naming.name(&self.env, user),
            |bucket| self.naming.name(&self.env, bucket),
        )?;

        let mut warnings: Vec<String> = matrix
            .unknown_buckets(&buckets)
            .into_iter()
            .map(|(user, bucket)| {
                warn!(user = %user, bucket = %bucket, "grant on a bucket this stack does not create");
                format!("{user} is granted access to undeclared bucket {bucket}")
            })
            .collect();
        warnings.extend(
            matrix
                .iter()
                .filter(|(_, row)| row.is_empty())
                .map(|(user, _)| format!("{user} has no permissions, its credential is likely unused")),
        );

        Ok(Resolved {
            buckets,
            users,
            policies: compile_all(&matrix),
            warnings,
        })
    }

    fn lifecycle_command(&self) -> DeployResult<LifecycleCommand> {
        Ok(LifecycleCommand::builder()
            .cli(self.config.lifecycle_cli.clone())
            .bucket(self.naming.name(&self.env, LIFECYCLE_BUCKET)?)
            .rule_file(PathBuf::from(&self.config.lifecycle_file))
            .endpoint_url(self.config.lifecycle_endpoint_url.clone())
            .region(self.config.lifecycle_region.clone())
            .build())
    }

    fn lifecycle_owner(&self) -> DeployResult<String> {
        if !self.user_purposes.iter().any(|p| p == LIFECYCLE_OWNER) {
            return Err(DeployError::MissingLifecycleOwner(LIFECYCLE_OWNER.to_owned()));
        }
        Ok(self.naming.name(&self.env, LIFECYCLE_OWNER)?)
    }

    /// Describe the deployment without side effects.
    ///
    /// # Errors
    /// Same validation as [`DataStack::deploy`] performs before its first
    /// provider call.
    pub fn plan(&self) -> DeployResult<DataStackPlan> {
        let resolved = self.resolve()?;

        let lifecycle = if self.config.skip_lifecycle {
            None
        } else {
            let command = self.lifecycle_command()?;
            let mut argv = vec![command.program().to_owned()];
            argv.extend(command.args());
            Some(PlannedLifecycle {
                bucket: command.bucket().to_owned(),
                owner: self.lifecycle_owner()?,
                command: argv,
            })
        };

        Ok(DataStackPlan {
            stack: data_stack_path(&self.config.organization, &self.env),
            project_id: self.config.project_id.clone(),
            storages: resolved
                .buckets
                .iter()
                .map(|name| PlannedStorage {
                    name: name.clone(),
                    region: self.config.storage_region.clone(),
                    encryption: SseAlgorithm::Aes256,
                })
                .collect(),
            users: resolved
                .users
                .iter()
                .map(|name| PlannedUser {
                    name: name.clone(),
                    description: format!("User {name}"),
                    role_names: vec![USER_ROLE.to_owned()],
                })
                .collect(),
            policies: resolved.policies,
            lifecycle,
            warnings: resolved.warnings,
        })
    }

    fn project_id(&self, outputs: &dyn OutputStore) -> DeployResult<String> {
        if let Some(id) = &self.config.project_id {
            return Ok(id.clone());
        }
        get_main_stack_output(outputs, &self.config.organization, &self.env)
            .map(|output| output.project_id)
            .map_err(|source| DeployError::MissingProjectId {
                environment: self.env.to_string(),
                source,
            })
    }

    /// Deploy the stack and export [`DataStackOutput`].
    ///
    /// # Errors
    /// Any validation, provider, lifecycle or output failure aborts the
    /// deployment; resources created before the failure are left in place.
    pub async fn deploy(
        &self,
        provider: &dyn CloudProvider,
        outputs: &dyn OutputStore,
    ) -> DeployResult<DataStackOutput> {
        let resolved = self.resolve()?;
        let lifecycle = if self.config.skip_lifecycle {
            None
        } else {
            Some((self.lifecycle_command()?, self.lifecycle_owner()?))
        };
        let project_id = self.project_id(outputs)?;
        info!(env = %self.env, project_id = %project_id, "deploying data stack");

        let mut storage_names = Vec::with_capacity(resolved.buckets.len());
        for name in &resolved.buckets {
            let storage = provider
                .create_storage(&StorageSpec {
                    project_id: project_id.clone(),
                    name: name.clone(),
                    region: self.config.storage_region.clone(),
                    encryption: SseAlgorithm::Aes256,
                })
                .await?;
            storage_names.push(storage.name);
        }

        let mut user_ids = HashMap::with_capacity(resolved.users.len());
        let mut s3_users = Vec::with_capacity(resolved.users.len());
        for name in &resolved.users {
            let user = provider
                .create_user(&UserSpec {
                    project_id: project_id.clone(),
                    name: name.clone(),
                    description: format!("User {name}"),
                    role_names: vec![USER_ROLE.to_owned()],
                })
                .await?;
            let credential = provider
                .create_s3_credential(&CredentialSpec {
                    name: format!("c{name}"),
                    project_id: project_id.clone(),
                    user_id: user.id.clone(),
                })
                .await?;
            debug!(user = %name, user_id = %user.id, "user and credential ready");

            s3_users.push(S3UserOutput {
                user_name: name.clone(),
                access_key_id: credential.keys.access_key_id.clone(),
                secret_access_key: credential.keys.secret_access_key.clone(),
            });
            user_ids.insert(name.clone(), (user.id, credential.keys));
        }

        for (user, document) in &resolved.policies {
            let Some((user_id, _)) = user_ids.get(user) else {
                return Err(DeployError::UndeclaredUser(user.clone()));
            };
            let policy = document
                .to_json()
                .map_err(|source| DeployError::PolicyEncode {
                    user: user.clone(),
                    source,
                })?;
            provider
                .put_s3_policy(&PolicySpec {
                    name: format!("p{user}"),
                    project_id: project_id.clone(),
                    user_id: user_id.clone(),
                    policy,
                })
                .await?;
        }

        if let Some((command, owner)) = lifecycle {
            let Some((_, keys)) = user_ids.get(&owner) else {
                return Err(DeployError::MissingLifecycleOwner(owner));
            };
            command.apply(keys).await?;
        } else {
            info!("lifecycle command skipped");
        }

        let output = DataStackOutput::new(storage_names, s3_users)?;
        export_output(
            outputs,
            &data_stack_path(&self.config.organization, &self.env),
            STACK_DATA_KEY,
            &output,
        )?;
        info!(
            buckets = output.storage_names().len(),
            users = output.s3_users().len(),
            "data stack deployed"
        );
        Ok(output)
    }
}

/// Reject a purpose list that declares the same purpose twice.
fn ensure_unique(kind: &'static str, purposes: &[String]) -> DeployResult<()> {
    let mut seen = HashSet::with_capacity(purposes.len());
    for purpose in purposes {
        if !seen.insert(purpose.as_str()) {
            return Err(DeployError::DuplicatePurpose {
                kind,
                purpose: purpose.clone(),
            });
        }
    }
    Ok(())
}
