//! The project stack: one cloud project per environment.

use ovhstack_cloud::CloudProvider;
use ovhstack_core::{Environment, OutputStore, STACK_DATA_KEY, StackConfig, export_output};
use tracing::info;

use crate::catalog::project_spec;
use crate::error::DeployResult;
use crate::output::{MainStackOutput, main_stack_path};
use crate::plan::ProjectStackPlan;

/// Provisions (or references) the environment's cloud project and exports
/// its id.
#[derive(Debug)]
pub struct ProjectStack<'a> {
    config: &'a StackConfig,
    env: Environment,
}

impl<'a> ProjectStack<'a> {
    /// Bind the stack to a configuration.
    ///
    /// # Errors
    /// Fails if the environment is unset or invalid, or if the organization
    /// is not a single path segment.
    pub fn new(config: &'a StackConfig) -> DeployResult<Self> {
        let env = config.environment()?;
        config.organization()?;
        Ok(Self { config, env })
    }

    /// Target environment.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Describe the deployment without side effects.
    #[must_use]
    pub fn plan(&self) -> ProjectStackPlan {
        let stack = main_stack_path(&self.config.organization, &self.env);
        match &self.config.project_id {
            Some(id) => ProjectStackPlan {
                stack,
                project: None,
                project_id: Some(id.clone()),
            },
            None => ProjectStackPlan {
                stack,
                project: Some(project_spec(&self.env)),
                project_id: None,
            },
        }
    }

    /// Create or reference the project and export [`MainStackOutput`].
    ///
    /// # Errors
    /// Propagates provider rejections and output store failures.
    pub async fn deploy(
        &self,
        provider: &dyn CloudProvider,
        outputs: &dyn OutputStore,
    ) -> DeployResult<MainStackOutput> {
        let project_id = if let Some(id) = &self.config.project_id {
            info!(project_id = %id, env = %self.env, "referencing existing project");
            id.clone()
        } else {
            let project = provider.create_project(&project_spec(&self.env)).await?;
            info!(project_id = %project.id, name = %project.name, "project ready");
            project.id
        };

        let output = MainStackOutput { project_id };
        export_output(
            outputs,
            &main_stack_path(&self.config.organization, &self.env),
            STACK_DATA_KEY,
            &output,
        )?;
        Ok(output)
    }
}
