//! Out-of-band bucket lifecycle configuration.
//!
//! The provisioning API has no lifecycle-configuration resource, so the rule
//! is applied with the S3 command-line client:
//!
//! ```text
//! AWS_ACCESS_KEY_ID=... AWS_SECRET_ACCESS_KEY=... \
//!   aws s3api put-bucket-lifecycle-configuration \
//!     --bucket <bucket> \
//!     --lifecycle-configuration file://<rule file> \
//!     --endpoint-url <endpoint> \
//!     --region <region>
//! ```
//!
//! Credentials only ever live in the child process environment. The rule
//! document is passed through untouched. Put-lifecycle has overwrite
//! semantics at the provider, so re-applying on every deployment is safe.

use std::path::PathBuf;
use std::process::Stdio;

use ovhstack_core::AccessKeyPair;
use tokio::process::Command;
use tracing::{debug, info};
use typed_builder::TypedBuilder;

use crate::error::LifecycleError;

/// Environment variable carrying the access key to the child process.
pub const ACCESS_KEY_ENV: &str = "AWS_ACCESS_KEY_ID";

/// Environment variable carrying the secret key to the child process.
pub const SECRET_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";

/// A put-bucket-lifecycle-configuration invocation.
///
/// # Examples
///
/// ```
/// use ovhstack_s3_core::LifecycleCommand;
///
/// let cmd = LifecycleCommand::builder()
///     .bucket("dossierfacile-filigrane-prod".into())
///     .rule_file("filigrane_lifecycle.json".into())
///     .build();
/// assert_eq!(cmd.program(), "aws");
/// assert!(cmd.args().contains(&"file://filigrane_lifecycle.json".to_owned()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct LifecycleCommand {
    /// Command-line client to run.
    #[builder(default = String::from("aws"))]
    cli: String,
    /// Target bucket.
    bucket: String,
    /// Lifecycle rule document.
    rule_file: PathBuf,
    /// S3 endpoint URL.
    #[builder(default = String::from("https://s3.eu-west-par.io.cloud.ovh.net"))]
    endpoint_url: String,
    /// S3 region.
    #[builder(default = String::from("eu-west-par"))]
    region: String,
}

impl LifecycleCommand {
    /// Program that will be executed.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.cli
    }

    /// Target bucket.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Command-line arguments, excluding the program.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        vec![
            "s3api".to_owned(),
            "put-bucket-lifecycle-configuration".to_owned(),
            "--bucket".to_owned(),
            self.bucket.clone(),
            "--lifecycle-configuration".to_owned(),
            format!("file://{}", self.rule_file.display()),
            "--endpoint-url".to_owned(),
            self.endpoint_url.clone(),
            "--region".to_owned(),
            self.region.clone(),
        ]
    }

    /// Run the command with `credentials` and wait for it.
    ///
    /// # Errors
    /// - [`LifecycleError::RuleFileMissing`] if the rule document is absent.
    /// - [`LifecycleError::Spawn`] if the program cannot be started.
    /// - [`LifecycleError::CommandFailed`] on a non-zero exit.
    pub async fn apply(&self, credentials: &AccessKeyPair) -> Result<(), LifecycleError> {
        if !tokio::fs::try_exists(&self.rule_file)
            .await
            .unwrap_or(false)
        {
            return Err(LifecycleError::RuleFileMissing(
                self.rule_file.display().to_string(),
            ));
        }

        debug!(
            program = %self.cli,
            bucket = %self.bucket,
            access_key = %credentials.access_key_id,
            "running lifecycle command"
        );

        let output = Command::new(&self.cli)
            .args(self.args())
            .env(ACCESS_KEY_ENV, &credentials.access_key_id)
            .env(SECRET_KEY_ENV, &credentials.secret_access_key)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| LifecycleError::Spawn {
                program: self.cli.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(LifecycleError::CommandFailed {
                bucket: self.bucket.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        info!(bucket = %self.bucket, "lifecycle configuration applied");
        Ok(())
    }
}
