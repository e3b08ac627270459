//! End-to-end tests for the OVHStack project and data stacks.
//!
//! Every test runs in-process against [`LocalCloudProvider`] and an output
//! store, so no cloud account is needed:
//! ```text
//! cargo test -p ovhstack-integration
//! ```

use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::Result;
use ovhstack_cloud::LocalCloudProvider;
use ovhstack_core::{OutputStore, StackConfig};
use ovhstack_stacks::{MainStackOutput, ProjectStack};

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Configuration for `env` with the lifecycle step disabled.
#[must_use]
pub fn test_config(env: &str) -> StackConfig {
    init_tracing();
    StackConfig::builder()
        .environment(Some(env.to_owned()))
        .skip_lifecycle(true)
        .build()
}

/// Deploy the project stack so the data stack can resolve its project id.
pub async fn deploy_project(
    config: &StackConfig,
    provider: &LocalCloudProvider,
    outputs: &dyn OutputStore,
) -> Result<MainStackOutput> {
    Ok(ProjectStack::new(config)?.deploy(provider, outputs).await?)
}

/// Write an empty lifecycle rule document into `dir`.
pub fn write_rule_file(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("filigrane_lifecycle.json");
    std::fs::write(&path, r#"{"Rules": []}"#)?;
    Ok(path)
}

/// Write an executable shell script standing in for the S3 client.
///
/// Each run appends its arguments and the credential variables it sees to
/// `<dir>/invocation.log`, then exits with `exit_code`.
#[cfg(unix)]
pub fn write_fake_cli(dir: &Path, exit_code: i32) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let log = dir.join("invocation.log");
    let script = dir.join("fake-s3-cli");
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\necho \"$@\" >> {log}\necho \"$AWS_ACCESS_KEY_ID $AWS_SECRET_ACCESS_KEY\" >> {log}\necho failing >&2\nexit {exit_code}\n",
            log = log.display()
        ),
    )?;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;
    Ok(script)
}

mod test_deploy;
mod test_lifecycle;
mod test_naming;
mod test_policy;
