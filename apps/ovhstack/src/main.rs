//! OVHStack - deploys the project and data stacks of one environment.
//!
//! # Usage
//!
//! ```text
//! STACK_ENV=prod ovhstack plan data
//! STACK_ENV=prod ovhstack up project
//! STACK_ENV=prod ovhstack up data
//! STACK_ENV=prod ovhstack output data
//! ```
//!
//! `up` runs against the local provider control plane persisted under
//! `STATE_DIR`; exported outputs are written to `STATE_DIR/outputs`.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STACK_ENV` | *(required)* | Target environment (`[a-z0-9]+`) |
//! | `PROJECT_ID` | *(unset)* | Existing project id; otherwise read from the project stack |
//! | `ORGANIZATION` | `organization` | Organization owning the stacks |
//! | `NAME_PREFIX` | `dossierfacile` | Resource name prefix |
//! | `STORAGE_REGION` | `EU-WEST-PAR` | Bucket region |
//! | `PERMISSIONS_FILE` | *(unset)* | JSON permission matrix override |
//! | `LIFECYCLE_CLI` | `aws` | Client used to apply the lifecycle rule |
//! | `LIFECYCLE_ENDPOINT_URL` | `https://s3.eu-west-par.io.cloud.ovh.net` | S3 endpoint |
//! | `LIFECYCLE_REGION` | `eu-west-par` | S3 region |
//! | `LIFECYCLE_FILE` | `filigrane_lifecycle.json` | Lifecycle rule document |
//! | `SKIP_LIFECYCLE` | `false` | Skip the lifecycle command |
//! | `STATE_DIR` | `.ovhstack` | Local state directory |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use ovhstack_cloud::LocalCloudProvider;
use ovhstack_core::{FileOutputStore, StackConfig};
use ovhstack_stacks::{
    DataStack, ProjectStack, StackPlan, get_data_stack_output, get_main_stack_output,
};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: ovhstack <plan|up|output> <project|data>";

/// What to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Plan,
    Up,
    Output,
}

/// Which stack to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackKind {
    Project,
    Data,
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Parse `<action> <stack>` from the arguments following the program name.
fn parse_args(args: &[String]) -> Result<(Action, StackKind)> {
    let [action, stack] = args else {
        bail!("{USAGE}");
    };
    let action = match action.trim().to_lowercase().as_str() {
        "plan" | "preview" => Action::Plan,
        "up" | "deploy" => Action::Up,
        "output" => Action::Output,
        other => bail!("unknown action {other:?}; {USAGE}"),
    };
    let stack = match stack.trim().to_lowercase().as_str() {
        "project" | "main" => StackKind::Project,
        "data" => StackKind::Data,
        other => bail!("unknown stack {other:?}; {USAGE}"),
    };
    Ok((action, stack))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}

fn outputs_dir(state_dir: &Path) -> PathBuf {
    state_dir.join("outputs")
}

fn provider_snapshot(state_dir: &Path) -> PathBuf {
    state_dir.join("provider.json")
}

async fn run(config: &StackConfig, action: Action, stack: StackKind) -> Result<()> {
    let state_dir = PathBuf::from(&config.state_dir);
    let outputs = FileOutputStore::new(outputs_dir(&state_dir));

    match action {
        Action::Plan => {
            let plan = match stack {
                StackKind::Project => StackPlan::Project(ProjectStack::new(config)?.plan()),
                StackKind::Data => StackPlan::Data(DataStack::new(config)?.plan()?),
            };
            print_json(&plan)
        }
        Action::Up => {
            let snapshot = provider_snapshot(&state_dir);
            let provider = LocalCloudProvider::load(&snapshot)
                .with_context(|| format!("cannot load provider state {}", snapshot.display()))?;

            let result = match stack {
                StackKind::Project => {
                    let stack = ProjectStack::new(config)?;
                    stack
                        .deploy(&provider, &outputs)
                        .await
                        .map(serde_json::to_value)
                }
                StackKind::Data => {
                    let stack = DataStack::new(config)?;
                    stack
                        .deploy(&provider, &outputs)
                        .await
                        .map(serde_json::to_value)
                }
            };

            // Resources created before a failure stay in place.
            provider
                .save(&snapshot)
                .with_context(|| format!("cannot save provider state {}", snapshot.display()))?;

            let output = result.context("deployment failed")??;
            print_json(&output)
        }
        Action::Output => {
            let env = config.environment()?;
            let organization = config.organization()?;
            match stack {
                StackKind::Project => {
                    print_json(&get_main_stack_output(&outputs, organization, &env)?)
                }
                StackKind::Data => {
                    print_json(&get_data_stack_output(&outputs, organization, &env)?)
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = StackConfig::from_env();
    init_tracing(&config.log_level)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (action, stack) = parse_args(&args)?;
    info!(?action, ?stack, env = ?config.environment, "ovhstack starting");

    if let Err(e) = run(&config, action, stack).await {
        error!(error = %e, "ovhstack failed");
        return Err(e);
    }
    Ok(())
}
