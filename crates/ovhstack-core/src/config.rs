//! Configuration management for OVHStack deployments.
//!
//! All configuration is driven by environment variables. Values that have a
//! sensible default fall back to it; the environment identifier and (for the
//! data stack) the project identifier are validated lazily by the accessors
//! so a missing value fails before any provider call is made.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::types::validate_path_segment;
use crate::{Environment, StackError, StackResult};

/// Deployment configuration shared by every stack.
///
/// # Examples
///
/// ```
/// use ovhstack_core::StackConfig;
///
/// let config = StackConfig::builder().environment(Some("prod".into())).build();
/// assert_eq!(config.environment().unwrap().as_str(), "prod");
/// assert_eq!(config.storage_region, "EU-WEST-PAR");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct StackConfig {
    /// Environment identifier (`STACK_ENV`). Required.
    #[builder(default)]
    pub environment: Option<String>,

    /// Cloud project identifier (`PROJECT_ID`). When absent, the data stack
    /// reads it from the project stack's exported output.
    #[builder(default)]
    pub project_id: Option<String>,

    /// Organization owning the stacks.
    #[builder(default = String::from("organization"))]
    pub organization: String,

    /// Prefix applied to every generated resource name.
    #[builder(default = String::from("dossierfacile"))]
    pub name_prefix: String,

    /// Region buckets are created in.
    #[builder(default = String::from("EU-WEST-PAR"))]
    pub storage_region: String,

    /// Optional JSON file overriding the built-in permission matrix.
    #[builder(default)]
    pub permissions_file: Option<String>,

    /// Command-line tool used to apply lifecycle configuration.
    #[builder(default = String::from("aws"))]
    pub lifecycle_cli: String,

    /// S3 endpoint the lifecycle command talks to.
    #[builder(default = String::from("https://s3.eu-west-par.io.cloud.ovh.net"))]
    pub lifecycle_endpoint_url: String,

    /// Region passed to the lifecycle command.
    #[builder(default = String::from("eu-west-par"))]
    pub lifecycle_region: String,

    /// Path of the lifecycle rule document.
    #[builder(default = String::from("filigrane_lifecycle.json"))]
    pub lifecycle_file: String,

    /// Skip the out-of-band lifecycle command.
    #[builder(default = false)]
    pub skip_lifecycle: bool,

    /// Directory holding exported outputs and local provider state.
    #[builder(default = String::from(".ovhstack"))]
    pub state_dir: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl StackConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `STACK_ENV` | *(required)* |
    /// | `PROJECT_ID` | *(unset)* |
    /// | `ORGANIZATION` | `organization` |
    /// | `NAME_PREFIX` | `dossierfacile` |
    /// | `STORAGE_REGION` | `EU-WEST-PAR` |
    /// | `PERMISSIONS_FILE` | *(unset)* |
    /// | `LIFECYCLE_CLI` | `aws` |
    /// | `LIFECYCLE_ENDPOINT_URL` | `https://s3.eu-west-par.io.cloud.ovh.net` |
    /// | `LIFECYCLE_REGION` | `eu-west-par` |
    /// | `LIFECYCLE_FILE` | `filigrane_lifecycle.json` |
    /// | `SKIP_LIFECYCLE` | `false` |
    /// | `STATE_DIR` | `.ovhstack` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        config.environment = lookup("STACK_ENV").filter(|v| !v.is_empty());
        config.project_id = lookup("PROJECT_ID").filter(|v| !v.is_empty());
        if let Some(v) = lookup("ORGANIZATION") {
            config.organization = v;
        }
        if let Some(v) = lookup("NAME_PREFIX") {
            config.name_prefix = v;
        }
        if let Some(v) = lookup("STORAGE_REGION") {
            config.storage_region = v;
        }
        config.permissions_file = lookup("PERMISSIONS_FILE").filter(|v| !v.is_empty());
        if let Some(v) = lookup("LIFECYCLE_CLI") {
            config.lifecycle_cli = v;
        }
        if let Some(v) = lookup("LIFECYCLE_ENDPOINT_URL") {
            config.lifecycle_endpoint_url = v;
        }
        if let Some(v) = lookup("LIFECYCLE_REGION") {
            config.lifecycle_region = v;
        }
        if let Some(v) = lookup("LIFECYCLE_FILE") {
            config.lifecycle_file = v;
        }
        if let Some(v) = lookup("SKIP_LIFECYCLE") {
            config.skip_lifecycle = parse_bool(&v);
        }
        if let Some(v) = lookup("STATE_DIR") {
            config.state_dir = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// The validated environment identifier.
    ///
    /// # Errors
    /// Returns [`StackError::Config`] if `STACK_ENV` is unset, or
    /// [`StackError::InvalidEnvironment`] if it is malformed.
    pub fn environment(&self) -> StackResult<Environment> {
        let raw = self
            .environment
            .as_deref()
            .ok_or_else(|| StackError::Config("STACK_ENV is not set".to_owned()))?;
        Environment::new(raw)
    }

    /// The validated organization name.
    ///
    /// # Errors
    /// Returns [`StackError::InvalidPathSegment`] if `ORGANIZATION` is not a
    /// single path segment, since it addresses stack outputs on disk.
    pub fn organization(&self) -> StackResult<&str> {
        validate_path_segment(&self.organization)?;
        Ok(&self.organization)
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
