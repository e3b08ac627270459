//! The platform's resource catalog: which buckets and service accounts
//! exist, what each account may do, and the fixed project attributes.

use ovhstack_cloud::{ProjectPlan, ProjectSpec};
use ovhstack_core::Environment;
use ovhstack_iam_core::{IamError, PermissionMatrix};

/// Stack project name of the project stack.
pub const PROJECT_STACK: &str = "main";

/// Stack project name of the data stack.
pub const DATA_STACK: &str = "data";

/// Bucket purposes, in declaration order.
pub const BUCKET_PURPOSES: [&str; 5] = [
    "raw-file",
    "raw-file-minified",
    "watermark-doc",
    "full-pdf",
    "filigrane",
];

/// Service-account purposes, in declaration order.
pub const USER_PURPOSES: [&str; 7] = [
    "api-tenant",
    "pdf-generator",
    "process-file",
    "bo",
    "task-scheduler",
    "file-analysis",
    "filigranefacile",
];

/// Role attached to every service account.
pub const USER_ROLE: &str = "objectstore_operator";

/// Bucket receiving the out-of-band lifecycle rule.
pub const LIFECYCLE_BUCKET: &str = "filigrane";

/// Service account whose credential applies the lifecycle rule.
pub const LIFECYCLE_OWNER: &str = "filigranefacile";

/// Default user -> bucket -> actions table, keyed by purpose.
pub fn default_permissions() -> Result<PermissionMatrix, IamError> {
    let mut matrix = PermissionMatrix::new();
    matrix
        .grant_parsed("api-tenant", "raw-file", &["get", "put", "delete", "list"])?
        .grant_parsed("api-tenant", "raw-file-minified", &["get", "list"])?
        .grant_parsed("api-tenant", "watermark-doc", &["get", "list"])?
        .grant_parsed("api-tenant", "full-pdf", &["get", "list"])?
        .grant_parsed("pdf-generator", "raw-file", &["get", "list"])?
        .grant_parsed("pdf-generator", "watermark-doc", &["put", "list"])?
        .grant_parsed("pdf-generator", "full-pdf", &["put", "list"])?
        .grant_parsed("pdf-generator", "filigrane", &["get", "put", "list"])?
        .grant_parsed("process-file", "raw-file", &["get", "list"])?
        .grant_parsed("process-file", "raw-file-minified", &["put", "list"])?
        .grant_parsed("bo", "raw-file", &["get", "list"])?
        .grant_parsed("bo", "watermark-doc", &["get", "list"])?
        .grant_parsed("file-analysis", "raw-file", &["get", "list"])?
        .grant_parsed(
            "filigranefacile",
            "filigrane",
            &["put", "list", "get-lifecycle", "put-lifecycle", "get"],
        )?;
    for bucket in BUCKET_PURPOSES {
        matrix.grant_parsed("task-scheduler", bucket, &["delete", "list"])?;
    }
    Ok(matrix)
}

/// The cloud project of `env`.
#[must_use]
pub fn project_spec(env: &Environment) -> ProjectSpec {
    ProjectSpec {
        name: format!("P-DossierFacile-{env}"),
        description: format!("Pulumi managed project for env : {env}"),
        ovh_subsidiary: "FR".to_owned(),
        plan: ProjectPlan {
            plan_code: "project.2018".to_owned(),
            pricing_mode: "default".to_owned(),
            duration: "P1M".to_owned(),
        },
    }
}
