//! Permission matrix -> policy document compiler.
//!
//! Each user's row compiles to one [`PolicyDocument`] holding exactly one
//! allow statement per bucket in the row. Statements list the row's actions
//! verbatim, are scoped to the bucket ARN pair (`bucket`, `bucket/*`), and are
//! identified by `<user>-<bucket>`. Rows are ordered maps, so compiling the
//! same matrix twice produces byte-identical JSON.
//!
//! Statements are ordered by bucket name, not by the order in which grants
//! were added to the matrix.
//!
//! Bucket existence is never checked here; a grant on an unprovisioned bucket
//! compiles and is only rejected when the document reaches the provider.

use std::collections::BTreeMap;

use ovhstack_iam_model::{PolicyDocument, Statement};
use tracing::{debug, warn};

use crate::PermissionMatrix;
use crate::matrix::PermissionRow;

/// Deterministic statement identifier for a `(user, bucket)` pair.
#[must_use]
pub fn statement_id(user: &str, bucket: &str) -> String {
    format!("{user}-{bucket}")
}

/// Compile one user's row into a policy document.
///
/// An empty row yields an empty document; this is allowed but usually means
/// the user's credential is unused, so a warning is logged.
///
/// # Examples
///
/// ```
/// use ovhstack_iam_core::{PermissionMatrix, compile_policy};
///
/// let mut matrix = PermissionMatrix::new();
/// matrix.grant_parsed("bo", "raw-file", &["get", "list"]).unwrap();
///
/// let doc = compile_policy("bo", matrix.row("bo").unwrap());
/// assert_eq!(doc.statements.len(), 1);
/// assert_eq!(doc.statements[0].sid, "bo-raw-file");
/// ```
#[must_use]
pub fn compile_policy(user: &str, row: &PermissionRow) -> PolicyDocument {
    if row.is_empty() {
        warn!(user, "user has no permissions, its credential is likely unused");
    }

    let statements = row
        .iter()
        .map(|(bucket, actions)| {
            Statement::allow_bucket(statement_id(user, bucket), bucket, actions.clone())
        })
        .collect::<Vec<_>>();

    debug!(user, statements = statements.len(), "compiled policy");
    PolicyDocument::new(statements)
}

/// Compile every row of the matrix, keyed by user.
#[must_use]
pub fn compile_all(matrix: &PermissionMatrix) -> BTreeMap<String, PolicyDocument> {
    matrix
        .iter()
        .map(|(user, row)| (user.to_owned(), compile_policy(user, row)))
        .collect()
}

impl From<&PermissionMatrix> for BTreeMap<String, PolicyDocument> {
    fn from(matrix: &PermissionMatrix) -> Self {
        compile_all(matrix)
    }
}
