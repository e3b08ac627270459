//! Policy documents and statements.
//!
//! Field names and ordering follow the provider's JSON format:
//!
//! ```json
//! {
//!   "Version": "2012-10-17",
//!   "Statement": [
//!     {
//!       "Sid": "user-bucket",
//!       "Effect": "Allow",
//!       "Action": ["s3:GetObject"],
//!       "Resource": ["arn:aws:s3:::bucket", "arn:aws:s3:::bucket/*"]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{ActionSet, ModelError, bucket_arn_pair, bucket_from_arn};

/// Policy language version written into every document.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Statement effect. Only grants are ever emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Grant the listed actions.
    Allow,
}

/// One allow statement scoped to a single bucket and its objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    /// Statement identifier, unique within the document.
    pub sid: String,
    /// Statement effect.
    pub effect: Effect,
    /// Allowed actions.
    pub action: ActionSet,
    /// Resource ARNs the statement applies to.
    pub resource: Vec<String>,
}

impl Statement {
    /// Build an allow statement for `bucket` covering the bucket and `bucket/*`.
    #[must_use]
    pub fn allow_bucket(sid: impl Into<String>, bucket: &str, actions: ActionSet) -> Self {
        Self {
            sid: sid.into(),
            effect: Effect::Allow,
            action: actions,
            resource: bucket_arn_pair(bucket).to_vec(),
        }
    }

    /// Bucket names referenced by the statement's resources, deduplicated.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidArn`] if a resource is not a bucket ARN.
    pub fn buckets(&self) -> Result<Vec<&str>, ModelError> {
        let mut out: Vec<&str> = Vec::new();
        for arn in &self.resource {
            let bucket = bucket_from_arn(arn)?;
            if !out.contains(&bucket) {
                out.push(bucket);
            }
        }
        Ok(out)
    }
}

/// A per-user policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Policy language version.
    #[serde(rename = "Version")]
    pub version: String,
    /// Allow statements, one per bucket.
    #[serde(rename = "Statement")]
    pub statements: Vec<Statement>,
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self {
            version: POLICY_VERSION.to_owned(),
            statements: Vec::new(),
        }
    }
}

impl PolicyDocument {
    /// Create a document from statements.
    #[must_use]
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION.to_owned(),
            statements,
        }
    }

    /// Whether the document grants nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Compact JSON encoding submitted to the provider.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a document received as JSON.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
