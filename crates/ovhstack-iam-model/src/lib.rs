//! S3 access policy document model for OVHStack.
//!
//! Typed representation of the IAM-style policy documents attached to
//! object-storage users: the fixed [`S3Action`] vocabulary, ordered
//! [`ActionSet`]s, [`Statement`]s scoped to a bucket ARN pair, and the
//! [`PolicyDocument`] that serializes to the provider's JSON wire format.

pub mod action;
pub mod arn;
pub mod document;
pub mod error;

pub use action::{ActionSet, S3Action};
pub use arn::{bucket_arn, bucket_arn_pair, bucket_from_arn};
pub use document::{Effect, POLICY_VERSION, PolicyDocument, Statement};
pub use error::ModelError;
