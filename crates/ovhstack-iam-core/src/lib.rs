//! Permission matrix and policy compiler for OVHStack.
//!
//! The [`PermissionMatrix`] is the single static authorization table of a
//! deployment: user -> bucket -> allowed actions. The [`compiler`] turns each
//! user's row into a [`PolicyDocument`](ovhstack_iam_model::PolicyDocument)
//! with one allow statement per bucket.
//!
//! ```text
//! PermissionMatrix (purposes)
//!        | resolve(naming)
//!        v
//! PermissionMatrix (resource names)
//!        | compile_all
//!        v
//! BTreeMap<user, PolicyDocument>
//! ```

pub mod compiler;
pub mod error;
pub mod matrix;

pub use compiler::{compile_all, compile_policy, statement_id};
pub use error::IamError;
pub use matrix::PermissionMatrix;
