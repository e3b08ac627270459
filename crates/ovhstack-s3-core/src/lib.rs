//! Bucket naming, validation, and lifecycle configuration for OVHStack.
//!
//! - [`naming`] derives canonical, environment-scoped resource names.
//! - [`validation`] checks bucket names against the S3 naming rules.
//! - [`lifecycle`] applies a bucket lifecycle rule out-of-band through the
//!   S3 command-line client, since the provisioning engine cannot.

pub mod error;
pub mod lifecycle;
pub mod naming;
pub mod validation;

pub use error::{LifecycleError, NamingError};
pub use lifecycle::LifecycleCommand;
pub use naming::NamingResolver;
