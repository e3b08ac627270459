//! Stack definitions for OVHStack.
//!
//! Two stacks are deployed per environment:
//!
//! - [`ProjectStack`] provisions (or references) the cloud project and
//!   exports [`MainStackOutput`].
//! - [`DataStack`] consumes the project id, provisions buckets and service
//!   accounts, attaches the compiled policies, applies the bucket lifecycle
//!   rule, and exports [`DataStackOutput`].
//!
//! Both stacks can also produce a side-effect-free [`plan`].

pub mod catalog;
pub mod data;
pub mod error;
pub mod output;
pub mod plan;
pub mod project;

pub use data::DataStack;
pub use error::{DeployError, DeployResult};
pub use output::{
    DataStackOutput, MainStackOutput, S3UserOutput, data_stack_path, get_data_stack_output,
    get_main_stack_output, main_stack_path,
};
pub use plan::{DataStackPlan, ProjectStackPlan, StackPlan};
pub use project::ProjectStack;
