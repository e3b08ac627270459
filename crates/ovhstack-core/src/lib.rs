//! Core types, configuration, and cross-stack output stores for OVHStack.
//!
//! This crate provides the building blocks shared by every stack: the
//! validated [`Environment`] identifier, [`StackPath`] addressing,
//! environment-driven [`StackConfig`], and the [`OutputStore`] abstraction
//! through which one stack publishes values that another stack requires.

mod config;
mod error;
mod output;
mod types;

pub use config::StackConfig;
pub use error::{StackError, StackResult};
pub use output::{
    FileOutputStore, InMemoryOutputStore, OutputStore, STACK_DATA_KEY, export_output,
    require_output,
};
pub use types::{AccessKeyPair, Environment, StackPath};
