//! Canonical resource naming.
//!
//! Every bucket and user name is `<prefix>-<purpose>-<environment>`. The
//! environment never contains a hyphen, so the last segment of a name is
//! always its environment and the rest after the prefix is its purpose: the
//! mapping `(environment, purpose) -> name` is injective, and two distinct
//! environments never share a name.

use ovhstack_core::Environment;

use crate::error::NamingError;
use crate::validation::{validate_bucket_name, validate_segment};

/// Derives environment-scoped resource names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingResolver {
    prefix: String,
}

impl NamingResolver {
    /// Create a resolver with the given name prefix.
    ///
    /// # Errors
    /// Returns [`NamingError::InvalidSegment`] if `prefix` is not kebab-case.
    pub fn new(prefix: impl Into<String>) -> Result<Self, NamingError> {
        let prefix = prefix.into();
        validate_segment("prefix", &prefix)?;
        Ok(Self { prefix })
    }

    /// Canonical name of the resource serving `purpose` in `env`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ovhstack_core::Environment;
    /// use ovhstack_s3_core::NamingResolver;
    ///
    /// let naming = NamingResolver::new("dossierfacile").unwrap();
    /// let env = Environment::new("prod").unwrap();
    /// assert_eq!(naming.name(&env, "raw-file").unwrap(), "dossierfacile-raw-file-prod");
    /// ```
    pub fn name(&self, env: &Environment, purpose: &str) -> Result<String, NamingError> {
        validate_segment("purpose", purpose)?;
        Ok(format!("{}-{purpose}-{env}", self.prefix))
    }

    /// Canonical bucket name; additionally checked against the bucket naming rules.
    pub fn bucket_name(&self, env: &Environment, purpose: &str) -> Result<String, NamingError> {
        let name = self.name(env, purpose)?;
        validate_bucket_name(&name)?;
        Ok(name)
    }

    /// Bucket names for `purposes`, in order.
    pub fn bucket_names<S: AsRef<str>>(
        &self,
        env: &Environment,
        purposes: &[S],
    ) -> Result<Vec<String>, NamingError> {
        purposes
            .iter()
            .map(|p| self.bucket_name(env, p.as_ref()))
            .collect()
    }

    /// User names for `purposes`, in order.
    pub fn user_names<S: AsRef<str>>(
        &self,
        env: &Environment,
        purposes: &[S],
    ) -> Result<Vec<String>, NamingError> {
        purposes
            .iter()
            .map(|p| self.name(env, p.as_ref()))
            .collect()
    }

    /// Recover `(purpose, environment)` from a name produced by this resolver.
    #[must_use]
    pub fn parse<'a>(&self, name: &'a str) -> Option<(&'a str, &'a str)> {
        let rest = name.strip_prefix(self.prefix.as_str())?.strip_prefix('-')?;
        rest.rsplit_once('-')
    }
}
