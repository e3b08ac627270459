//! Common type definitions shared across stacks.

use std::fmt;

use crate::{StackError, StackResult};

/// Deployment environment identifier (e.g. `prod`, `preprod`, `dev2`).
///
/// Restricted to lowercase ASCII letters and digits. Because an environment
/// never contains a hyphen it is always the unambiguous last segment of a
/// resource name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct Environment(String);

impl Environment {
    /// Create a new environment identifier.
    ///
    /// # Errors
    /// Returns an error if the identifier is empty or contains anything other
    /// than lowercase ASCII letters and digits.
    pub fn new(env: impl Into<String>) -> StackResult<Self> {
        let env = env.into();
        if env.is_empty()
            || !env
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        {
            return Err(StackError::InvalidEnvironment(env));
        }
        Ok(Self(env))
    }

    /// Get the environment as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Environment {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Address of a deployed stack: `<organization>/<project>/<environment>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct StackPath {
    /// Owning organization.
    pub organization: String,
    /// Stack project (`main`, `data`, ...).
    pub project: String,
    /// Environment the stack was deployed for.
    pub environment: Environment,
}

impl StackPath {
    /// Create a new stack path.
    #[must_use]
    pub fn new(
        organization: impl Into<String>,
        project: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            organization: organization.into(),
            project: project.into(),
            environment,
        }
    }

    /// Check that the organization and project are single path segments.
    ///
    /// # Errors
    /// Returns [`StackError::InvalidPathSegment`] for the first offending
    /// component.
    pub fn validate(&self) -> StackResult<()> {
        validate_path_segment(&self.organization)?;
        validate_path_segment(&self.project)
    }
}

impl fmt::Display for StackPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.organization, self.project, self.environment
        )
    }
}

/// Check that `value` can be used as one component of a stack path: not
/// empty, not `.` or `..`, and free of path separators.
pub(crate) fn validate_path_segment(value: &str) -> StackResult<()> {
    if value.is_empty() || value == "." || value == ".." || value.contains(['/', '\\']) {
        return Err(StackError::InvalidPathSegment(value.to_owned()));
    }
    Ok(())
}

/// An S3 access-key / secret-key pair issued by the provider.
///
/// The secret is redacted from the `Debug` output.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccessKeyPair {
    /// Access key identifier.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
}

impl fmt::Debug for AccessKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKeyPair")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}
