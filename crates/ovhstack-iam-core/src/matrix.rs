//! The static authorization matrix.

use std::collections::BTreeMap;

use ovhstack_iam_model::ActionSet;
use serde::{Deserialize, Serialize};

use crate::IamError;

/// One user's row: bucket -> allowed actions.
pub type PermissionRow = BTreeMap<String, ActionSet>;

/// Mapping of user -> bucket -> allowed actions.
///
/// Keys are ordered, so iteration (and therefore compilation) is
/// deterministic. A user may be registered with an empty row.
///
/// The JSON form is a nested object of action lists:
///
/// ```
/// use ovhstack_iam_core::PermissionMatrix;
///
/// let matrix = PermissionMatrix::from_json(r#"{"api-tenant": {"raw-file": ["get", "put"]}}"#).unwrap();
/// assert_eq!(matrix.row("api-tenant").unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionMatrix {
    rows: BTreeMap<String, PermissionRow>,
}

impl PermissionMatrix {
    /// Create an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a matrix from JSON.
    pub fn from_json(raw: &str) -> Result<Self, IamError> {
        serde_json::from_str(raw).map_err(IamError::InvalidDocument)
    }

    /// Register a user without granting anything.
    pub fn add_user(&mut self, user: impl Into<String>) -> &mut Self {
        self.rows.entry(user.into()).or_default();
        self
    }

    /// Grant `actions` on `bucket` to `user`, replacing any previous grant for
    /// that pair.
    pub fn grant(
        &mut self,
        user: impl Into<String>,
        bucket: impl Into<String>,
        actions: ActionSet,
    ) -> Result<&mut Self, IamError> {
        let user = user.into();
        let bucket = bucket.into();
        if user.is_empty() {
            return Err(IamError::EmptyName("user"));
        }
        if bucket.is_empty() {
            return Err(IamError::EmptyName("bucket"));
        }
        self.rows.entry(user).or_default().insert(bucket, actions);
        Ok(self)
    }

    /// Grant actions given in short or wire spelling.
    pub fn grant_parsed(
        &mut self,
        user: impl Into<String>,
        bucket: impl Into<String>,
        actions: &[&str],
    ) -> Result<&mut Self, IamError> {
        let actions = ActionSet::parse(actions.iter().copied())?;
        self.grant(user, bucket, actions)
    }

    /// The row of `user`, if registered.
    #[must_use]
    pub fn row(&self, user: &str) -> Option<&PermissionRow> {
        self.rows.get(user)
    }

    /// Registered users in key order.
    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Iterate over `(user, row)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PermissionRow)> {
        self.rows.iter().map(|(user, row)| (user.as_str(), row))
    }

    /// Number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no user is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(user, bucket)` grants whose bucket is not in `known`.
    ///
    /// Purely advisory: compilation never consults the bucket set.
    #[must_use]
    pub fn unknown_buckets<S: AsRef<str>>(&self, known: &[S]) -> Vec<(String, String)> {
        self.iter()
            .flat_map(move |(user, row)| {
                row.keys()
                    .filter(move |bucket| !known.iter().any(|k| k.as_ref() == bucket.as_str()))
                    .map(move |bucket| (user.to_owned(), bucket.clone()))
            })
            .collect()
    }

    /// Rewrite user and bucket keys, e.g. from purposes to resource names.
    pub fn resolve<E>(
        &self,
        user_name: impl Fn(&str) -> Result<String, E>,
        bucket_name: impl Fn(&str) -> Result<String, E>,
    ) -> Result<Self, E> {
        let rows = self
            .rows
            .iter()
            .map(|(user, row)| {
                let resolved_row = row
                    .iter()
                    .map(|(bucket, actions)| Ok((bucket_name(bucket)?, actions.clone())))
                    .collect::<Result<PermissionRow, E>>()?;
                Ok((user_name(user)?, resolved_row))
            })
            .collect::<Result<BTreeMap<_, _>, E>>()?;
        Ok(Self { rows })
    }
}
