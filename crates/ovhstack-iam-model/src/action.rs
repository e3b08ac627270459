//! Storage action vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ModelError;

/// An object-storage action a policy statement can allow.
///
/// Each action has a short spelling used in hand-authored permission tables
/// (`get`, `put-lifecycle`, ...) and the `s3:`-prefixed wire spelling used in
/// policy documents. Both parse; serialization always emits the wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum S3Action {
    /// `s3:GetObject`
    GetObject,
    /// `s3:PutObject`
    PutObject,
    /// `s3:DeleteObject`
    DeleteObject,
    /// `s3:ListBucket`
    ListBucket,
    /// `s3:GetLifecycleConfiguration`
    GetLifecycleConfiguration,
    /// `s3:PutLifecycleConfiguration`
    PutLifecycleConfiguration,
}

impl S3Action {
    /// Every supported action, in vocabulary order.
    pub const ALL: [Self; 6] = [
        Self::GetObject,
        Self::PutObject,
        Self::DeleteObject,
        Self::ListBucket,
        Self::GetLifecycleConfiguration,
        Self::PutLifecycleConfiguration,
    ];

    /// The wire spelling (e.g. `s3:GetObject`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetObject => "s3:GetObject",
            Self::PutObject => "s3:PutObject",
            Self::DeleteObject => "s3:DeleteObject",
            Self::ListBucket => "s3:ListBucket",
            Self::GetLifecycleConfiguration => "s3:GetLifecycleConfiguration",
            Self::PutLifecycleConfiguration => "s3:PutLifecycleConfiguration",
        }
    }

    /// The short spelling used in permission tables (e.g. `get`).
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            Self::GetObject => "get",
            Self::PutObject => "put",
            Self::DeleteObject => "delete",
            Self::ListBucket => "list",
            Self::GetLifecycleConfiguration => "get-lifecycle",
            Self::PutLifecycleConfiguration => "put-lifecycle",
        }
    }
}

impl fmt::Display for S3Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for S3Action {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s || a.short_name() == s)
            .ok_or_else(|| ModelError::UnknownAction(s.to_owned()))
    }
}

impl Serialize for S3Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for S3Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A non-empty, duplicate-free list of actions.
///
/// Authoring order is preserved so compiled statements list actions exactly
/// as they were written in the permission table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<S3Action>", into = "Vec<S3Action>")]
pub struct ActionSet(Vec<S3Action>);

impl ActionSet {
    /// Build an action set, dropping repeated actions.
    ///
    /// # Errors
    /// Returns [`ModelError::EmptyActionSet`] if no action is given.
    pub fn new(actions: impl IntoIterator<Item = S3Action>) -> Result<Self, ModelError> {
        let mut out: Vec<S3Action> = Vec::new();
        for action in actions {
            if !out.contains(&action) {
                out.push(action);
            }
        }
        if out.is_empty() {
            return Err(ModelError::EmptyActionSet);
        }
        Ok(Self(out))
    }

    /// Parse an action set from short or wire spellings.
    pub fn parse<'a>(actions: impl IntoIterator<Item = &'a str>) -> Result<Self, ModelError> {
        let parsed = actions
            .into_iter()
            .map(str::parse)
            .collect::<Result<Vec<S3Action>, _>>()?;
        Self::new(parsed)
    }

    /// Whether `action` is allowed.
    #[must_use]
    pub fn contains(&self, action: S3Action) -> bool {
        self.0.contains(&action)
    }

    /// Iterate over the actions in authoring order.
    pub fn iter(&self) -> impl Iterator<Item = S3Action> + '_ {
        self.0.iter().copied()
    }

    /// Number of distinct actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty. Never true for a constructed set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The actions as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[S3Action] {
        &self.0
    }
}

impl TryFrom<Vec<S3Action>> for ActionSet {
    type Error = ModelError;

    fn try_from(actions: Vec<S3Action>) -> Result<Self, Self::Error> {
        Self::new(actions)
    }
}

impl From<ActionSet> for Vec<S3Action> {
    fn from(set: ActionSet) -> Self {
        set.0
    }
}
