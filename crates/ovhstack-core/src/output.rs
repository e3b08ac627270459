//! Cross-stack output export and lookup.
//!
//! A stack publishes named JSON values under its [`StackPath`]; a dependent
//! stack looks them up by `(stack path, key)` and fails immediately when the
//! key is absent or its shape changed. Two stores are provided:
//! [`InMemoryOutputStore`] (shared, `DashMap`-backed) and
//! [`FileOutputStore`] (one JSON document per stack under a state directory).

use std::fs;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{StackError, StackPath, StackResult};

/// Output key every stack exports its data record under.
pub const STACK_DATA_KEY: &str = "stack_data";

/// Storage for values exported by one stack and consumed by another.
pub trait OutputStore: Send + Sync + std::fmt::Debug {
    /// Publish `value` under `key` for `stack`, replacing any previous value.
    fn export(&self, stack: &StackPath, key: &str, value: Value) -> StackResult<()>;

    /// Look up an output, returning `None` if it was never exported.
    fn lookup(&self, stack: &StackPath, key: &str) -> StackResult<Option<Value>>;

    /// Look up an output that must exist.
    ///
    /// # Errors
    /// Returns [`StackError::OutputNotFound`] if the key is absent.
    fn require(&self, stack: &StackPath, key: &str) -> StackResult<Value> {
        self.lookup(stack, key)?
            .ok_or_else(|| StackError::OutputNotFound {
                stack: stack.to_string(),
                key: key.to_owned(),
            })
    }
}

/// Look up a required output and decode it into `T`.
///
/// # Errors
/// Returns [`StackError::OutputNotFound`] if the key is absent and
/// [`StackError::OutputShape`] if the stored value does not decode as `T`.
pub fn require_output<T: DeserializeOwned>(
    store: &dyn OutputStore,
    stack: &StackPath,
    key: &str,
) -> StackResult<T> {
    let value = store.require(stack, key)?;
    serde_json::from_value(value).map_err(|source| StackError::OutputShape {
        stack: stack.to_string(),
        key: key.to_owned(),
        source,
    })
}

/// Encode `value` and export it under `key`.
pub fn export_output<T: Serialize>(
    store: &dyn OutputStore,
    stack: &StackPath,
    key: &str,
    value: &T,
) -> StackResult<()> {
    let value = serde_json::to_value(value)
        .map_err(|e| StackError::Internal(anyhow::Error::new(e).context("encode output")))?;
    store.export(stack, key, value)
}

/// Thread-safe in-memory output store.
#[derive(Debug, Default)]
pub struct InMemoryOutputStore {
    inner: DashMap<(StackPath, String), Value>,
}

impl InMemoryOutputStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of exported outputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl OutputStore for InMemoryOutputStore {
    fn export(&self, stack: &StackPath, key: &str, value: Value) -> StackResult<()> {
        debug!(stack = %stack, key, "exporting output");
        self.inner.insert((stack.clone(), key.to_owned()), value);
        Ok(())
    }

    fn lookup(&self, stack: &StackPath, key: &str) -> StackResult<Option<Value>> {
        Ok(self
            .inner
            .get(&(stack.clone(), key.to_owned()))
            .map(|v| v.clone()))
    }
}

/// Output store persisting each stack's outputs as
/// `<root>/<organization>/<project>/<environment>.json`.
#[derive(Debug, Clone)]
pub struct FileOutputStore {
    root: PathBuf,
}

impl FileOutputStore {
    /// Create a store rooted at `root`. The directory is created on first export.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn stack_file(&self, stack: &StackPath) -> StackResult<PathBuf> {
        stack.validate()?;
        Ok(self
            .root
            .join(&stack.organization)
            .join(&stack.project)
            .join(format!("{}.json", stack.environment)))
    }

    fn read_outputs(&self, path: &Path) -> StackResult<Map<String, Value>> {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StackError::StateIo {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        serde_json::from_slice(&raw).map_err(|e| {
            StackError::Internal(
                anyhow::Error::new(e).context(format!("corrupt output file {}", path.display())),
            )
        })
    }
}

impl OutputStore for FileOutputStore {
    fn export(&self, stack: &StackPath, key: &str, value: Value) -> StackResult<()> {
        let path = self.stack_file(stack)?;
        let mut outputs = self.read_outputs(&path)?;
        outputs.insert(key.to_owned(), value);

        let io_err = |source| StackError::StateIo {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_vec_pretty(&outputs)
            .map_err(|e| StackError::Internal(anyhow::Error::new(e)))?;
        fs::write(&path, body).map_err(io_err)?;

        debug!(stack = %stack, key, path = %path.display(), "exported output");
        Ok(())
    }

    fn lookup(&self, stack: &StackPath, key: &str) -> StackResult<Option<Value>> {
        let path = self.stack_file(stack)?;
        let mut outputs = self.read_outputs(&path)?;
        Ok(outputs.remove(key))
    }
}
