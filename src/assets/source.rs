use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::foundation::error::{ScrubError, ScrubResult};

/// Fetches the raw bytes of an animation for an identifier (path, URL, key).
pub trait ByteSource {
    /// Return the full byte buffer, or a [`ScrubError::Transport`].
    fn fetch(&self, id: &str) -> ScrubResult<Vec<u8>>;
}

/// Reads identifiers as filesystem paths, optionally relative to a root directory.
#[derive(Clone, Debug, Default)]
pub struct FileSource {
    root: Option<PathBuf>,
}

impl FileSource {
    /// Resolve identifiers as-is.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative identifiers against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, id: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(id),
            None => PathBuf::from(id),
        }
    }
}

impl ByteSource for FileSource {
    fn fetch(&self, id: &str) -> ScrubResult<Vec<u8>> {
        let path = self.resolve(id);
        let bytes = std::fs::read(&path).map_err(|e| {
            ScrubError::transport(format!("failed to read '{}': {e}", path.display()))
        })?;
        if bytes.is_empty() {
            return Err(ScrubError::transport(format!(
                "'{}' is empty",
                path.display()
            )));
        }
        tracing::debug!(path = %path.display(), len = bytes.len(), "fetched gif bytes");
        Ok(bytes)
    }
}

/// In-memory byte source keyed by identifier.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `id`, replacing any previous entry.
    pub fn insert(&mut self, id: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(id.into(), bytes);
    }
}

impl ByteSource for MemorySource {
    fn fetch(&self, id: &str) -> ScrubResult<Vec<u8>> {
        self.entries
            .get(id)
            .cloned()
            .ok_or_else(|| ScrubError::transport(format!("failed to fetch GIF ('{id}' not found)")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
