//! Loaders resolve references to bytes.

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum LoaderError {
    #[error("file not found: {path}")]
    NotFound { path: String },

    #[error("cannot load {path}: {message}")]
    Io { path: String, message: String },
}

/// Loader reads the content behind a path or URL.
pub trait Loader {
    /// The location relative references are resolved against.
    fn root(&self) -> &str;

    fn load(&self, path: &str) -> Result<Vec<u8>, LoaderError>;
}

/// MemoryLoader serves files from memory.
///
/// Paths are resolved against the root; a leading `./` is ignored.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    root: String,
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryLoader {
    pub fn new(root: impl Into<String>) -> Self {
        MemoryLoader {
            root: root.into(),
            files: BTreeMap::new(),
        }
    }

    pub fn add_file(&mut self, path: &str, content: impl Into<Vec<u8>>) {
        let key = self.resolve(path);
        self.files.insert(key, content.into());
    }

    pub fn with_file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.add_file(path, content);
        self
    }

    fn resolve(&self, path: &str) -> String {
        let path = path.trim_start_matches("./");
        if path.starts_with('/') || self.root.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.root.trim_end_matches('/'), path)
        }
    }
}

impl Loader for MemoryLoader {
    fn root(&self) -> &str {
        &self.root
    }

    fn load(&self, path: &str) -> Result<Vec<u8>, LoaderError> {
        self.files
            .get(&self.resolve(path))
            .cloned()
            .ok_or_else(|| LoaderError::NotFound {
                path: path.to_string(),
            })
    }
}
