use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {error}", .path.display())]
    Read { path: PathBuf, error: io::Error },

    #[error("failed to parse {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("invalid config key {key:?}")]
    InvalidKey { key: String },

    #[error("cannot use config key {key:?}: {segment:?} is not an object")]
    NotAnObject { key: String, segment: String },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {}: {error}", .path.display())]
    Write { path: PathBuf, error: io::Error },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// A key/value configuration document addressed by dotted paths.
pub trait ConfigStore {
    /// Location of the backing document.
    fn path(&self) -> &Path;

    /// Value stored at `key`, or `None` if any segment is absent.
    fn get_value_at_path(&self, key: &str) -> Result<Option<Value>>;

    /// Store a boolean at `key` and persist the document.
    ///
    /// On failure the store keeps its previous contents.
    fn set_bool_at_path(&mut self, key: &str, value: bool) -> Result<()>;
}

impl<T: ConfigStore + ?Sized> ConfigStore for &mut T {
    fn path(&self) -> &Path {
        (**self).path()
    }

    fn get_value_at_path(&self, key: &str) -> Result<Option<Value>> {
        (**self).get_value_at_path(key)
    }

    fn set_bool_at_path(&mut self, key: &str, value: bool) -> Result<()> {
        (**self).set_bool_at_path(key, value)
    }
}

pub(crate) fn split_key(key: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::InvalidKey {
            key: key.to_string(),
        });
    }
    Ok(segments)
}
