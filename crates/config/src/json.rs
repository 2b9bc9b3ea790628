use std::fs::{self, DirBuilder, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::store::{split_key, ConfigError, ConfigStore, Result};

/// Mode of freshly written config files; readable by the owner only.
pub const CONFIG_FILE_MODE: u32 = 0o600;
/// Mode of config directories created on first write.
pub const CONFIG_DIR_MODE: u32 = 0o700;

/// A JSON object document persisted at a fixed path.
///
/// A missing file is treated as an empty document; it is created on the
/// first write.
#[derive(Debug, Clone)]
pub struct JsonConfigFile {
    path: PathBuf,
    document: Map<String, Value>,
}

impl JsonConfigFile {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file absent, using empty document");
                return Ok(Self {
                    path,
                    document: Map::new(),
                });
            }
            Err(error) => return Err(ConfigError::Read { path, error }),
        };

        let document = parse_document(&path, &content)?;
        Ok(Self { path, document })
    }

    #[cfg(test)]
    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    pub fn to_pretty_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.document)?)
    }

    pub fn set_value_at_path(&mut self, key: &str, value: Value) -> Result<()> {
        let segments = split_key(key)?;
        let previous = self.document.clone();

        insert_at(&mut self.document, key, &segments, value)?;
        if let Err(e) = self.save() {
            self.document = previous;
            return Err(e);
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        let content = self.to_pretty_string()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            DirBuilder::new()
                .recursive(true)
                .mode(CONFIG_DIR_MODE)
                .create(parent)
                .map_err(|error| ConfigError::Write {
                    path: parent.to_path_buf(),
                    error,
                })?;
        }

        let tmp_path = temp_path(&self.path);
        let written = write_new_file(&tmp_path, content.as_bytes())
            .and_then(|()| fs::rename(&tmp_path, &self.path));

        if let Err(error) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(ConfigError::Write {
                path: self.path.clone(),
                error,
            });
        }

        debug!(path = %self.path.display(), "config written");
        Ok(())
    }
}

impl ConfigStore for JsonConfigFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn get_value_at_path(&self, key: &str) -> Result<Option<Value>> {
        let segments = split_key(key)?;
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| ConfigError::InvalidKey {
                key: key.to_string(),
            })?;

        let mut current = &self.document;
        for segment in parents {
            match current.get(*segment) {
                None => return Ok(None),
                Some(Value::Object(map)) => current = map,
                Some(_) => {
                    return Err(ConfigError::NotAnObject {
                        key: key.to_string(),
                        segment: segment.to_string(),
                    })
                }
            }
        }

        Ok(current.get(*last).cloned())
    }

    fn set_bool_at_path(&mut self, key: &str, value: bool) -> Result<()> {
        self.set_value_at_path(key, Value::Bool(value))
    }
}

fn parse_document(path: &Path, content: &str) -> Result<Map<String, Value>> {
    if content.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ConfigError::Parse {
            path: path.to_path_buf(),
            reason: "top level is not a JSON object".to_string(),
        }),
        Err(e) => Err(ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

fn insert_at(
    document: &mut Map<String, Value>,
    key: &str,
    segments: &[&str],
    value: Value,
) -> Result<()> {
    let Some((last, parents)) = segments.split_last() else {
        return Err(ConfigError::InvalidKey {
            key: key.to_string(),
        });
    };

    let mut current = document;
    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match entry {
            Value::Object(map) => map,
            _ => {
                return Err(ConfigError::NotAnObject {
                    key: key.to_string(),
                    segment: segment.to_string(),
                })
            }
        };
    }

    current.insert(last.to_string(), value);
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config.json".to_string());
    path.with_file_name(format!(".{}.tmp-{}", name, std::process::id()))
}

fn write_new_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(CONFIG_FILE_MODE)
        .open(path)?;
    file.write_all(content)?;
    file.write_all(b"\n")?;
    file.sync_all()
}
