//! Permission primitives and their error type.

use std::io;
use std::path::{Path, PathBuf};

use crate::types::FileMode;

/// Failure of a filesystem primitive.
///
/// Missing entries are reported through dedicated variants so callers can
/// branch on them instead of inspecting `io::ErrorKind`.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("{} does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error("{name} not found in $PATH")]
    NotInPath { name: String },

    #[error("failed to {op} {}: {error}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        error: io::Error,
    },
}

impl FsError {
    /// Wraps an I/O error, mapping `NotFound` to [`FsError::NotFound`].
    pub fn from_io(op: &'static str, path: &Path, error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::NotFound {
            FsError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            FsError::Io {
                op,
                path: path.to_path_buf(),
                error,
            }
        }
    }

    /// Returns true if the entry (or executable) does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound { .. } | FsError::NotInPath { .. })
    }
}

pub type Result<T> = std::result::Result<T, FsError>;

/// Operations needed to inspect and adjust permissions of external files.
///
/// Implementations must not follow any policy of their own: every call maps
/// to exactly one filesystem operation.
pub trait PermissionController {
    /// Resolve an executable name through the `$PATH` search.
    fn look_path(&self, name: &str) -> Result<PathBuf>;

    /// Set the full mode bits of `path`, setuid included.
    fn chmod(&self, path: &Path, mode: u32) -> Result<()>;

    /// Mode of `path`, following symlinks.
    fn stat(&self, path: &Path) -> Result<FileMode>;

    /// Create a single directory with exactly `mode`, regardless of umask.
    fn create_dir(&self, path: &Path, mode: u32) -> Result<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> Result<()>;

    /// Read one entry of the directory; true if there was one.
    fn has_entries(&self, path: &Path) -> Result<bool>;
}

impl<T: PermissionController + ?Sized> PermissionController for &T {
    fn look_path(&self, name: &str) -> Result<PathBuf> {
        (**self).look_path(name)
    }

    fn chmod(&self, path: &Path, mode: u32) -> Result<()> {
        (**self).chmod(path, mode)
    }

    fn stat(&self, path: &Path) -> Result<FileMode> {
        (**self).stat(path)
    }

    fn create_dir(&self, path: &Path, mode: u32) -> Result<()> {
        (**self).create_dir(path, mode)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        (**self).remove_dir(path)
    }

    fn has_entries(&self, path: &Path) -> Result<bool> {
        (**self).has_entries(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_maps_not_found() {
        let err = FsError::from_io(
            "stat",
            Path::new("/nope"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "/nope does not exist");
    }

    #[test]
    fn test_from_io_keeps_other_errors() {
        let err = FsError::from_io(
            "chmod",
            Path::new("/usr/bin/thing"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("failed to chmod /usr/bin/thing:"));
    }
}
