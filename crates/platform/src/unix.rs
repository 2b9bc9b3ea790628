//! Permission primitives backed by the local filesystem.

use std::fs;
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::permissions::{FsError, PermissionController, Result};
use crate::types::FileMode;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPermissions;

impl SystemPermissions {
    pub fn new() -> Self {
        Self
    }
}

impl PermissionController for SystemPermissions {
    fn look_path(&self, name: &str) -> Result<PathBuf> {
        which::which(name).map_err(|e| {
            debug!(name, error = %e, "executable lookup failed");
            FsError::NotInPath {
                name: name.to_string(),
            }
        })
    }

    fn chmod(&self, path: &Path, mode: u32) -> Result<()> {
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .map_err(|e| FsError::from_io("chmod", path, e))
    }

    fn stat(&self, path: &Path) -> Result<FileMode> {
        let metadata = fs::metadata(path).map_err(|e| FsError::from_io("stat", path, e))?;
        Ok(FileMode::from_raw(metadata.mode()))
    }

    fn create_dir(&self, path: &Path, mode: u32) -> Result<()> {
        create_dir_with(path, |path| self.chmod(path, mode))
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        fs::remove_dir(path).map_err(|e| FsError::from_io("remove", path, e))
    }

    fn has_entries(&self, path: &Path) -> Result<bool> {
        let mut entries = fs::read_dir(path).map_err(|e| FsError::from_io("open", path, e))?;
        match entries.next() {
            None => Ok(false),
            Some(Ok(_)) => Ok(true),
            Some(Err(e)) => Err(FsError::from_io("read", path, e)),
        }
    }
}

/// Creates `path` and pins its mode with `set_mode`, since mkdir(2) applies
/// the umask. The directory is removed again if the mode cannot be set.
fn create_dir_with(path: &Path, set_mode: impl FnOnce(&Path) -> Result<()>) -> Result<()> {
    fs::create_dir(path).map_err(|e| FsError::from_io("create", path, e))?;
    if let Err(e) = set_mode(path) {
        if let Err(cleanup) = fs::remove_dir(path) {
            debug!(path = %path.display(), error = %cleanup, "failed to remove half-created directory");
        }
        return Err(e);
    }
    Ok(())
}

/// Returns true if the process runs with an effective user id of root.
pub fn is_root() -> bool {
    // SAFETY: `libc::geteuid` is a read-only syscall that takes no
    // arguments and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_create_dir_ignores_umask() {
        let tmp = TempDir::new().unwrap();
        let mount = tmp.path().join("mount");
        let perms = SystemPermissions::new();

        perms.create_dir(&mount, 0o755).unwrap();

        assert_eq!(perms.stat(&mount).unwrap(), FileMode::dir(0o755));
    }

    #[test]
    fn test_create_dir_removed_when_mode_cannot_be_set() {
        let tmp = TempDir::new().unwrap();
        let mount = tmp.path().join("mount");

        let err = create_dir_with(&mount, |path| {
            Err(FsError::from_io(
                "chmod",
                path,
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ))
        })
        .unwrap_err();

        assert!(matches!(err, FsError::Io { op: "chmod", .. }));
        assert!(!mount.exists());
    }

    #[test]
    fn test_chmod_sets_setuid_bit() {
        let tmp = TempDir::new().unwrap();
        let binary = tmp.path().join("redirector");
        fs::write(&binary, b"#!/bin/sh\n").unwrap();
        let perms = SystemPermissions::new();

        perms.chmod(&binary, 0o4755).unwrap();
        let mode = perms.stat(&binary).unwrap();
        assert!(mode.is_setuid());
        assert_eq!(mode, FileMode::file(0o4755));

        perms.chmod(&binary, 0o755).unwrap();
        assert!(!perms.stat(&binary).unwrap().is_setuid());
    }

    #[test]
    fn test_stat_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = SystemPermissions::new()
            .stat(&tmp.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, FsError::NotFound { .. }));
    }

    #[test]
    fn test_remove_dir_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = SystemPermissions::new()
            .remove_dir(&tmp.path().join("missing"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remove_dir_non_empty_fails() {
        let tmp = TempDir::new().unwrap();
        let mount = tmp.path().join("mount");
        fs::create_dir(&mount).unwrap();
        fs::write(mount.join("file"), b"x").unwrap();

        let err = SystemPermissions::new().remove_dir(&mount).unwrap_err();
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_has_entries() {
        let tmp = TempDir::new().unwrap();
        let perms = SystemPermissions::new();
        assert!(!perms.has_entries(tmp.path()).unwrap());

        fs::write(tmp.path().join("entry"), b"x").unwrap();
        assert!(perms.has_entries(tmp.path()).unwrap());
    }

    #[test]
    fn test_look_path_unknown_binary() {
        let err = SystemPermissions::new()
            .look_path("fsctl-definitely-not-installed-anywhere")
            .unwrap_err();
        assert!(matches!(err, FsError::NotInPath { .. }));
    }
}
