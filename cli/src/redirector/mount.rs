use std::path::{Path, PathBuf};

use fsctl_platform::{FileMode, FsError, PermissionController};
use tracing::{error, warn};

use crate::error::MountStateError;

/// Mode the mount directory is created with.
pub const MOUNT_CREATE_MODE: u32 = 0o755;
/// Mode the redirector leaves on the directory once it has mounted it.
pub const MOUNTED_MODE: u32 = 0o555;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    Created(PathBuf),
    AlreadyPresent(PathBuf),
    Removed(PathBuf),
    AlreadyAbsent(PathBuf),
}

impl MountOutcome {
    pub fn path(&self) -> &Path {
        match self {
            MountOutcome::Created(path)
            | MountOutcome::AlreadyPresent(path)
            | MountOutcome::Removed(path)
            | MountOutcome::AlreadyAbsent(path) => path,
        }
    }
}

/// Makes sure an empty mount directory with an acceptable mode exists.
pub fn ensure_mount<P: PermissionController>(
    permissions: &P,
    path: &Path,
    binary: &str,
) -> Result<MountOutcome, MountStateError> {
    match permissions.stat(path) {
        Ok(mode) => {
            warn!("Root mount already exists; will not re-create.");
            if mode != FileMode::dir(MOUNT_CREATE_MODE) && mode != FileMode::dir(MOUNTED_MODE) {
                return Err(MountStateError::BadMode {
                    path: path.to_path_buf(),
                    mode,
                });
            }

            let has_entries =
                permissions
                    .has_entries(path)
                    .map_err(|error| MountStateError::Unreadable {
                        path: path.to_path_buf(),
                        error,
                    })?;
            if has_entries {
                return Err(MountStateError::NotEmpty {
                    path: path.to_path_buf(),
                    binary: binary.to_string(),
                });
            }

            Ok(MountOutcome::AlreadyPresent(path.to_path_buf()))
        }
        Err(FsError::NotFound { .. }) => {
            permissions
                .create_dir(path, MOUNT_CREATE_MODE)
                .map_err(|error| {
                    error!("Failed to create mountpoint at {}: {}", path.display(), error);
                    MountStateError::Create {
                        path: path.to_path_buf(),
                        binary: binary.to_string(),
                        error,
                    }
                })?;
            println!("Redirector mount creation successful.");
            Ok(MountOutcome::Created(path.to_path_buf()))
        }
        Err(e) => {
            warn!("Unexpected error while trying to stat mount: {}", e);
            Err(MountStateError::Stat(e))
        }
    }
}

/// Removes the mount directory; a directory that is already gone is fine.
pub fn remove_mount<P: PermissionController>(
    permissions: &P,
    path: &Path,
    binary: &str,
) -> Result<MountOutcome, MountStateError> {
    match permissions.remove_dir(path) {
        Ok(()) => {
            println!("Redirector mount deletion successful.");
            Ok(MountOutcome::Removed(path.to_path_buf()))
        }
        Err(e) if e.is_not_found() => {
            warn!("Root mountdir already nonexistent.");
            Ok(MountOutcome::AlreadyAbsent(path.to_path_buf()))
        }
        Err(error) => {
            error!("Failed to delete mountpoint at {}: {}", path.display(), error);
            Err(MountStateError::Remove {
                path: path.to_path_buf(),
                binary: binary.to_string(),
                error,
            })
        }
    }
}
