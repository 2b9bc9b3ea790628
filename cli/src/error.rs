use std::path::PathBuf;

use fsctl_config::ConfigError;
use fsctl_platform::{FileMode, FsError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigureError {
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    PrivilegeConfig(String),

    #[error(
        "config corruption: not a boolean value; please edit {} and set {key} to a boolean value manually.",
        .path.display()
    )]
    ConfigCorruption { path: PathBuf, key: String },

    #[error("Failed to update config: {0}. Do you have root privileges?")]
    ConfigWrite(ConfigError),

    #[error("Failed to chmod {}: {error}. Do you have root privileges?", .path.display())]
    PermissionUpdate { path: PathBuf, error: FsError },

    #[error(
        "Error during chmod: {chmod}. Error during config revert: {revert}. \
         The config may now disagree with the permissions of the redirector binary; \
         rerun the command with root privileges to restore a consistent state."
    )]
    CompoundInconsistency { chmod: FsError, revert: ConfigError },

    #[error(transparent)]
    MountState(#[from] MountStateError),
}

#[derive(Debug, thiserror::Error)]
pub enum MountStateError {
    #[error(
        "Root mount exists at {}, but has incorrect file mode {mode}. Delete directory {} and try again.",
        .path.display(),
        .path.display()
    )]
    BadMode { path: PathBuf, mode: FileMode },

    #[error(
        "Root mount exists at {}, but failed to open ({error}). Delete directory {} and try again.",
        .path.display(),
        .path.display()
    )]
    Unreadable { path: PathBuf, error: FsError },

    #[error(
        "Root mount exists at {}, but is non-empty (is the redirector currently running?). \
         Run `# pkill -f {binary}`, delete directory {} and try again.",
        .path.display(),
        .path.display()
    )]
    NotEmpty { path: PathBuf, binary: String },

    #[error("Unexpected error while trying to stat mount: {0}")]
    Stat(FsError),

    #[error(
        "Failed to create mountpoint at {}: {error}. \
         If the filesystem is not being used, run `# pkill -f {binary}` and try again.",
        .path.display()
    )]
    Create {
        path: PathBuf,
        binary: String,
        error: FsError,
    },

    #[error(
        "Failed to delete mountpoint at {}: {error}. \
         If the filesystem is not being used, run `# pkill -f {binary}` and try again.",
        .path.display()
    )]
    Remove {
        path: PathBuf,
        binary: String,
        error: FsError,
    },
}

pub type Result<T> = std::result::Result<T, ConfigureError>;
