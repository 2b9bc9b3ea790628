//! Enabling and disabling the root redirector.
//!
//! Two facts have to agree: the `disableRootRedirector` flag in the root
//! config file and the setuid bit on the redirector binary. The config is
//! written first; if the chmod that follows fails, the config write is
//! reverted once. Mount directory failures happen after both facts are
//! committed and leave them in place.

mod mount;


pub use mount::MountOutcome;

use std::path::{Path, PathBuf};

use fsctl_config::{ConfigStore, DISABLE_ROOT_REDIRECTOR_KEY};
use fsctl_platform::{FsError, PermissionController};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::{ConfigureError, Result};

/// Binary mode while the redirector is enabled (setuid root).
pub const ENABLED_BINARY_MODE: u32 = 0o4755;
/// Binary mode while the redirector is disabled.
pub const DISABLED_BINARY_MODE: u32 = 0o755;

/// The root config is written owner-only; these modes let every user read it.
pub const READABLE_CONFIG_DIR_MODE: u32 = 0o755;
pub const READABLE_CONFIG_FILE_MODE: u32 = 0o644;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectorPaths {
    pub config_file: PathBuf,
    pub config_dir: PathBuf,
    pub mount: PathBuf,
    pub binary_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryOutcome {
    Updated { path: PathBuf, mode: u32 },
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureOutcome {
    pub binary: BinaryOutcome,
    /// `None` when the mount step was skipped because the binary is missing.
    pub mount: Option<MountOutcome>,
}

pub struct RedirectorConfigurator<C, P> {
    config: C,
    permissions: P,
    paths: RedirectorPaths,
}

impl<C: ConfigStore, P: PermissionController> RedirectorConfigurator<C, P> {
    pub fn new(config: C, permissions: P, paths: RedirectorPaths) -> Self {
        Self {
            config,
            permissions,
            paths,
        }
    }

    /// Whether the redirector is enabled; an absent key means enabled.
    pub fn status(&self) -> Result<bool> {
        let value = self
            .config
            .get_value_at_path(DISABLE_ROOT_REDIRECTOR_KEY)
            .map_err(|e| {
                debug!(error = %e, "reading redirector flag failed");
                self.corruption()
            })?;

        match value {
            None => Ok(true),
            Some(Value::Bool(disabled)) => Ok(!disabled),
            Some(_) => Err(self.corruption()),
        }
    }

    pub fn configure(&mut self, enable: bool) -> Result<ConfigureOutcome> {
        let originally_enabled = self.status()?;
        info!(originally_enabled, enable, "configuring redirector");

        let binary = self.update_config_and_permissions(enable, originally_enabled)?;
        if binary == BinaryOutcome::Missing {
            return Ok(ConfigureOutcome {
                binary,
                mount: None,
            });
        }
        println!("Redirector configuration and permissions updated.");

        let mount = if enable {
            mount::ensure_mount(&self.permissions, &self.paths.mount, &self.paths.binary_name)?
        } else {
            mount::remove_mount(&self.permissions, &self.paths.mount, &self.paths.binary_name)?
        };

        if enable {
            println!("Please run `$ fsctl start` to start the redirector for each user.");
        } else {
            println!(
                "Please run `# pkill -f {}` to stop the redirector for all users.",
                self.paths.binary_name
            );
        }

        Ok(ConfigureOutcome {
            binary,
            mount: Some(mount),
        })
    }

    fn update_config_and_permissions(
        &mut self,
        enable: bool,
        originally_enabled: bool,
    ) -> Result<BinaryOutcome> {
        let _readable = ReadableConfigGuard {
            permissions: &self.permissions,
            paths: &self.paths,
        };

        self.config
            .set_bool_at_path(DISABLE_ROOT_REDIRECTOR_KEY, !enable)
            .map_err(ConfigureError::ConfigWrite)?;

        let binary_path = match self.permissions.look_path(&self.paths.binary_name) {
            Ok(path) => path,
            Err(e) => {
                debug!(error = %e, "redirector lookup failed");
                warn!(
                    "configuration successful, but {} not found in $PATH (it may not be installed), so not updating permissions.",
                    self.paths.binary_name
                );
                return Ok(BinaryOutcome::Missing);
            }
        };

        let mode = if enable {
            ENABLED_BINARY_MODE
        } else {
            DISABLED_BINARY_MODE
        };

        if let Err(chmod) = self.permissions.chmod(&binary_path, mode) {
            error!(
                "Failed to chmod {}. Do you have root privileges?",
                binary_path.display()
            );
            return Err(revert_after_chmod_failure(
                &mut self.config,
                binary_path,
                chmod,
                originally_enabled,
                enable,
            ));
        }

        Ok(BinaryOutcome::Updated {
            path: binary_path,
            mode,
        })
    }

    fn corruption(&self) -> ConfigureError {
        ConfigureError::ConfigCorruption {
            path: self.config.path().to_path_buf(),
            key: DISABLE_ROOT_REDIRECTOR_KEY.to_string(),
        }
    }
}

/// Puts the config flag back after a failed chmod when the call meant to
/// change state.
fn revert_after_chmod_failure<C: ConfigStore>(
    config: &mut C,
    binary_path: PathBuf,
    chmod: FsError,
    originally_enabled: bool,
    enable: bool,
) -> ConfigureError {
    if originally_enabled == enable {
        return ConfigureError::PermissionUpdate {
            path: binary_path,
            error: chmod,
        };
    }

    match config.set_bool_at_path(DISABLE_ROOT_REDIRECTOR_KEY, !originally_enabled) {
        Ok(()) => ConfigureError::PermissionUpdate {
            path: binary_path,
            error: chmod,
        },
        Err(revert) => {
            error!("Failed to revert config after chmod failure; config may be in inconsistent state.");
            ConfigureError::CompoundInconsistency { chmod, revert }
        }
    }
}

/// Re-opens the root config to other users when dropped.
struct ReadableConfigGuard<'a, P: PermissionController> {
    permissions: &'a P,
    paths: &'a RedirectorPaths,
}

impl<P: PermissionController> Drop for ReadableConfigGuard<'_, P> {
    fn drop(&mut self) {
        relax(self.permissions, &self.paths.config_dir, READABLE_CONFIG_DIR_MODE);
        relax(self.permissions, &self.paths.config_file, READABLE_CONFIG_FILE_MODE);
    }
}

fn relax<P: PermissionController>(permissions: &P, path: &Path, mode: u32) {
    if let Err(e) = permissions.chmod(path, mode) {
        debug!(path = %path.display(), error = %e, "could not relax config permissions");
    }
}
