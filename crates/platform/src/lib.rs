//! Permission and directory primitives for fsctl.
//!
//! This crate provides a [`PermissionController`] trait describing the few
//! filesystem operations the redirector configuration needs (executable
//! lookup, chmod including setuid, stat, mkdir, rmdir, a one-entry
//! directory read), plus the [`SystemPermissions`] implementation backed
//! by the local filesystem.
//!
//! # Example
//!
//! ```ignore
//! use fsctl_platform::{PermissionController, SystemPermissions};
//!
//! let perms = SystemPermissions::new();
//! let redirector = perms.look_path("fsctl-redirector")?;
//! perms.chmod(&redirector, 0o4755)?;
//! ```

mod permissions;
mod types;

pub use permissions::{FsError, PermissionController, Result};
pub use types::FileMode;

#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub use unix::{is_root, SystemPermissions};
