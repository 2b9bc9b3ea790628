//! JSON configuration documents for fsctl.
//!
//! Documents are JSON objects whose values are addressed by dotted keys
//! (`"a.b.c"`). [`ConfigStore`] is the seam the CLI depends on;
//! [`JsonConfigFile`] is the file-backed implementation, writing atomically
//! with owner-only permissions.
//!
//! The file-backed store relies on Unix file modes and is only built on
//! Unix targets, like the permission primitives in `fsctl-platform`.

#[cfg(unix)]
mod json;
mod store;

#[cfg(unix)]
pub use json::{JsonConfigFile, CONFIG_DIR_MODE, CONFIG_FILE_MODE};
pub use store::{ConfigError, ConfigStore, Result};

/// Root config key; `true` disables the setuid redirector.
pub const DISABLE_ROOT_REDIRECTOR_KEY: &str = "disableRootRedirector";

/// User config key holding the autostart preference.
pub const AUTOSTART_KEY: &str = "autostart";
