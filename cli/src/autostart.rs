//! Autostart preference stored in the per-user config file.

use fsctl_config::{ConfigStore, AUTOSTART_KEY};
use tracing::info;

use crate::error::{ConfigureError, Result};

pub fn set_autostart<C: ConfigStore>(config: &mut C, enabled: bool) -> Result<()> {
    config
        .set_bool_at_path(AUTOSTART_KEY, enabled)
        .map_err(ConfigureError::ConfigWrite)?;
    info!(enabled, path = %config.path().display(), "autostart preference saved");
    Ok(())
}
