use clap::Subcommand;

use crate::error::{ConfigureError, Result};

#[derive(Debug, Subcommand)]
pub enum ConfigureCommands {
    /// Configure autostart on login
    ///
    /// Records whether fsctl should be started automatically when you log in.
    Autostart {
        /// Toggle on autostart on login
        #[arg(long)]
        toggle_on: bool,

        /// Toggle off autostart on login
        #[arg(long)]
        toggle_off: bool,
    },

    /// Configure the root redirector
    ///
    /// Requires root privileges and the root config file:
    ///   # fsctl --use-root-config-file configure redirector --status
    ///   # fsctl --use-root-config-file configure redirector --toggle-on
    ///   # fsctl --use-root-config-file configure redirector --toggle-off
    ///
    /// Enabling the redirector sets suid root on fsctl-redirector, letting
    /// every user reach the shared mount. It is enabled by default.
    #[command(verbatim_doc_comment)]
    Redirector {
        /// Print whether the redirector is enabled or disabled
        #[arg(long)]
        status: bool,

        /// Toggle on the redirector
        #[arg(long)]
        toggle_on: bool,

        /// Toggle off the redirector
        #[arg(long)]
        toggle_off: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectorAction {
    Status,
    Toggle { enable: bool },
}

pub fn redirector_action(status: bool, toggle_on: bool, toggle_off: bool) -> Result<RedirectorAction> {
    match (status, toggle_on, toggle_off) {
        (true, false, false) => Ok(RedirectorAction::Status),
        (false, true, false) => Ok(RedirectorAction::Toggle { enable: true }),
        (false, false, true) => Ok(RedirectorAction::Toggle { enable: false }),
        _ => Err(ConfigureError::Usage(
            "Must specify exactly one of --toggle-on, --toggle-off, --status.".to_string(),
        )),
    }
}

pub fn autostart_toggle(toggle_on: bool, toggle_off: bool) -> Result<bool> {
    match (toggle_on, toggle_off) {
        (true, true) => Err(ConfigureError::Usage(
            "Cannot specify both --toggle-on and --toggle-off.".to_string(),
        )),
        (false, false) => Err(ConfigureError::Usage(
            "Must specify either --toggle-on or --toggle-off.".to_string(),
        )),
        (on, _) => Ok(on),
    }
}
