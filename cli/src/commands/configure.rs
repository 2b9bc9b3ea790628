use color_eyre::eyre::Result;
use fsctl_config::JsonConfigFile;
use fsctl_platform::SystemPermissions;
use tracing::{info, warn};

use crate::autostart;
use crate::cli::{autostart_toggle, redirector_action, ConfigureCommands, RedirectorAction};
use crate::env::Env;
use crate::redirector::{BinaryOutcome, RedirectorConfigurator};

pub fn run(command: ConfigureCommands, env: &Env) -> Result<()> {
    match command {
        ConfigureCommands::Autostart {
            toggle_on,
            toggle_off,
        } => {
            let enabled = autostart_toggle(toggle_on, toggle_off)?;
            let mut config = JsonConfigFile::open(env.config_file())?;
            autostart::set_autostart(&mut config, enabled)?;
            if enabled {
                println!("Autostart enabled.");
            } else {
                println!("Autostart disabled.");
            }
        }
        ConfigureCommands::Redirector {
            status,
            toggle_on,
            toggle_off,
        } => {
            let action = redirector_action(status, toggle_on, toggle_off)?;
            run_redirector(action, env)?;
        }
    }

    Ok(())
}

fn run_redirector(action: RedirectorAction, env: &Env) -> Result<()> {
    env.require_root_config()?;

    let config = JsonConfigFile::open(env.root_config_file())?;
    let mut redirector =
        RedirectorConfigurator::new(config, SystemPermissions::new(), env.redirector_paths());

    match action {
        RedirectorAction::Status => {
            if redirector.status()? {
                println!("enabled");
            } else {
                println!("disabled");
            }
        }
        RedirectorAction::Toggle { enable } => {
            if !fsctl_platform::is_root() {
                warn!("not running as root; updating the redirector will likely fail");
            }
            let outcome = redirector.configure(enable)?;
            if let BinaryOutcome::Updated { path, mode } = &outcome.binary {
                info!(
                    path = %path.display(),
                    mode = %format!("{mode:o}"),
                    "redirector permissions set"
                );
            }
            if let Some(mount) = &outcome.mount {
                info!(path = %mount.path().display(), ?mount, "redirector mount ready");
            }
        }
    }

    Ok(())
}
