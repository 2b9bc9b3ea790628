mod configure;

pub use configure::{autostart_toggle, redirector_action, ConfigureCommands, RedirectorAction};

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::LogLevel;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Configure autostart and the root redirector
    Configure {
        #[command(subcommand)]
        command: ConfigureCommands,
    },

    /// Show the active config file
    Config {
        /// Print config file path only
        #[arg(long)]
        path: bool,
    },
}

/// Administrative client for the fsctl filesystem
#[derive(Debug, Parser)]
#[command(name = "fsctl", version, verbatim_doc_comment)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Use the root config file instead of the per-user one
    #[arg(long, global = true)]
    pub use_root_config_file: bool,

    /// Per-user config file to use
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Log level; overrides RUST_LOG
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_redirector_with_root_flag() {
        let cli = Cli::try_parse_from([
            "fsctl",
            "--use-root-config-file",
            "configure",
            "redirector",
            "--toggle-off",
        ])
        .unwrap();

        assert!(cli.use_root_config_file);
        match cli.command {
            Commands::Configure {
                command:
                    ConfigureCommands::Redirector {
                        status,
                        toggle_on,
                        toggle_off,
                    },
            } => {
                assert!(!status);
                assert!(!toggle_on);
                assert!(toggle_off);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fsctl",
            "configure",
            "autostart",
            "--toggle-on",
            "--log-level",
            "debug",
            "--config-file",
            "/tmp/fsctl.json",
        ])
        .unwrap();

        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert_eq!(cli.config_file, Some(PathBuf::from("/tmp/fsctl.json")));
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let err = Cli::try_parse_from(["fsctl", "--log-level", "loud", "config"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
