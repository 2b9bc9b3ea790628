mod autostart;
mod cli;
mod commands;
mod env;
mod error;
mod logging;
mod redirector;

use clap::Parser;
use color_eyre::eyre::Result;

use cli::{Cli, Commands};
use env::Env;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(cli.log_level);

    let env = Env::new(cli.config_file, cli.use_root_config_file);

    match cli.command {
        Commands::Configure { command } => commands::configure::run(command, &env),
        Commands::Config { path } => commands::config::run(path, &env),
    }
}
