use color_eyre::eyre::Result;
use fsctl_config::JsonConfigFile;

use crate::env::Env;

pub fn run(path: bool, env: &Env) -> Result<()> {
    let config_file = env.config_file();

    if path {
        println!("{}", config_file.display());
        return Ok(());
    }

    let config = JsonConfigFile::open(config_file)?;
    println!("Config file: {}", config_file.display());
    println!();
    println!("{}", config.to_pretty_string()?);

    Ok(())
}
