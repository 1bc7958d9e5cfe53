//! Config commands

use colored::Colorize;

use crate::config::Config;
use crate::output::OutputFormat;
use crate::ConfigCommands;

pub fn handle(action: ConfigCommands, config: &Config, profile: Option<&str>, format: OutputFormat) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Show => {
            format.print(config)?;
        }
        ConfigCommands::Init => {
            let path = Config::config_path(profile)?;
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            let path = Config::default().save(profile)?;
            println!("{} {}", "created".green().bold(), path.display());
        }
    }
    Ok(())
}
