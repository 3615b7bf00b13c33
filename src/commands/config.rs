//! `dblp config`: inspect and edit the config file.

use std::process::ExitCode;

use anyhow::{Context, Result};
use bibtex_dblp::{Config, ConfigKey};

use crate::cli::ConfigArgs;

pub fn run_config_command(args: &ConfigArgs, config: &mut Config) -> Result<ExitCode> {
    if let Some(key) = &args.get {
        let key: ConfigKey = key.parse()?;
        let (value, source) = config.get_with_source(key);
        println!("The value of {key} is:\n{value}\n[This value was defined in {source}]");
    } else if let Some([key, value]) = args.set.as_deref() {
        config.set(key, value)?;
        config.save().context("Failed to save configuration")?;
        println!("Set {key} to {value} in {}", config.path().display());
    } else if let Some(key) = &args.unset {
        config.unset(key)?;
        config.save().context("Failed to save configuration")?;
        println!("Removed {key} from {}", config.path().display());
    } else {
        print!("{}", describe_file(config));
    }
    Ok(ExitCode::SUCCESS)
}

fn describe_file(config: &Config) -> String {
    let path = config.path().display();
    if config.file_settings().is_empty() {
        format!("No configuration options are set in {path}.\nTry: dblp config --help\n")
    } else {
        format!(
            "Current configuration as read from {path}:\n{}\n",
            config.file_json_pretty()
        )
    }
}
