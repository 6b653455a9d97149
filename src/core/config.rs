use std::fs::{read_to_string, write};
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Result, bail};
use serde_derive::{Deserialize, Serialize};
use toml::from_str;

use crate::core::common::{LoggingOptions, LookupOptions};

#[derive(Deserialize, Debug, Default, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    pub lookup_options: LookupOptions,
    pub logging_options: LoggingOptions,
}

impl Config {
    /// Load `filename` if it exists. A missing file is `None`, an unreadable
    /// or malformed file is an error.
    pub fn load_if_present(filename: &str) -> Result<Option<Config>> {
        let config = match read_to_string(filename) {
            Ok(config) => config,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let config: Config =
            from_str(&config).map_err(|e| anyhow::anyhow!("Invalid configuration file `{filename}`: {e}"))?;
        Ok(Some(config))
    }

    /// Write the default configuration to `filename`.
    /// An existing file is only replaced when `force` is set.
    pub fn generate(filename: &str, force: bool) -> Result<()> {
        if Path::new(filename).exists() && !force {
            bail!("Config file `{filename}` already exists. Use `--force` to overwrite it");
        }
        let toml_config = toml::to_string(&Config::default())?;
        write(filename, toml_config)?;
        println!("Configuration file `{filename}` created.");
        Ok(())
    }
}
