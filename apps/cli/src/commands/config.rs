//! Config file commands.

use std::path::PathBuf;

use vitrine_client::ClientConfig;

use crate::error::{CliError, CliResult};

/// Prints the effective configuration as TOML.
pub fn show(config: &ClientConfig) -> CliResult<()> {
    let path = ClientConfig::default_config_path()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());
    println!("# default config path: {path}");
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Writes the effective configuration to `path` (or the default location).
pub fn init(config: &ClientConfig, path: Option<PathBuf>, force: bool) -> CliResult<()> {
    if let Some(existing) = path.clone().or_else(ClientConfig::default_config_path) {
        if existing.exists() && !force {
            return Err(CliError::ConfigExists(existing.display().to_string()));
        }
    }

    let written = config.save(path)?;
    println!("Wrote {}", written.display());
    Ok(())
}
