//! Configuration command handlers for the organizer CLI

use std::path::PathBuf;

use organizer_client::{ClientConfig, ClientError, ClientResult};

use crate::ConfigCommands;

pub async fn handle_config_command(cmd: ConfigCommands, config: &ClientConfig) -> ClientResult<()> {
    match cmd {
        ConfigCommands::Show => {
            let rendered = toml::to_string_pretty(config).map_err(|e| {
                ClientError::config_error(format!("Failed to render configuration: {}", e))
            })?;
            println!("{}", rendered);
            println!("# token file: {}", config.token_file()?.display());
        }
        ConfigCommands::Init { path, force } => {
            let path = match path {
                Some(path) => PathBuf::from(path),
                None => ClientConfig::default_config_path()?,
            };

            if path.exists() && !force {
                eprintln!(
                    "✗ {} already exists (use --force to overwrite)",
                    path.display()
                );
                return Err(ClientError::InvalidInput(format!(
                    "Config file already exists: {}",
                    path.display()
                )));
            }

            ClientConfig::default().save_to_file(&path)?;
            println!("✓ Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
