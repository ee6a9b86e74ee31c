use std::path::PathBuf;

use agrisync_bridge::config::Config;
use directories::ProjectDirs;
use tokio::{
    fs::{OpenOptions, create_dir_all, read_to_string},
    io::AsyncWriteExt,
};

/// Errors that can occur while loading or resolving application configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to determine the user's configuration directory. This usually
    /// occurs when required environment variables are missing (e.g., `$HOME`
    /// on Unix or `%APPDATA%` on Windows).
    #[error("failed to obtain user's directories")]
    DirectoriesNotFound,
    #[error("failed to read config: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid TOML or does not match the expected structure.
    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

fn config_path() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("dev", "agrisync", "agrisync")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .ok_or(ConfigError::DirectoriesNotFound)
}

/// Loads the application configuration from disk. A default configuration
/// file is written on first start.
pub async fn load_config() -> Result<Config, ConfigError> {
    let config_path = config_path()?;
    log::info!("Loading configuration from {config_path:?}");
    if config_path.exists() {
        let contents = read_to_string(config_path).await?;
        return Ok(toml::from_str(&contents)?);
    }

    let config = Config::default();
    if let Some(parent) = config_path.parent() {
        create_dir_all(parent).await?;
    }

    let contents = toml::to_string_pretty(&config)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(config_path)
        .await?;
    file.write_all(contents.as_bytes()).await?;
    file.sync_all().await?;

    Ok(config)
}
