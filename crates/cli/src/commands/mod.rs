//! Subcommand implementations.

pub mod cart;
pub mod intent;
pub mod search;

use thiserror::Error;
use voicecart_skill::config::{ConfigError, magento_from_env};
use voicecart_skill::magento::{MagentoClient, MagentoError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Backend settings are missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The commerce backend rejected or failed a call.
    #[error(transparent)]
    Magento(#[from] MagentoError),

    /// The term did not match any catalog product.
    #[error("No product matches {0:?}")]
    NotFound(String),

    /// Output could not be encoded.
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Build a backend client from `MAGENTO_*` environment variables.
fn client_from_env() -> Result<MagentoClient, CommandError> {
    let config = magento_from_env()?;
    tracing::debug!(backend = %config.base_url, "Using Magento backend");
    Ok(MagentoClient::new(&config)?)
}
