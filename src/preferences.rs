//! Persisted preview preferences

use std::path::PathBuf;

use avatar_stack_types::PreviewConfig;
use thiserror::Error;

/// Name preferences are stored under in the platform config directory
pub const APP_NAME: &str = "avatar-stack";

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Load preferences, falling back to defaults when missing or unusable
pub fn load() -> PreviewConfig {
    match try_load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "using default preview preferences");
            PreviewConfig::default()
        }
    }
}

pub fn try_load() -> Result<PreviewConfig, ConfigError> {
    let config: PreviewConfig = confy::load(APP_NAME, None)?;
    validate(&config)?;
    Ok(config)
}

pub fn store(config: &PreviewConfig) -> Result<(), ConfigError> {
    validate(config)?;
    confy::store(APP_NAME, None, config).map_err(ConfigError::Save)
}

/// Overwrite stored preferences with defaults
pub fn reset() -> Result<PreviewConfig, ConfigError> {
    let config = PreviewConfig::default();
    store(&config)?;
    tracing::info!("preview preferences reset to defaults");
    Ok(config)
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(confy::get_configuration_file_path(APP_NAME, None)?)
}

pub fn validate(config: &PreviewConfig) -> Result<(), ConfigError> {
    if !config.scale.is_finite() || config.scale <= 0.0 {
        return Err(ConfigError::Invalid {
            field: "scale",
            reason: format!("must be a positive number, got {}", config.scale),
        });
    }
    if !config.padding.is_finite() || config.padding < 0.0 {
        return Err(ConfigError::Invalid {
            field: "padding",
            reason: format!("must not be negative, got {}", config.padding),
        });
    }
    Ok(())
}
