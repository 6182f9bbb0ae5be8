//! Loading and saving [`ReflowConfig`] as TOML or JSON.

use crate::core::{ReflowError, ReflowResult};
use crate::pipeline::ReflowConfig;
use std::path::Path;

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn require(path: &Path) -> ReflowResult<Self> {
        Self::from_extension(path).ok_or_else(|| {
            ReflowError::config_error(format!(
                "Unsupported config file extension: {:?}",
                path.extension()
            ))
        })
    }
}

/// Configuration loader for the reflow pipeline.
///
/// Loaded configurations are validated before they are returned.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file, auto-detecting the format from the extension
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use periodical_reflow::pipeline::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load_from_file(Path::new("reflow.toml"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_from_file(path: &Path) -> ReflowResult<ReflowConfig> {
        let format = ConfigFormat::require(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReflowError::config_error(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::load_from_string(&content, format)
    }

    /// Load configuration from a string with specified format
    pub fn load_from_string(content: &str, format: ConfigFormat) -> ReflowResult<ReflowConfig> {
        let config: ReflowConfig = match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| {
                ReflowError::config_error(format!("Failed to parse TOML config: {e}"))
            })?,
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| {
                ReflowError::config_error(format!("Failed to parse JSON config: {e}"))
            })?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file, auto-detecting the format from the extension
    pub fn save_to_file(config: &ReflowConfig, path: &Path) -> ReflowResult<()> {
        let format = ConfigFormat::require(path)?;
        let content = Self::save_to_string(config, format)?;
        std::fs::write(path, content).map_err(|e| {
            ReflowError::config_error(format!(
                "Failed to write config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Save configuration to string with specified format
    pub fn save_to_string(config: &ReflowConfig, format: ConfigFormat) -> ReflowResult<String> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(config).map_err(|e| {
                ReflowError::config_error(format!("Failed to serialize config to TOML: {e}"))
            }),
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                ReflowError::config_error(format!("Failed to serialize config to JSON: {e}"))
            }),
        }
    }
}
