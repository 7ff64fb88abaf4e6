//! Configuration management for coursesync.
//!
//! Handles loading, saving, and validating configuration from
//! platform-specific config directories.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application name used for config directory.
const APP_NAME: &str = "Coursesync";

/// Default config filename.
const CONFIG_FILENAME: &str = "config.toml";

/// Placeholder value for unconfigured secrets.
const SECRET_PLACEHOLDER: &str = "YOUR_TOKEN_HERE";

/// Environment variable that overrides the configured session token.
const SESSION_TOKEN_ENV: &str = "COURSESYNC_SESSION_TOKEN";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Course platform API configuration.
    pub api: PlatformConfig,

    /// Translation API configuration.
    pub translation_api: TranslationApiConfig,

    /// LLM prompts.
    pub prompts: PromptsConfig,

    /// File paths and sync behavior.
    pub sync: SyncConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: PlatformConfig::default(),
            translation_api: TranslationApiConfig::default(),
            prompts: PromptsConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

/// Course platform API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Session token sent in the `Session-Token` header.
    pub session_token: String,

    /// Base URL for the course platform API.
    pub base_url: String,

    /// Base URL for resolving relative image paths.
    pub image_base_url: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            session_token: SECRET_PLACEHOLDER.to_string(),
            base_url: "https://api.aisystant.com/api".to_string(),
            image_base_url: "https://aisystant.com".to_string(),
        }
    }
}

impl PlatformConfig {
    /// Returns the effective session token, preferring the environment
    /// variable over the config file.
    pub fn effective_session_token(&self) -> String {
        std::env::var(SESSION_TOKEN_ENV).unwrap_or_else(|_| self.session_token.clone())
    }

    /// Checks if a session token is configured (not placeholder).
    pub fn is_configured(&self) -> bool {
        let token = self.effective_session_token();
        !token.is_empty() && token != SECRET_PLACEHOLDER
    }
}

/// API configuration for the translation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationApiConfig {
    /// API key (required).
    pub key: String,

    /// Base URL for the API.
    pub base_url: String,

    /// Model identifier.
    pub model: String,

    /// Number of retry attempts for failed translations.
    pub retries: u32,
}

impl Default for TranslationApiConfig {
    fn default() -> Self {
        Self {
            key: SECRET_PLACEHOLDER.to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            retries: 3,
        }
    }
}

impl TranslationApiConfig {
    /// Checks if the API key is configured (not placeholder).
    pub fn is_configured(&self) -> bool {
        !self.key.is_empty() && self.key != SECRET_PLACEHOLDER
    }
}

/// LLM system prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Prompt for section title translation.
    pub title_translation: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            title_translation: "You are a Russian to English translator for a systems-thinking \
                                course platform. Translate the following Russian section title \
                                to English. Provide only the translated title, nothing else."
                .to_string(),
        }
    }
}

/// File path and sync behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Directory where per-course structure documents are written.
    pub structures_dir: PathBuf,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            structures_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Returns the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Returns the full path to the config file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILENAME))
    }

    /// Loads configuration from the default location.
    ///
    /// If the config file doesn't exist, creates a default one.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            // Create default config
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates the configuration.
    ///
    /// Translation credentials are only required when `require_translation`
    /// is set; the `courses` subcommand works with the session token alone.
    pub fn validate(&self, require_translation: bool) -> Result<(), ConfigError> {
        if !self.api.is_configured() {
            return Err(ConfigError::MissingValue(format!(
                "api.session_token (set it in the config file or via {})",
                SESSION_TOKEN_ENV
            )));
        }

        if self.api.base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "api.base_url".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if require_translation && !self.translation_api.is_configured() {
            return Err(ConfigError::MissingValue(
                "translation_api.key (set your API key in the config file)".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.translation_api.is_configured());
        assert_eq!(config.api.base_url, "https://api.aisystant.com/api");
        assert_eq!(config.translation_api.retries, 3);
    }

    #[test]
    fn test_api_configured_check() {
        let mut api = TranslationApiConfig::default();
        assert!(!api.is_configured());

        api.key = "sk-real-key".to_string();
        assert!(api.is_configured());
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config::default();
        let file = NamedTempFile::new().unwrap();

        config.save_to(file.path()).unwrap();

        let loaded = Config::load_from(file.path()).unwrap();
        assert_eq!(loaded.translation_api.model, config.translation_api.model);
        assert_eq!(loaded.api.base_url, config.api.base_url);
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate(false).is_err()); // session token not set

        let mut config = Config::default();
        config.api.session_token = "real-token".to_string();
        assert!(config.validate(false).is_ok());
        assert!(config.validate(true).is_err()); // translation key still missing

        config.translation_api.key = "real-key".to_string();
        assert!(config.validate(true).is_ok());
    }
}
