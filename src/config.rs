//! Configuration management for Quotegen
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::cli::Cli;
use crate::error::{QuotegenError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Quotegen
///
/// This structure holds all configuration needed for the assistant,
/// including provider settings, the knowledge store location, and
/// chat display behavior.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Provider configuration (Gemini, etc.)
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Knowledge store configuration
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Chat display configuration
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Provider configuration
///
/// Specifies which AI provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Google Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

fn default_provider_type() -> String {
    "gemini".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            gemini: GeminiConfig::default(),
        }
    }
}

/// Google Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model to use for Gemini
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API key; when absent the GEMINI_API_KEY and GOOGLE_API_KEY
    /// environment variables are consulted instead
    #[serde(default)]
    pub api_key: Option<String>,

    /// Optional API base URL (useful for tests and local mocks)
    ///
    /// When set, this base is used to build the `generateContent` endpoint,
    /// which allows tests to point the provider at a mock server.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Sampling temperature for responses
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens the model may produce per reply
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_temperature() -> f64 {
    0.8
}

fn default_max_output_tokens() -> u32 {
    2048
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_key: None,
            api_base: None,
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

/// Knowledge store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Directory where uploaded reference documents are kept
    #[serde(default = "default_knowledge_dir")]
    pub dir: PathBuf,
}

fn default_knowledge_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "quotegen", "quotegen")
        .map(|dirs| dirs.data_dir().join("knowledge"))
        .unwrap_or_else(|| PathBuf::from("uploads"))
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            dir: default_knowledge_dir(),
        }
    }
}

/// Chat display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Show timestamps next to transcript entries
    #[serde(default = "default_show_timestamps")]
    pub show_timestamps: bool,
}

fn default_show_timestamps() -> bool {
    false
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            show_timestamps: default_show_timestamps(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file with CLI overrides applied
    ///
    /// A missing configuration file is not an error: defaults are used so
    /// that the tool works out of the box.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed CLI arguments whose overrides take precedence
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&contents).map_err(QuotegenError::Yaml)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", path);
            Self::default()
        };

        if let Some(dir) = &cli.knowledge_dir {
            config.knowledge.dir = dir.clone();
        }

        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `QuotegenError::Config` if the provider type is unknown,
    /// the model name is empty, or generation parameters are out of range
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type != "gemini" {
            return Err(QuotegenError::Config(format!(
                "Unknown provider type: {}",
                self.provider.provider_type
            ))
            .into());
        }

        if self.provider.gemini.model.trim().is_empty() {
            return Err(QuotegenError::Config("Gemini model must not be empty".to_string()).into());
        }

        let temperature = self.provider.gemini.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(QuotegenError::Config(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                temperature
            ))
            .into());
        }

        if self.provider.gemini.max_output_tokens == 0 {
            return Err(
                QuotegenError::Config("max_output_tokens must be greater than 0".to_string())
                    .into(),
            );
        }

        Ok(())
    }
}
