//! Configuration file support

use guidechat_api::{DEFAULT_TIMEOUT, LanguageCode};
use guidechat_core::{ControllerConfig, DEFAULT_GREETING, Language, LanguageCatalog};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Backend address used when neither config nor flags name one
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Configuration for guidechat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL
    pub base_url: Option<String>,
    /// Initial language code
    pub language: Option<String>,
    /// Languages offered in the picker
    pub languages: Option<Vec<Language>>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Whether to use TUI mode by default
    pub tui: Option<bool>,
    /// Greeting shown on an empty transcript
    pub greeting: Option<String>,
}

impl Config {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("guidechat")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("GUIDECHAT_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, falling back to defaults with a warning
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        let default_config = Config {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            language: Some(LanguageCode::default().to_string()),
            languages: None,
            timeout_secs: Some(DEFAULT_TIMEOUT.as_secs()),
            tui: Some(true),
            greeting: None,
        };

        default_config.save_to(&path)?;
        Ok(path)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn catalog(&self) -> LanguageCatalog {
        LanguageCatalog::new(self.languages.clone().unwrap_or_default())
    }

    /// Controller settings, with `language` overriding the configured one.
    ///
    /// Fails with the offending code when the language is not offered.
    pub fn controller_config(
        &self,
        language: Option<&str>,
    ) -> Result<ControllerConfig, LanguageCode> {
        let languages = self.catalog();
        let code = language
            .or(self.language.as_deref())
            .map(LanguageCode::from)
            .unwrap_or_default();
        if languages.find(&code).is_none() {
            return Err(code);
        }

        Ok(ControllerConfig {
            greeting: self
                .greeting
                .clone()
                .unwrap_or_else(|| DEFAULT_GREETING.to_string()),
            language: code,
            languages,
        })
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# guidechat configuration file
# Place at ~/.config/guidechat/config.toml (Linux) or %APPDATA%\guidechat\config.toml (Windows)

# Question-answering backend
base_url = "http://127.0.0.1:5000"

# Language replies are requested in
language = "en"

# Seconds to wait for the backend before giving up
timeout_secs = 30

# Whether to use TUI mode by default (true by default)
# Set to false for simple stdin/stdout mode
tui = true

# Greeting shown when the conversation starts or is cleared
# greeting = "Ask me a question based on the guidelines"

# Languages offered in the picker (defaults to English plus nine Indian languages)
# [[languages]]
# code = "en"
# name = "English"
#
# [[languages]]
# code = "hi"
# name = "Hindi"
"#
}
