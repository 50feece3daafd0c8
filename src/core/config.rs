//! Configuration management for MindEase.
//!
//! Handles loading configuration from TOML files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// UI/TUI settings
    pub ui: UiConfig,

    /// Text-generation provider settings
    pub ai: AiConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

/// UI/TUI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Color theme name (built-in: dusk, dracula, nord, mono)
    pub theme: String,

    /// Event poll interval in milliseconds
    pub tick_rate_ms: u64,

    /// Custom theme color overrides (hex format: "#RRGGBB")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_colors: Option<CustomColorsConfig>,
}

/// Custom color configuration for theme overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomColorsConfig {
    /// Primary accent color (brand, active step)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    /// Secondary accent color (gauges, bullets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    /// Main text color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Dimmed text color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_dim: Option<String>,
    /// Border color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
}

/// Which text-generation service backs the advisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini
    #[default]
    Gemini,
    /// Anthropic Claude
    Claude,
    /// Local Ollama server
    Ollama,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Claude => "claude",
            Self::Ollama => "ollama",
        }
    }
}

/// AI integration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Provider to send requests to
    pub provider: ProviderKind,

    /// Model override; each provider has its own default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Ollama-specific settings
    pub ollama: OllamaConfig,
}

impl AiConfig {
    /// Per-request timeout, never shorter than one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Ollama configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Ollama server URL
    pub base_url: String,

    /// Model to use
    pub model: String,
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file used by the interactive wizard; defaults to the data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Config {
    /// File name looked up in the current directory.
    pub const LOCAL_FILE: &'static str = ".mindease.toml";

    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.mindease.toml` in current directory
    /// 2. `~/.config/mindease/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        match Self::locate() {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// The config file that [`load`](Self::load) would read, if one exists.
    pub fn locate() -> Option<PathBuf> {
        let local_config = PathBuf::from(Self::LOCAL_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        Self::global_path().filter(|p| p.exists())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        if config.ai.timeout_secs == 0 {
            anyhow::bail!("Invalid config {}: ai.timeout_secs must be at least 1", path.display());
        }
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Path of the global config file.
    pub fn global_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mindease"))
    }

    /// Get the data directory path (for logs).
    pub fn data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("mindease"))
    }

    /// Where the interactive wizard writes its log.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging.file.clone().or_else(|| Self::data_dir().map(|d| d.join("mindease.log")))
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { theme: "dusk".to_string(), tick_rate_ms: 100, custom_colors: None }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: None,
            timeout_secs: 60,
            temperature: None,
            ollama: OllamaConfig::default(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:11434".to_string(), model: "llama3.2".to_string() }
    }
}
