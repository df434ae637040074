//! Configuration management for nbview.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::highlight::Theme;
use crate::loader::{LoadOptions, DEFAULT_TIMEOUT};
use crate::render::RenderOptions;
use crate::security::SanitizeOptions;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering configuration.
    pub render: RenderSection,
    /// HTML sanitizer configuration.
    pub sanitizer: SanitizerSection,
    /// Notebook loading configuration.
    pub loader: LoaderSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Rendering configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSection {
    /// Code color theme.
    pub theme: Theme,
    /// Include cell outputs.
    pub show_outputs: bool,
    /// Strip ANSI codes instead of converting them.
    pub plain_ansi: bool,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            show_outputs: true,
            plain_ansi: false,
        }
    }
}

/// Sanitizer configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerSection {
    /// Remove all markup from HTML content.
    pub strip_tags: bool,
    /// URL schemes to block in addition to the defaults.
    pub extra_blocked_schemes: Vec<String>,
    /// Replacement tag allow-list; empty keeps the default list.
    pub allowed_tags: Vec<String>,
}

/// Loader configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSection {
    /// Read timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for LoaderSection {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level or filter directive (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an environment lookup (for testing).
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(theme) = lookup("NBVIEW_THEME") {
            self.render.theme = theme
                .parse()
                .map_err(|_| ConfigError::InvalidValue("NBVIEW_THEME", theme))?;
        }

        if let Some(timeout) = lookup("NBVIEW_TIMEOUT_MS") {
            self.loader.timeout_ms = timeout
                .parse()
                .map_err(|_| ConfigError::InvalidValue("NBVIEW_TIMEOUT_MS", timeout))?;
        }

        if let Some(level) = lookup("NBVIEW_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(theme) = args.theme {
            self.render.theme = theme;
        }

        if args.plain {
            self.render.plain_ansi = true;
        }

        if args.no_outputs {
            self.render.show_outputs = false;
        }

        if args.strip_tags {
            self.sanitizer.strip_tags = true;
        }

        if let Some(timeout_ms) = args.timeout_ms {
            self.loader.timeout_ms = timeout_ms;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env()?;
        config.apply_args(args);

        Ok(config)
    }

    /// Sanitizer options with the configured overrides applied.
    pub fn sanitize_options(&self) -> SanitizeOptions {
        let mut options = SanitizeOptions {
            strip_tags: self.sanitizer.strip_tags,
            ..SanitizeOptions::default()
        };
        if !self.sanitizer.allowed_tags.is_empty() {
            options.allowed_tags = self
                .sanitizer
                .allowed_tags
                .iter()
                .map(|tag| tag.to_ascii_lowercase())
                .collect();
        }
        self.sanitizer
            .extra_blocked_schemes
            .iter()
            .fold(options, |options, scheme| {
                options.with_blocked_scheme(scheme.as_str())
            })
    }

    /// Convert to renderer options.
    pub fn to_render_options(&self) -> RenderOptions {
        RenderOptions {
            theme: self.render.theme,
            show_outputs: self.render.show_outputs,
            plain_ansi: self.render.plain_ansi,
            sanitize: self.sanitize_options(),
        }
    }

    /// Convert to loader options.
    pub fn to_load_options(&self) -> LoadOptions {
        LoadOptions::default().timeout(Duration::from_millis(self.loader.timeout_ms))
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// Invalid environment variable value.
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for {}: '{}'", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
