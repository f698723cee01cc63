//! Configuration management.
//!
//! Configuration is read from a TOML file and then overridden by environment
//! variables. Every field is optional in the file:
//!
//! ```toml
//! [anki]
//! url = "http://127.0.0.1:8765"
//! api_key = "secret"
//! timeout_ms = 30000
//! connect_timeout_ms = 3000
//!
//! [logging]
//! format = "json"
//! filter = "ankistat=debug"
//! file = "/tmp/ankistat.log"
//!
//! [metrics]
//! enabled = true
//! port = 9464
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "ANKISTAT_CONFIG_PATH";

/// Resolved configuration plus problems that did not stop it loading.
///
/// Loading runs before logging is initialized, so callers print the
/// warnings themselves.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// The configuration to run with.
    pub config: AnkiStatConfig,
    /// Non-fatal problems, e.g. a default config file that failed to parse.
    pub warnings: Vec<String>,
}

impl From<AnkiStatConfig> for LoadedConfig {
    fn from(config: AnkiStatConfig) -> Self {
        Self {
            config,
            warnings: Vec::new(),
        }
    }
}

/// Main configuration for ankistat.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnkiStatConfig {
    /// AnkiConnect connection settings.
    pub anki: AnkiConnectConfig,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// Metrics settings.
    pub metrics: MetricsSettings,
}

/// AnkiConnect connection settings.
#[derive(Debug, Clone, Serialize)]
pub struct AnkiConnectConfig {
    /// Endpoint URL.
    pub url: String,
    /// API key, if AnkiConnect requires one.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl AnkiConnectConfig {
    /// Default AnkiConnect endpoint.
    pub const DEFAULT_URL: &'static str = "http://127.0.0.1:8765";
}

impl Default for AnkiConnectConfig {
    fn default() -> Self {
        Self {
            url: Self::DEFAULT_URL.to_string(),
            api_key: None,
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name; unknown names fall back to `Pretty`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize)]
pub struct LoggingSettings {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Optional log file; stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "info".to_string(),
            file: None,
        }
    }
}

/// Prometheus metrics settings.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSettings {
    /// Whether to install the Prometheus exporter.
    pub enabled: bool,
    /// Listener port for the exporter.
    pub port: u16,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 9464,
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// AnkiConnect section.
    pub anki: Option<ConfigFileAnki>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
    /// Metrics section.
    pub metrics: Option<ConfigFileMetrics>,
}

/// `[anki]` section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileAnki {
    /// Endpoint URL.
    pub url: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout_ms: Option<u64>,
    /// Connect timeout.
    pub connect_timeout_ms: Option<u64>,
}

/// `[logging]` section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileLogging {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Filter directive.
    pub filter: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

/// `[metrics]` section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileMetrics {
    /// Exporter toggle.
    pub enabled: Option<bool>,
    /// Exporter port.
    pub port: Option<u16>,
}

impl AnkiStatConfig {
    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config file.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;
        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Looks for `ankistat/config.toml` under the platform config directory.
    /// Falls back to defaults if no readable file is found; an unreadable
    /// file is reported in [`LoadedConfig::warnings`].
    #[must_use]
    pub fn load_default() -> LoadedConfig {
        Self::load_default_at(Self::default_path().as_deref())
    }

    fn load_default_at(path: Option<&Path>) -> LoadedConfig {
        let Some(path) = path.filter(|p| p.exists()) else {
            return LoadedConfig::default();
        };
        match Self::load_from_file(path) {
            Ok(config) => LoadedConfig::from(config),
            Err(e) => LoadedConfig {
                config: Self::default(),
                warnings: vec![format!(
                    "Ignoring unreadable config file {}: {e}",
                    path.display()
                )],
            },
        }
    }

    /// Resolves configuration from an explicit path, `ANKISTAT_CONFIG_PATH`,
    /// or the default location, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be loaded.
    pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
        let mut loaded = if let Some(path) = explicit {
            LoadedConfig::from(Self::load_from_file(path)?)
        } else {
            match std::env::var(CONFIG_PATH_ENV) {
                Ok(path) if !path.trim().is_empty() => {
                    LoadedConfig::from(Self::load_from_file(Path::new(&path))?)
                },
                _ => Self::load_default(),
            }
        };
        loaded.config = loaded.config.with_env_overrides();
        Ok(loaded)
    }

    /// Platform config file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ankistat")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Applies overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides using the given variable lookup.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("ANKI_CONNECT_URL") {
            self.anki.url = url;
        }
        if let Some(key) = var("ANKI_CONNECT_API_KEY") {
            self.anki.api_key = Some(key);
        }
        if let Some(timeout) = var("ANKI_CONNECT_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.anki.timeout_ms = timeout;
        }
        if let Some(format) = var("ANKISTAT_LOG_FORMAT") {
            self.logging.format = LogFormat::parse(&format);
        }
        if let Some(file) = var("ANKISTAT_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(file));
        }
        if let Some(enabled) = var("ANKISTAT_METRICS_ENABLED").and_then(|v| parse_bool(&v)) {
            self.metrics.enabled = enabled;
        }
        if let Some(port) = var("ANKISTAT_METRICS_PORT").and_then(|v| v.parse().ok()) {
            self.metrics.port = port;
        }
        self
    }

    /// Converts a `ConfigFile` to `AnkiStatConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(anki) = file.anki {
            if let Some(url) = anki.url {
                config.anki.url = url;
            }
            config.anki.api_key = anki.api_key;
            if let Some(v) = anki.timeout_ms {
                config.anki.timeout_ms = v;
            }
            if let Some(v) = anki.connect_timeout_ms {
                config.anki.connect_timeout_ms = v;
            }
        }
        if let Some(logging) = file.logging {
            if let Some(format) = logging.format {
                config.logging.format = LogFormat::parse(&format);
            }
            if let Some(filter) = logging.filter {
                config.logging.filter = filter;
            }
            config.logging.file = logging.file.map(PathBuf::from);
        }
        if let Some(metrics) = file.metrics {
            if let Some(v) = metrics.enabled {
                config.metrics.enabled = v;
            }
            if let Some(v) = metrics.port {
                config.metrics.port = v;
            }
        }

        config
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
