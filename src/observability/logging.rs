//! Structured logging configuration.

use crate::config::{LogFormat, LoggingSettings};
use crate::{Error, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Filter used when `--verbose` is given and `RUST_LOG` is unset.
const VERBOSE_FILTER: &str = "debug";

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Event filter.
    pub filter: EnvFilter,
    /// Log file; stderr when unset.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Builds logging configuration from settings.
    ///
    /// `RUST_LOG` wins over `--verbose`, which wins over the configured filter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the chosen filter does not parse.
    pub fn from_settings(settings: &LoggingSettings, verbose: bool) -> Result<Self> {
        let rust_log = std::env::var("RUST_LOG").ok();
        let directive = resolve_filter(rust_log.as_deref(), &settings.filter, verbose);
        let filter = EnvFilter::try_new(directive)
            .map_err(|e| Error::InvalidInput(format!("log filter '{directive}': {e}")))?;

        Ok(Self {
            format: settings.format,
            filter,
            file: settings.file.clone(),
        })
    }
}

fn resolve_filter<'a>(rust_log: Option<&'a str>, configured: &'a str, verbose: bool) -> &'a str {
    match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(env) => env,
        None if verbose => VERBOSE_FILTER,
        None => configured,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_wins() {
        assert_eq!(
            resolve_filter(Some("ankistat=trace"), "info", true),
            "ankistat=trace"
        );
    }

    #[test]
    fn test_verbose_over_configured() {
        assert_eq!(resolve_filter(None, "warn", true), "debug");
        assert_eq!(resolve_filter(Some("  "), "warn", true), "debug");
    }

    #[test]
    fn test_configured_default() {
        assert_eq!(resolve_filter(None, "warn", false), "warn");
    }

    #[test]
    fn test_invalid_filter_rejected() {
        let settings = LoggingSettings {
            filter: "ankistat=notalevel".to_string(),
            ..LoggingSettings::default()
        };
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = LoggingConfig::from_settings(&settings, false).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
