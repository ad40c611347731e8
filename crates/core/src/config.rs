//! TOML-based configuration for mergelens.
//!
//! Sensitive values are stored as `*_env` fields naming environment
//! variables; the actual secrets are resolved at runtime via
//! [`AppConfig::resolve_env_vars`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;

/// Top-level application configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Analysis backend settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Analysis backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Analysis API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Environment variable holding a bearer token, if the backend
    /// requires one.
    #[serde(default)]
    pub token_env: Option<String>,

    /// Resolved token (populated by `resolve_env_vars`).
    #[serde(skip)]
    pub token: Option<String>,
}

fn default_api_url() -> String {
    "http://localhost:4000".into()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_env: None,
            token: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Resolve `*_env` references into their secret values.
    pub fn resolve_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(var) = &self.analysis.token_env {
            match std::env::var(var) {
                Ok(value) => self.analysis.token = Some(value),
                Err(_) => {
                    return Err(ConfigError::EnvVarMissing {
                        var: var.clone(),
                        field: "analysis.token_env".into(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Validate field values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.analysis.api_url.starts_with("http://")
            && !self.analysis.api_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "analysis.api_url".into(),
                detail: format!("'{}' is not an http(s) URL", self.analysis.api_url),
            });
        }
        match self.log.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::InvalidValue {
                field: "log.level".into(),
                detail: format!("unknown level '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.analysis.api_url, "http://localhost:4000");
        assert_eq!(config.log.level, "info");
        config.validate().unwrap();
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[analysis]\napi_url = \"https://analysis.example.com\"\n\n[log]\nlevel = \"debug\""
        )
        .unwrap();
        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.analysis.api_url, "https://analysis.example.com");
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load_from_file(Path::new("/nonexistent/mergelens.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [[[").unwrap();
        let err = AppConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_env_var_missing() {
        let mut config = AppConfig::default();
        config.analysis.token_env = Some("MERGELENS_TEST_ABSENT_VAR".into());
        let err = config.resolve_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarMissing { .. }));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.analysis.api_url = "ftp://nope".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));

        let mut config = AppConfig::default();
        config.log.level = "loud".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
