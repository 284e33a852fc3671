//! Host configuration: where the remote collection lives and how long to wait.

use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Prefix for environment overrides, e.g. `CATALOG_BACKEND_URL`.
pub const ENV_PREFIX: &str = "CATALOG_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the remote collection service.
    pub backend_url: String,
    /// Per-request timeout. Unset means whatever the HTTP client does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl CatalogConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Defaults overridden by `CATALOG_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        extract(Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Defaults, then the TOML file at `path`, then `CATALOG_*` environment variables.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        extract(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Toml::file(path))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    /// Parse from a TOML string, defaults filling the gaps (useful for testing).
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        extract(Figment::from(Serialized::defaults(Self::default())).merge(Toml::string(toml_str)))
    }
}

fn extract(figment: Figment) -> Result<CatalogConfig, ConfigError> {
    let config: CatalogConfig = figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;
    if config.backend_url.trim().is_empty() {
        return Err(ConfigError::Invalid("backend_url must not be empty".to_string()));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_point_at_local_backend() {
        let config = CatalogConfig::from_toml_str("").unwrap();
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_from_toml_str_overrides() {
        let config = CatalogConfig::from_toml_str(
            r#"
backend_url = "https://movies.example"
request_timeout_secs = 5
"#,
        )
        .unwrap();
        assert_eq!(config.backend_url, "https://movies.example");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_empty_backend_url_is_invalid() {
        let err = CatalogConfig::from_toml_str(r#"backend_url = " ""#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_type_is_parse_error() {
        let err = CatalogConfig::from_toml_str(r#"request_timeout_secs = "soon""#).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_file_not_found() {
        let err = CatalogConfig::load(Path::new("/nonexistent/catalog.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"backend_url = "http://10.0.0.2:9000""#).unwrap();

        let config = CatalogConfig::load(temp_file.path()).unwrap();
        assert_eq!(config.backend_url, "http://10.0.0.2:9000");
    }

    #[test]
    fn test_env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CATALOG_BACKEND_URL", "http://backend:8080");
            let config = CatalogConfig::from_env().map_err(|e| e.to_string())?;
            assert_eq!(config.backend_url, "http://backend:8080");
            Ok(())
        });
    }
}
