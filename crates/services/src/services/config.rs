//! Console configuration: `config.toml`, then environment variables.

use std::{fs, io, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use super::list_screen::DEFAULT_PAGE_SIZE;

pub const CONFIG_FILE: &str = "config.toml";

pub const ENV_GRAPHQL_URL: &str = "CRITICAL_ASSET_GRAPHQL_URL";
pub const ENV_COMPANION_URL: &str = "CRITICAL_ASSET_COMPANION_URL";
pub const ENV_PAGE_SIZE: &str = "CRITICAL_ASSET_PAGE_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "CRITICAL_ASSET_TIMEOUT_SECS";
pub const ENV_DESKTOP_NOTIFICATIONS: &str = "CRITICAL_ASSET_DESKTOP_NOTIFICATIONS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid url for {field}: {source}")]
    InvalidUrl {
        field: &'static str,
        source: url::ParseError,
    },
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub graphql_url: String,
    pub companion_url: String,
    pub page_size: usize,
    pub request_timeout_secs: u64,
    pub desktop_notifications: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graphql_url: "http://localhost:4000/graphql".to_string(),
            companion_url: "http://localhost:3000/".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: 30,
            desktop_notifications: false,
        }
    }
}

impl Config {
    /// Defaults, overlaid by `config.toml` in the platform config directory,
    /// overlaid by the process environment (including a `.env` file).
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env");
        }
        let mut config = match utils::assets::config_dir() {
            Some(dir) => Self::from_file(&dir.join(CONFIG_FILE))?,
            None => Self::default(),
        };
        config.apply_env_from(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(raw) => {
                info!(path = %path.display(), "Loaded config file");
                Self::from_toml_str(&raw)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_GRAPHQL_URL) {
            self.graphql_url = url;
        }
        if let Some(url) = lookup(ENV_COMPANION_URL) {
            self.companion_url = url;
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            self.page_size = parse_env(ENV_PAGE_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = parse_env(ENV_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DESKTOP_NOTIFICATIONS) {
            self.desktop_notifications = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: ENV_DESKTOP_NOTIFICATIONS,
                        value: raw,
                    });
                }
            };
        }
        Ok(())
    }

    pub fn graphql_endpoint(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.graphql_url).map_err(|source| ConfigError::InvalidUrl {
            field: "graphql_url",
            source,
        })
    }

    pub fn companion_base(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.companion_url).map_err(|source| ConfigError::InvalidUrl {
            field: "companion_url",
            source,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str("page_size = 25\n").unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.graphql_url, Config::default().graphql_url);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config =
            Config::from_toml_str("graphql_url = \"https://file.example/graphql\"").unwrap();
        config
            .apply_env_from(env(&[
                (ENV_GRAPHQL_URL, "https://env.example/graphql"),
                (ENV_TIMEOUT_SECS, " 5 "),
                (ENV_DESKTOP_NOTIFICATIONS, "yes"),
            ]))
            .unwrap();

        assert_eq!(config.graphql_endpoint().unwrap().host_str(), Some("env.example"));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(config.desktop_notifications);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env_from(env(&[(ENV_PAGE_SIZE, "ten")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: ENV_PAGE_SIZE, .. }));

        config.companion_url = "not a url".to_string();
        assert!(matches!(
            config.companion_base(),
            Err(ConfigError::InvalidUrl { field: "companion_url", .. })
        ));

        assert!(matches!(
            Config::from_toml_str("page_size = \"many\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
    }
}
