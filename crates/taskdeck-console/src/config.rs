/*
[INPUT]:  Built-in defaults, optional YAML file, TASKDECK__* environment, CLI overrides
[OUTPUT]: Validated console configuration
[POS]:    Configuration layer - service location, UI and logging settings
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use taskdeck_adapter::{ClientConfig, DEFAULT_BASE_URL};
use thiserror::Error;
use url::Url;

use crate::paging::{HISTORY_PAGE_SIZE, TASK_PAGE_SIZE};

const ENV_PREFIX: &str = "TASKDECK";
const ENV_SEPARATOR: &str = "__";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level configuration for the console
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Where the task service lives and how long to wait for it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiConfig {
    /// Tasks per table page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Executions per history page
    #[serde(default = "default_history_page_size")]
    pub history_page_size: usize,
    /// Redraw interval in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            history_page_size: default_history_page_size(),
            tick_ms: default_tick_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogConfig {
    /// EnvFilter directive, e.g. "info" or "taskdeck_console=debug"
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional file that receives a copy of every log line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Values given on the command line; they win over every other source.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub log_level: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> usize {
    TASK_PAGE_SIZE
}

fn default_history_page_size() -> usize {
    HISTORY_PAGE_SIZE
}

fn default_tick_ms() -> u64 {
    250
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ConsoleConfig {
    /// `$CONFIG_DIR/taskdeck/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taskdeck").join("config.yaml"))
    }

    /// Layer defaults, the YAML file, the environment, and `overrides`.
    ///
    /// An explicit `path` must exist; the default location is used only if
    /// a file is present there.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) if !path.exists() => return Err(ConfigError::MissingFile(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.exists()),
        };

        let mut builder = Config::builder().add_source(Config::try_from(&ConsoleConfig::default())?);
        if let Some(file) = &file {
            builder = builder.add_source(File::from(file.as_path()).format(FileFormat::Yaml));
        }
        builder = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .set_override_option("service.base_url", overrides.base_url.clone())?
            .set_override_option("log.level", overrides.log_level.clone())?;

        let config: ConsoleConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.service.base_url).map_err(|err| ConfigError::Invalid {
            field: "service.base_url",
            reason: err.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "service.base_url",
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }
        if self.service.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "service.timeout_secs",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.ui.page_size == 0 || self.ui.history_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "ui.page_size",
                reason: "page sizes must be greater than 0".to_string(),
            });
        }
        if self.ui.tick_ms < 10 {
            return Err(ConfigError::Invalid {
                field: "ui.tick_ms",
                reason: "must be at least 10".to_string(),
            });
        }
        if self.log.level.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "log.level",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.service.base_url.clone(),
            timeout: Duration::from_secs(self.service.timeout_secs),
            connect_timeout: Duration::from_secs(self.service.connect_timeout_secs),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.ui.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("taskdeck-{}-{name}.yaml", std::process::id()));
        fs::write(&path, content).expect("write temp config");
        path
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ConsoleConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.service.base_url, "http://localhost:8080");
        assert_eq!(config.ui.page_size, 10);
        assert_eq!(config.ui.history_page_size, 5);
    }

    #[test]
    fn test_file_then_overrides() {
        let path = write_temp(
            "layers",
            "service:\n  base_url: http://tasks.internal:9000\nui:\n  page_size: 20\n",
        );
        let overrides = ConfigOverrides {
            base_url: None,
            log_level: Some("debug".to_string()),
        };

        let config = ConsoleConfig::load(Some(&path), &overrides).expect("load");
        assert_eq!(config.service.base_url, "http://tasks.internal:9000");
        assert_eq!(config.ui.page_size, 20);
        assert_eq!(config.ui.history_page_size, 5);
        assert_eq!(config.log.level, "debug");

        let overrides = ConfigOverrides {
            base_url: Some("http://override:1".to_string()),
            log_level: None,
        };
        let config = ConsoleConfig::load(Some(&path), &overrides).expect("load");
        assert_eq!(config.service.base_url, "http://override:1");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = ConsoleConfig::load(
            Some(Path::new("/nonexistent/taskdeck.yaml")),
            &ConfigOverrides::default(),
        )
        .expect_err("missing");
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = ConsoleConfig::default();
        config.service.base_url = "ftp://tasks".to_string();
        assert!(config.validate().is_err());

        let mut config = ConsoleConfig::default();
        config.ui.page_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "ui.page_size", .. })
        ));
    }

    #[test]
    fn test_client_config_uses_timeouts() {
        let mut config = ConsoleConfig::default();
        config.service.timeout_secs = 5;
        let client = config.client_config();
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.connect_timeout, Duration::from_secs(10));
    }
}
