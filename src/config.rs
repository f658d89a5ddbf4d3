use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ai::Provider;

/// Top-level application configuration. Absent sections disable the
/// corresponding integration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub ai: Option<AiConfig>,
    pub github: Option<GithubConfig>,
    pub grafana: Option<GrafanaConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// AI provider configuration. `provider` is fixed for the process lifetime;
/// exactly one of the connection fields matters per provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiConfig {
    pub provider: Provider,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub region: Option<String>,
    pub host: Option<String>,
}

impl AiConfig {
    pub fn model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    pub fn region(&self) -> String {
        self.region.clone().unwrap_or_else(|| "us-west-2".to_string())
    }

    pub fn host(&self) -> String {
        self.host
            .clone()
            .unwrap_or_else(|| "http://localhost:11434".to_string())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GithubConfig {
    pub token: Option<String>,
    pub org: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GrafanaConfig {
    pub url: String,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Unresolvable,
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolvable => write!(
                f,
                "cannot resolve config path: set AICTL_CONFIG or HOME/XDG_CONFIG_HOME"
            ),
            Self::Read { path, source } => {
                write!(f, "failed to read config file '{}': {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config file '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Unresolvable => None,
        }
    }
}

/// Loads the configuration, falling back to defaults when no file exists at
/// the resolved path. An explicit `--config` path must exist.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config_path()?,
    };

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && explicit.is_none() => {
            return Ok(Config::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    toml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
}

/// Validates the config file and returns its resolved path.
pub fn check(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config_path()?,
    };
    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let _: Config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = env::var("AICTL_CONFIG") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let trimmed = xdg.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed).join("aictl").join("config.toml"));
        }
    }

    let home = env::var("HOME").map_err(|_| ConfigError::Unresolvable)?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("aictl")
        .join("config.toml"))
}
