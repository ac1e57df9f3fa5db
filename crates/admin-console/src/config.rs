//! Console settings.
//!
//! Sources are layered: built-in defaults, then an optional TOML file, then
//! `CONSOLE_*` environment variables. Command-line flags are applied last by
//! the binary.
//!
//! ```toml
//! endpoint = "http://localhost:4000/graphql"
//! channel_capacity = 64
//! create_ids = "client-generated"
//! log_filter = "admin_console=debug,info"
//! ```

use console_framework::CreateIdPolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File read when no `--config` path is given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "console.toml";

pub const ENV_ENDPOINT: &str = "CONSOLE_ENDPOINT";
pub const ENV_CREATE_IDS: &str = "CONSOLE_CREATE_IDS";
pub const ENV_LOG: &str = "CONSOLE_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid {var}: {message}")]
    Env { var: &'static str, message: String },
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// GraphQL endpoint. `None` runs against the in-process reference backend.
    pub endpoint: Option<String>,
    /// Capacity of every actor and controller command channel.
    pub channel_capacity: usize,
    pub create_ids: CreateIdPolicy,
    /// `tracing` filter directive; `RUST_LOG` applies when unset.
    pub log_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: None,
            channel_capacity: 32,
            create_ids: CreateIdPolicy::ServerAssigned,
            log_filter: None,
        }
    }
}

impl Settings {
    /// Defaults, then the config file, then the process environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        settings.apply_env(|var| std::env::var(var).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Rejects values the runtime cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "channel_capacity",
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Overrides fields from environment variables looked up through `lookup`.
    /// Empty values are ignored.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        if let Some(endpoint) = get(ENV_ENDPOINT) {
            self.endpoint = Some(endpoint);
        }
        if let Some(policy) = get(ENV_CREATE_IDS) {
            self.create_ids = policy.parse().map_err(|message| ConfigError::Env {
                var: ENV_CREATE_IDS,
                message,
            })?;
        }
        if let Some(filter) = get(ENV_LOG) {
            self.log_filter = Some(filter);
        }
        Ok(())
    }
}
