//! Configuration management for the Testaustime client.
//!
//! Settings live in a JSON file, by default
//! `<config dir>/testaustime-cli/config.json`:
//! - Linux: `~/.config/testaustime-cli/config.json`
//! - macOS: `~/Library/Application Support/testaustime-cli/config.json`
//! - Windows: `%APPDATA%/testaustime-cli/config.json`
//!
//! A missing file means defaults. Values can be overridden from the
//! environment, which is first populated from an optional `.env` file in the
//! local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. The configuration file
//! 4. Application defaults

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.testaustime.fi";
pub const API_URL_VAR: &str = "TESTAUSTIME_API_URL";
pub const TOKEN_VAR: &str = "TESTAUSTIME_TOKEN";

const APP_DIR: &str = "testaustime-cli";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot determine the configuration directory")]
    NoConfigDir,

    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("cannot serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("cannot load environment file: {0}")]
    Env(#[from] dotenv::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub token: String,
    pub api_url: String,
    /// Merge language and project names that only differ by case.
    pub case_insensitive_fields: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            case_insensitive_fields: false,
        }
    }
}

/// Where fresh credentials are persisted.
pub trait ConfigStore {
    fn update_token(&mut self, token: &str) -> Result<(), ConfigError>;
}

/// Loads environment variables from `<data local dir>/testaustime-cli/.env`
/// when that file exists.
///
/// Variables already set in the process environment win over the file.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] when the file exists but cannot be read or
/// parsed. A missing file is not an error.
///
/// # Example
///
/// ```
/// if let Err(e) = config::load_env() {
///     warning!(out, "Cannot load environment. Err: {}", e);
/// }
/// ```
pub fn load_env() -> Result<(), ConfigError> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push(".env");

    if path.is_file() {
        dotenv::from_path(&path)?;
    }
    Ok(())
}

pub fn default_path() -> Result<PathBuf, ConfigError> {
    let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    path.push(APP_DIR);
    path.push("config.json");
    Ok(path)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Overrides {
    api_url: Option<String>,
    token: Option<String>,
}

impl Overrides {
    fn from_env() -> Self {
        let var = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            api_url: var(API_URL_VAR),
            token: var(TOKEN_VAR),
        }
    }
}

/// The configuration file plus any environment overrides. Only the file's
/// own values are ever written back.
#[derive(Debug, Clone)]
pub struct FileConfig {
    path: PathBuf,
    stored: Config,
    overrides: Overrides,
}

impl FileConfig {
    /// Loads `alternate` if given, the default file otherwise, and applies
    /// the environment overrides.
    ///
    /// `TESTAUSTIME_API_URL` and `TESTAUSTIME_TOKEN` replace the file's
    /// values in [`FileConfig::config`] for this run only; they are never
    /// written back by [`FileConfig::persist`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoConfigDir`] when no `alternate` is given and the
    ///   platform has no configuration directory
    /// - [`ConfigError::Io`] / [`ConfigError::Parse`] when the file exists
    ///   but cannot be read or is not valid JSON
    ///
    /// # Example
    ///
    /// ```
    /// let store = FileConfig::load(invocation.flags.alternate_config_file.as_deref())?;
    /// let config = store.config();
    /// println!("Talking to {}", config.api_url);
    /// ```
    pub fn load(alternate: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match alternate {
            Some(path) => path.to_path_buf(),
            None => default_path()?,
        };
        let mut config = Self::load_from(path)?;
        config.overrides = Overrides::from_env();
        Ok(config)
    }

    /// Loads exactly the file at `path`, without environment overrides. A
    /// missing file yields the defaults; keys absent from the file keep
    /// their default values.
    ///
    /// # Errors
    ///
    /// Same as [`FileConfig::load`], minus [`ConfigError::NoConfigDir`].
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let stored = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?
        } else {
            Config::default()
        };

        Ok(Self {
            path,
            stored,
            overrides: Overrides::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The values in effect for this run.
    pub fn config(&self) -> Config {
        let mut config = self.stored.clone();
        if let Some(api_url) = &self.overrides.api_url {
            config.api_url = api_url.clone();
        }
        if let Some(token) = &self.overrides.token {
            config.token = token.clone();
        }
        config
    }

    /// Writes the stored values as pretty JSON, creating parent directories
    /// as needed.
    pub fn persist(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(&self.stored)?;
        fs::write(&self.path, json).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl ConfigStore for FileConfig {
    fn update_token(&mut self, token: &str) -> Result<(), ConfigError> {
        self.stored.token = token.to_string();
        self.persist()
    }
}
