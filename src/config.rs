//! Runtime configuration.
//!
//! Values are layered, later wins:
//! 1. built-in defaults
//! 2. `~/.config/leetwatch/config.toml` (or `--config`)
//! 3. `LEETCODE_SESSION` / `LEETCODE_CSRFTOKEN` environment variables
//! 4. command line flags

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cli::{Cli, RefreshArgs};
use crate::notify::{CommandNotifier, LogNotifier, Notifier, WebhookNotifier};
use crate::refresh::DEFAULT_TTL;
use crate::remote::Credentials;
use crate::store;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("invalid config {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("invalid ttl '{value}': {reason}")]
    Ttl { value: String, reason: String },

    #[error("no username configured, pass --user or set username in the config file")]
    MissingUsername,

    #[error(transparent)]
    Store(#[from] store::StoreError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NotifyConfig {
    #[default]
    Log,
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    Webhook {
        url: String,
    },
}

impl NotifyConfig {
    pub fn build(&self) -> Box<dyn Notifier> {
        match self {
            NotifyConfig::Log => Box::new(LogNotifier),
            NotifyConfig::Command { program, args } => Box::new(CommandNotifier::new(program.clone(), args.clone())),
            NotifyConfig::Webhook { url } => Box::new(WebhookNotifier::new(url.clone())),
        }
    }
}

/// Contents of config.toml, every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub username: Option<String>,
    pub data_file: Option<PathBuf>,
    pub ttl: Option<String>,
    pub session: Option<String>,
    pub csrftoken: Option<String>,
    pub notify: NotifyConfig,
}

impl FileConfig {
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse { path: path.to_path_buf(), reason: e.to_string() })
    }

    /// Read a config file. A missing file is only an error when the path was given explicitly.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content, path),
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => Ok(FileConfig::default()),
            Err(e) => Err(ConfigError::Read { path: path.to_path_buf(), reason: e.to_string() }),
        }
    }
}

pub struct Config {
    pub username: Option<String>,
    pub data_file: PathBuf,
    pub ttl: Duration,
    pub credentials: Credentials,
    pub notify: NotifyConfig,
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "leetwatch").map(|d| d.config_dir().join("config.toml"))
}

pub fn parse_ttl(value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value).map_err(|e| ConfigError::Ttl { value: value.to_string(), reason: e.to_string() })
}

impl Config {
    pub fn from_cli(cli: &Cli, refresh: &RefreshArgs) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path, true)?,
            None => match default_config_path() {
                Some(path) => FileConfig::load(&path, false)?,
                None => FileConfig::default(),
            },
        };

        Config::resolve(cli, refresh, file, |key| std::env::var(key).ok())
    }

    pub fn resolve(
        cli: &Cli,
        refresh: &RefreshArgs,
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let data_file = match cli.data_file.clone().or(file.data_file) {
            Some(path) => path,
            None => store::default_path()?,
        };

        let ttl = match refresh.ttl.as_deref().or(file.ttl.as_deref()) {
            Some(value) => parse_ttl(value)?,
            None => DEFAULT_TTL,
        };

        let credentials = Credentials {
            session: env("LEETCODE_SESSION").or(file.session),
            csrftoken: env("LEETCODE_CSRFTOKEN").or(file.csrftoken),
        };

        Ok(Config {
            username: refresh.user.clone().or(file.username),
            data_file,
            ttl,
            credentials,
            notify: file.notify,
        })
    }

    pub fn require_username(&self) -> Result<&str, ConfigError> {
        self.username.as_deref().filter(|u| !u.is_empty()).ok_or(ConfigError::MissingUsername)
    }
}
