//! Configuration for the `dida` terminal client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/dida/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::DEFAULT_REQUEST_TIMEOUT;
use crate::command::DEFAULT_DEBOUNCE;
use crate::token::default_token_path;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    api: ApiFileConfig,
    search: SearchFileConfig,
    ui: UiFileConfig,
    account: AccountFileConfig,
}

/// `[api]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ApiFileConfig {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    token_file: Option<PathBuf>,
}

/// `[search]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SearchFileConfig {
    debounce_ms: Option<u64>,
}

/// `[ui]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
}

/// `[account]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct AccountFileConfig {
    username: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend root; always ends with `/`.
    pub base_url: String,
    /// Per-request timeout of the HTTP client.
    pub request_timeout: Duration,
    /// Quiet period before a search is committed.
    pub debounce: Duration,
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
    /// Where the bearer token is persisted; `None` keeps it in memory.
    pub token_file: Option<PathBuf>,
    /// Account to sign in with at startup.
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/".to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            debounce: DEFAULT_DEBOUNCE,
            poll_timeout: Duration::from_millis(50),
            token_file: default_token_path(),
            username: None,
            password: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or any config file cannot be parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        let base_url = cli
            .base_url
            .clone()
            .or_else(|| file.api.base_url.clone())
            .unwrap_or(defaults.base_url);
        let token_file = if cli.no_token_file {
            None
        } else {
            cli.token_file
                .clone()
                .or_else(|| file.api.token_file.clone())
                .or(defaults.token_file)
        };

        Self {
            base_url: with_trailing_slash(base_url),
            request_timeout: file
                .api
                .request_timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
            debounce: cli
                .debounce_ms
                .or(file.search.debounce_ms)
                .map_or(defaults.debounce, Duration::from_millis),
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            token_file,
            username: cli
                .username
                .clone()
                .or_else(|| file.account.username.clone()),
            password: cli.password.clone(),
        }
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal client for the dida to-do app")]
pub struct CliArgs {
    /// Backend root URL.
    #[arg(long, env = "DIDA_BASE_URL")]
    pub base_url: Option<String>,

    /// Path to config file (default: `~/.config/dida/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Account name to sign in with.
    #[arg(short, long, env = "DIDA_USER")]
    pub username: Option<String>,

    /// Account password. Only read from the CLI or environment.
    #[arg(long, env = "DIDA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Search debounce in milliseconds.
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Where to persist the bearer token (default: `~/.config/dida/token`).
    #[arg(long)]
    pub token_file: Option<PathBuf>,

    /// Keep the token in memory only.
    #[arg(long)]
    pub no_token_file: bool,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "DIDA_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/dida.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("dida").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
