//! # Configuration
//!
//! Backend URL, request timeout, routing defaults and storage location.
//! Later sources win: built-in defaults, then `~/.qualarbi/config.toml`,
//! then `QUALARBI_*` env vars, then CLI flags.
//!
//! A missing file is replaced by a fully commented template on first run.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::constants::APP_NAME;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct QualarbiConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub app_name: Option<String>,
    pub default_route: Option<String>,
    pub login_path: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    pub prefix: Option<String>,
    pub file: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_ROUTE: &str = "dashboard";
pub const DEFAULT_LOGIN_PATH: &str = "/views/login.html";
pub const DEFAULT_STORAGE_PREFIX: &str = "qualarbi";
pub const DEFAULT_STORAGE_FILE: &str = "storage.json";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub app_name: String,
    pub default_route: String,
    pub login_path: String,
    pub api_base_url: String,
    pub timeout: Duration,
    pub storage_prefix: String,
    /// `None` means in-memory storage.
    pub storage_path: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve_with(&QualarbiConfig::default(), &CliOverrides::default(), |_| None)
    }
}

/// Values supplied on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub default_route: Option<String>,
    pub memory_storage: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.qualarbi/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".qualarbi"))
}

/// Returns the path to `~/.qualarbi/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.qualarbi/config.toml`.
///
/// A missing file yields defaults (and the template is written); a
/// malformed one is a `ConfigError::Parse`.
pub fn load_config() -> Result<QualarbiConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("No home directory, falling back to built-in config");
            return Ok(QualarbiConfig::default());
        }
    };

    if !path.exists() {
        info!("Writing config template to {}", path.display());
        generate_default_config(&path);
        return Ok(QualarbiConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<QualarbiConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: QualarbiConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Writes the commented template. Failures are logged, never fatal.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Qualarbi Configuration
# Every key is optional; anything left out keeps its built-in default.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# app_name = "Qualarbi"
# default_route = "dashboard"           # Fallback for unknown routes
# login_path = "/views/login.html"

# [api]
# base_url = "http://localhost:3000/api" # Or set QUALARBI_API_BASE_URL
# timeout_ms = 30000                     # Or set QUALARBI_API_TIMEOUT_MS

# [storage]
# prefix = "qualarbi"                    # Namespace for stored keys
# file = "storage.json"                  # Path relative to ~/.qualarbi/
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &QualarbiConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with(config, cli, |name| std::env::var(name).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
pub fn resolve_with(
    config: &QualarbiConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let api_base_url = cli
        .base_url
        .clone()
        .or_else(|| env("QUALARBI_API_BASE_URL"))
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    // Timeout: env → config → default. Unparseable env values are ignored.
    let timeout_ms = env("QUALARBI_API_TIMEOUT_MS")
        .and_then(|v| match v.parse::<u64>() {
            Ok(ms) => Some(ms),
            Err(e) => {
                warn!("Ignoring QUALARBI_API_TIMEOUT_MS={}: {}", v, e);
                None
            }
        })
        .or(config.api.timeout_ms)
        .unwrap_or(DEFAULT_TIMEOUT_MS);

    let default_route = cli
        .default_route
        .clone()
        .or_else(|| config.general.default_route.clone())
        .unwrap_or_else(|| DEFAULT_ROUTE.to_string());

    let storage_path = if cli.memory_storage {
        None
    } else {
        let file = config
            .storage
            .file
            .clone()
            .unwrap_or_else(|| DEFAULT_STORAGE_FILE.to_string());
        config_dir().map(|d| d.join(file))
    };

    ResolvedConfig {
        app_name: config
            .general
            .app_name
            .clone()
            .unwrap_or_else(|| APP_NAME.to_string()),
        default_route,
        login_path: config
            .general
            .login_path
            .clone()
            .unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string()),
        api_base_url: api_base_url.trim_end_matches('/').to_string(),
        timeout: Duration::from_millis(timeout_ms),
        storage_prefix: config
            .storage
            .prefix
            .clone()
            .unwrap_or_else(|| DEFAULT_STORAGE_PREFIX.to_string()),
        storage_path,
    }
}
