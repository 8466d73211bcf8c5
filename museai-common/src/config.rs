//! Configuration loading and resolution
//!
//! Every setting is resolved in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`MUSEAI_*`)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error; the service starts on defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// Environment variable names
pub mod env_vars {
    pub const HOST: &str = "MUSEAI_HOST";
    pub const PORT: &str = "MUSEAI_PORT";
    pub const OUTPUT_DIR: &str = "MUSEAI_OUTPUT_DIR";
    pub const STATS_FILE: &str = "MUSEAI_STATS_FILE";
    pub const MAX_QUANTITY: &str = "MUSEAI_MAX_QUANTITY";
    pub const RNG_SEED: &str = "MUSEAI_RNG_SEED";
    pub const LOG_LEVEL: &str = "MUSEAI_LOG_LEVEL";
}

/// Logging section of the TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// On-disk TOML configuration; every field optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub output_dir: Option<PathBuf>,
    pub stats_file: Option<PathBuf>,
    pub max_quantity: Option<u32>,
    pub rng_seed: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Compiled fallback values
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub host: String,
    pub port: u16,
    pub output_dir: PathBuf,
    pub stats_file: PathBuf,
    pub max_quantity: u32,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            output_dir: PathBuf::from("output"),
            stats_file: PathBuf::from("evolution_stats.json"),
            max_quantity: 100,
            log_level: default_log_level(),
        }
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub output_dir: Option<PathBuf>,
    pub stats_file: Option<PathBuf>,
    pub max_quantity: Option<u32>,
    pub rng_seed: Option<u64>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub output_dir: PathBuf,
    pub stats_file: PathBuf,
    pub max_quantity: u32,
    pub rng_seed: Option<u64>,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig::resolve(&ConfigOverrides::default(), &TomlConfig::default())
    }
}

impl ServiceConfig {
    /// Merge command line, environment, TOML and compiled defaults
    pub fn resolve(cli: &ConfigOverrides, toml: &TomlConfig) -> Self {
        let defaults = CompiledDefaults::default();
        let toml_level = Some(toml.logging.level.clone()).filter(|l| !l.trim().is_empty());

        let max_quantity = cli
            .max_quantity
            .or_else(|| env_parsed(env_vars::MAX_QUANTITY))
            .or(toml.max_quantity)
            .unwrap_or(defaults.max_quantity);

        Self {
            host: cli
                .host
                .clone()
                .or_else(|| env_string(env_vars::HOST))
                .or_else(|| toml.host.clone())
                .unwrap_or(defaults.host),
            port: cli
                .port
                .or_else(|| env_parsed(env_vars::PORT))
                .or(toml.port)
                .unwrap_or(defaults.port),
            output_dir: cli
                .output_dir
                .clone()
                .or_else(|| env_string(env_vars::OUTPUT_DIR).map(PathBuf::from))
                .or_else(|| toml.output_dir.clone())
                .unwrap_or(defaults.output_dir),
            stats_file: cli
                .stats_file
                .clone()
                .or_else(|| env_string(env_vars::STATS_FILE).map(PathBuf::from))
                .or_else(|| toml.stats_file.clone())
                .unwrap_or(defaults.stats_file),
            max_quantity: max_quantity.max(1),
            rng_seed: cli
                .rng_seed
                .or_else(|| env_parsed(env_vars::RNG_SEED))
                .or(toml.rng_seed),
            log_level: cli
                .log_level
                .clone()
                .or_else(|| env_string(env_vars::LOG_LEVEL))
                .or(toml_level)
                .unwrap_or(defaults.log_level),
        }
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T: FromStr>(name: &str) -> Option<T> {
    let raw = env_string(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={}: not a valid value", name, raw);
            None
        }
    }
}

/// Default TOML location: `<config dir>/museai/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("museai").join("config.toml"))
}

/// Load the TOML config file
///
/// An explicit `path` that does not exist, or no file at the default
/// location, yields defaults with a warning. A file that exists but cannot
/// be parsed is a configuration error.
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(p) => p,
        None => {
            warn!("Could not determine config directory, using defaults");
            return Ok(TomlConfig::default());
        }
    };

    if !path.exists() {
        warn!("Config file {} not found, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}
