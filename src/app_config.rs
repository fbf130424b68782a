use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::ConfigError;
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Engine identifier passed to the external translator (e.g. "google", "bing")
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Source language hint, "auto" lets the engine detect it
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target languages; a single "all" expands to every supported language
    #[serde(default = "default_target_languages")]
    pub target_languages: Vec<String>,

    /// Maximum number of simultaneous translations
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Ignore cached translations and translate again
    #[serde(default)]
    pub force: bool,

    /// Cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Retry settings for the external translator
    #[serde(default)]
    pub retry: RetryConfig,

    /// External translator settings
    #[serde(default)]
    pub translator: TranslatorConfig,

    /// Connectivity probe settings
    #[serde(default)]
    pub connectivity: ConnectivityConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            source_language: default_source_language(),
            target_languages: default_target_languages(),
            jobs: default_jobs(),
            force: false,
            cache: CacheConfig::default(),
            retry: RetryConfig::default(),
            translator: TranslatorConfig::default(),
            connectivity: ConnectivityConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .context(format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load a configuration file, or fall back to defaults when it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!("Config file not found at '{}', using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .context(format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.trim().is_empty() {
            return Err(ConfigError::Missing("engine"));
        }

        if self.source_language.trim().is_empty() {
            return Err(ConfigError::Missing("source_language"));
        }

        if self.target_languages.is_empty() {
            return Err(ConfigError::Missing("target_languages"));
        }

        if let Some(lang) = self.target_languages.iter().find(|l| l.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "target_languages",
                reason: format!("empty language code '{}'", lang),
            });
        }

        if self.jobs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "jobs",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.retry.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.cache.retention_days <= 0 || self.cache.retention_days > MAX_RETENTION_DAYS {
            return Err(ConfigError::InvalidValue {
                field: "cache.retention_days",
                reason: format!("must be between 1 and {}", MAX_RETENTION_DAYS),
            });
        }

        if self.translator.command.trim().is_empty() {
            return Err(ConfigError::Missing("translator.command"));
        }

        Ok(())
    }

    /// Target languages with "all" expanded and duplicates removed
    pub fn resolved_target_languages(&self) -> Vec<String> {
        language_utils::resolve_target_languages(&self.target_languages)
    }

    /// Default location of the configuration file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIRNAME)
            .join(DEFAULT_CONFIG_FILENAME)
    }
}

/// Directory name used below the per-user config and cache directories
pub const APP_DIRNAME: &str = "polytrans";

const DEFAULT_CONFIG_FILENAME: &str = "conf.json";
const DEFAULT_CACHE_FILENAME: &str = "cache.json";

/// Translation cache settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    /// Cache file location, defaults to the per-user cache directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Entries unused for longer than this are pruned
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,

    /// Persist the cache after every store instead of only at exit
    #[serde(default)]
    pub save_after_write: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: None,
            retention_days: default_retention_days(),
            save_after_write: false,
        }
    }
}

impl CacheConfig {
    /// Effective cache file path
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => path.clone(),
            None => default_cache_path(),
        }
    }
}

/// Default cache file: `<cache_dir>/polytrans/cache.json`
pub fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIRNAME)
        .join(DEFAULT_CACHE_FILENAME)
}

/// Retry policy for the external translator
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RetryConfig {
    /// Total attempts per translation, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff in milliseconds, multiplied by the attempt number
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Time budget for a single attempt
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// External translator command settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslatorConfig {
    /// Executable to run (translate-shell by default)
    #[serde(default = "default_translator_command")]
    pub command: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            command: default_translator_command(),
        }
    }
}

/// Connectivity probe settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConnectivityConfig {
    /// Address to open a TCP connection to
    #[serde(default = "default_probe_address")]
    pub probe_address: String,

    /// Probe timeout in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_address: default_probe_address(),
            timeout_ms: default_probe_timeout_ms(),
        }
    }
}

impl ConnectivityConfig {
    /// Probe timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_engine() -> String {
    "google".to_string()
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_target_languages() -> Vec<String> {
    language_utils::DEFAULT_LANGUAGES
        .iter()
        .map(|l| l.to_string())
        .collect()
}

fn default_jobs() -> usize {
    8
}

/// Upper bound for cache retention, about a century
pub const MAX_RETENTION_DAYS: i64 = 36_500;

fn default_retention_days() -> i64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    1000 // 1s before the second attempt, 2s before the third
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_translator_command() -> String {
    "trans".to_string()
}

fn default_probe_address() -> String {
    "8.8.8.8:53".to_string()
}

fn default_probe_timeout_ms() -> u64 {
    2000
}
