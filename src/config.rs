//! Configuration module for dropzone-saver.

use serde::Deserialize;
use std::path::Path;

use crate::storage::BatchNaming;
use crate::{Result, SaverError};

/// Upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory that receives batch directories and the `latest` link.
    #[serde(default = "default_root")]
    pub root: String,
    /// Batch directory naming scheme (minute, unix).
    #[serde(default)]
    pub naming: BatchNaming,
    /// Timezone for minute-granularity names ("local" or an IANA name).
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Whether to maintain the `latest` symlink.
    #[serde(default = "default_latest_symlink")]
    pub latest_symlink: bool,
    /// Create intermediate directories for nested part filenames.
    #[serde(default)]
    pub create_parent_dirs: bool,
}

fn default_root() -> String {
    ".".to_string()
}

fn default_timezone() -> String {
    "local".to_string()
}

fn default_latest_symlink() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            naming: BatchNaming::default(),
            timezone: default_timezone(),
            latest_symlink: default_latest_symlink(),
            create_parent_dirs: false,
        }
    }
}

/// Web configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Local static content directory, checked first.
    #[serde(default = "default_static_path")]
    pub static_path: String,
    /// Installed static content directory used when `static_path` is missing.
    #[serde(default)]
    pub static_fallback: Option<String>,
    /// Maximum request body size for uploads in megabytes (0 = unlimited).
    #[serde(default)]
    pub max_upload_size_mb: u64,
    /// Report malformed multipart input as 400 instead of 500.
    #[serde(default)]
    pub client_errors_as_bad_request: bool,
}

fn default_static_path() -> String {
    "static".to_string()
}

impl WebConfig {
    /// Upload size limit in bytes, if one is configured.
    pub fn upload_limit_bytes(&self) -> Option<usize> {
        match self.max_upload_size_mb {
            0 => None,
            mb => Some((mb as usize).saturating_mul(1024 * 1024)),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            static_path: default_static_path(),
            static_fallback: None,
            max_upload_size_mb: 0,
            client_errors_as_bad_request: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty means console only.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Web configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SaverError::Config(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| SaverError::Config(format!("parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `DROPZONE_ROOT`: Override the upload root directory
    /// - `DROPZONE_LOG_LEVEL`: Override the log level
    pub fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var("DROPZONE_ROOT") {
            if !root.is_empty() {
                self.storage.root = root;
            }
        }
        if let Ok(level) = std::env::var("DROPZONE_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The upload root is empty
    /// - The log level is not recognized
    pub fn validate(&self) -> Result<()> {
        if self.storage.root.trim().is_empty() {
            return Err(SaverError::Validation(
                "storage.root must not be empty".to_string(),
            ));
        }
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "warning" | "error" => Ok(()),
            other => Err(SaverError::Validation(format!(
                "unknown log level: {other}"
            ))),
        }
    }
}
