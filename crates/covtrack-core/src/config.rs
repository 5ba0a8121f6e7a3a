use crate::errors::CoverageError;
use crate::window::DEFAULT_WINDOW_DAYS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5000;

pub const ENV_DB: &str = "COVTRACK_DB";
pub const ENV_WINDOW_DAYS: &str = "COVTRACK_WINDOW_DAYS";
pub const ENV_STORE_TIMEOUT_MS: &str = "COVTRACK_STORE_TIMEOUT_MS";

const SAMPLE_CONFIG: &str = r#"# covtrack configuration
version: 1

# SQLite database file
database: covtrack.db

# Trailing window (days) used by coverage queries
window_days: 28

# Deadline for a single store call
store_timeout_ms: 5000
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoverageConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_database")]
    pub database: PathBuf,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

fn default_version() -> u32 {
    SUPPORTED_CONFIG_VERSION
}

fn default_database() -> PathBuf {
    PathBuf::from("covtrack.db")
}

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

fn default_store_timeout_ms() -> u64 {
    DEFAULT_STORE_TIMEOUT_MS
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            database: default_database(),
            window_days: default_window_days(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl CoverageConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), CoverageError> {
        if self.version != SUPPORTED_CONFIG_VERSION {
            return Err(CoverageError::validation(format!(
                "unsupported config version {} (supported: {})",
                self.version, SUPPORTED_CONFIG_VERSION
            )));
        }
        if self.window_days == 0 {
            return Err(CoverageError::validation("window_days must be > 0"));
        }
        if self.store_timeout_ms == 0 {
            return Err(CoverageError::validation("store_timeout_ms must be > 0"));
        }
        Ok(())
    }

    /// Environment variables win over the file.
    pub fn apply_env_overrides(&mut self) -> Result<(), CoverageError> {
        if let Ok(db) = std::env::var(ENV_DB) {
            if !db.trim().is_empty() {
                self.database = PathBuf::from(db);
            }
        }
        if let Ok(days) = std::env::var(ENV_WINDOW_DAYS) {
            self.window_days = days.trim().parse().map_err(|_| {
                CoverageError::validation(format!("{ENV_WINDOW_DAYS} is not a number: {days}"))
            })?;
        }
        if let Ok(ms) = std::env::var(ENV_STORE_TIMEOUT_MS) {
            self.store_timeout_ms = ms.trim().parse().map_err(|_| {
                CoverageError::validation(format!("{ENV_STORE_TIMEOUT_MS} is not a number: {ms}"))
            })?;
        }
        Ok(())
    }
}

/// Load the config file, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<CoverageConfig, CoverageError> {
    let mut cfg = if path.exists() {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoverageError::validation(format!("failed to read config {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "Read config file");
        serde_yaml::from_str::<CoverageConfig>(&raw)
            .map_err(|e| CoverageError::validation(format!("failed to parse YAML: {}", e)))?
    } else {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        CoverageConfig::default()
    };
    cfg.apply_env_overrides()?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn write_sample_config(path: &Path) -> Result<(), CoverageError> {
    std::fs::write(path, SAMPLE_CONFIG)
        .map_err(|e| CoverageError::validation(format!("failed to write sample config: {}", e)))
}
