//! Ambient process configuration (SPEC_FULL.md §D): TOML-backed `AppConfig`
//! with a documented `~/.config/<name>/config.toml` default location.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::worker_host::WorkerHostConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse configuration file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum WorkerHostMode {
    WorkerSet {
        #[serde(default = "default_elements_per_worker")]
        elements_per_worker: usize,
        #[serde(default = "default_worker_start_delay_ms")]
        worker_start_delay_ms: u64,
    },
    FixedPool {
        #[serde(default = "default_pool_max_size")]
        pool_max_size: usize,
    },
    DynamicPool {
        #[serde(default = "default_pool_min_size")]
        pool_min_size: usize,
        #[serde(default = "default_pool_max_size")]
        pool_max_size: usize,
    },
}

fn default_elements_per_worker() -> usize {
    10
}
fn default_worker_start_delay_ms() -> u64 {
    500
}
fn default_pool_min_size() -> usize {
    4
}
fn default_pool_max_size() -> usize {
    32
}
fn default_element_add_delay_ms() -> u64 {
    50
}
fn default_message_timeout_secs() -> u64 {
    30
}
fn default_message_attempts() -> u32 {
    3
}
fn default_message_attempt_interval_secs() -> u64 {
    5
}
fn default_auto_reconnect_max_retries() -> i64 {
    -1
}
fn default_auto_reconnect_delay_ms() -> u64 {
    2000
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_shutdown_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerHostSection {
    #[serde(flatten)]
    pub mode: WorkerHostMode,
    #[serde(default = "default_element_add_delay_ms")]
    pub element_add_delay_ms: u64,
}

impl Default for WorkerHostSection {
    fn default() -> Self {
        Self {
            mode: WorkerHostMode::WorkerSet {
                elements_per_worker: default_elements_per_worker(),
                worker_start_delay_ms: default_worker_start_delay_ms(),
            },
            element_add_delay_ms: default_element_add_delay_ms(),
        }
    }
}

impl WorkerHostSection {
    pub fn to_runtime_config(&self, shutdown_deadline_secs: u64) -> WorkerHostConfig {
        let mode = match self.mode {
            WorkerHostMode::WorkerSet { elements_per_worker, worker_start_delay_ms } => {
                crate::application::worker_host::WorkerHostMode::WorkerSet {
                    elements_per_worker,
                    worker_start_delay: Duration::from_millis(worker_start_delay_ms),
                }
            }
            WorkerHostMode::FixedPool { pool_max_size } => {
                crate::application::worker_host::WorkerHostMode::FixedPool { pool_max_size }
            }
            WorkerHostMode::DynamicPool { pool_min_size, pool_max_size } => {
                crate::application::worker_host::WorkerHostMode::DynamicPool { pool_min_size, pool_max_size }
            }
        };
        WorkerHostConfig {
            mode,
            element_add_delay: Duration::from_millis(self.element_add_delay_ms),
            element_add_jitter: Duration::from_millis(self.element_add_delay_ms / 4),
            shutdown_deadline_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolSection {
    pub message_timeout_secs: u64,
    pub message_attempts: u32,
    pub message_attempt_interval_secs: u64,
    pub auto_reconnect_max_retries: i64,
    pub auto_reconnect_delay_ms: u64,
}

impl Default for ProtocolSection {
    fn default() -> Self {
        Self {
            message_timeout_secs: default_message_timeout_secs(),
            message_attempts: default_message_attempts(),
            message_attempt_interval_secs: default_message_attempt_interval_secs(),
            auto_reconnect_max_retries: default_auto_reconnect_max_retries(),
            auto_reconnect_delay_ms: default_auto_reconnect_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShutdownSection {
    pub timeout_secs: u64,
}

impl Default for ShutdownSection {
    fn default() -> Self {
        Self { timeout_secs: default_shutdown_timeout_secs() }
    }
}

/// Process-level configuration (SPEC_FULL.md §D) — distinct from the
/// per-station template (§6), which is out of scope for the core crate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub worker_host: WorkerHostSection,
    pub protocol: ProtocolSection,
    pub logging: LoggingSection,
    pub shutdown: ShutdownSection,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The process's default config path, `~/.config/<name>/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ocpp-station-sim")
        .join("config.toml")
}

/// Installs the `tracing-subscriber` global subscriber honoring
/// `RUST_LOG`/`AppConfig.logging.level`.
pub fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.clone()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.protocol.message_timeout_secs, 30);
        assert_eq!(config.shutdown.timeout_secs, 60);
        assert!(matches!(config.worker_host.mode, WorkerHostMode::WorkerSet { .. }));
    }

    #[test]
    fn parses_documented_toml_shape() {
        let toml_text = r#"
            [worker_host]
            mode = "fixedPool"
            pool_max_size = 16

            [protocol]
            message_timeout_secs = 45

            [logging]
            level = "debug"

            [shutdown]
            timeout_secs = 30
        "#;
        let config: AppConfig = toml::from_str(toml_text).unwrap();
        assert!(matches!(config.worker_host.mode, WorkerHostMode::FixedPool { pool_max_size: 16 }));
        assert_eq!(config.protocol.message_timeout_secs, 45);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.shutdown.timeout_secs, 30);
    }
}
