//! Configuration types for oomx.
//!
//! [`Config::load`] reads a YAML file (usually `config.yaml` next to the
//! binary), layered on top of the embedded defaults and then overridden by
//! `OOMX_*` environment variables. [`Config::from_yaml_str`] does the same for
//! an in-memory document without touching the filesystem or the environment.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
exporter_port:   "8080"
repeat_interval: 10
state_file:      "state.json"
"#;

const ENV_PREFIX: &str = "OOMX";

// ---------------------------------------------------------------------------
// Public config type
// ---------------------------------------------------------------------------

/// Static exporter configuration, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Kernel log to tail (e.g. `/var/log/kern.log`).
    pub log_file: PathBuf,
    /// Regex with exactly two capture groups: pid, then process name.
    pub log_pattern: String,
    #[serde(default = "default_exporter_port")]
    pub exporter_port: String,
    /// Seconds to sleep between passes.
    #[serde(default = "default_repeat_interval")]
    pub repeat_interval: u64,
    /// Where the consumed byte offset is persisted between runs.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

fn default_exporter_port() -> String { "8080".to_string() }
fn default_repeat_interval() -> u64 { 10 }
fn default_state_file() -> PathBuf { PathBuf::from("state.json") }

impl Config {
    /// Load `path` as YAML over the built-in defaults, then apply `OOMX_*`
    /// environment overrides. The file must exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml))
            .add_source(
                config::File::from(path.as_ref())
                    .format(config::FileFormat::Yaml)
                    .required(true),
            )
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a YAML document over the built-in defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml))
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would only fail later, once the exporter is running.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_file.as_os_str().is_empty() {
            return Err(invalid("log_file", "must not be empty"));
        }
        if self.state_file.as_os_str().is_empty() {
            return Err(invalid("state_file", "must not be empty"));
        }
        if self.repeat_interval == 0 {
            return Err(invalid("repeat_interval", "must be at least 1 second"));
        }
        self.port()?;
        Ok(())
    }

    /// The metrics listener port. An empty string means the default.
    pub fn port(&self) -> Result<u16, ConfigError> {
        let raw = self.exporter_port.trim();
        let raw = if raw.is_empty() { "8080" } else { raw };
        raw.parse::<u16>()
            .map_err(|e| invalid("exporter_port", format!("{raw:?}: {e}")))
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.repeat_interval)
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
