//! Error taxonomy shared by every oomx layer.
//!
//! Only [`ConfigError`] and [`StateError::Corrupt`] are fatal, and only at
//! startup. Everything raised while a pass is running is logged and isolated
//! to that pass (or that line).

use std::path::PathBuf;
use thiserror::Error;

/// Invalid or unreadable configuration. Fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid log pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("log pattern must declare exactly 2 capture groups (pid, process name), found {0}")]
    GroupCount(usize),

    #[error("invalid configuration value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Failure to restore or persist the offset state file.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("state file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The first 15 bytes of a line are not a `Mon DD HH:MM:SS` timestamp.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unparseable syslog timestamp {value:?}")]
pub struct TimestampError {
    pub value: String,
}

impl TimestampError {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Failure to register or render the exported metrics.
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("metrics registry error: {0}")]
    Registry(#[from] prometheus::Error),

    #[error("metrics output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
