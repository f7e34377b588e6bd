//! Core types for oomx-core.
//!
//! This module defines the values that flow from the tailer to the counter
//! sink: the [`OomEvent`] extracted from a single kernel log line and the
//! [`SyslogTimestamp`] that prefixes it.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};

use crate::error::TimestampError;

/// Width in bytes of the syslog timestamp prefix (`Jan 02 15:04:05`).
///
/// Lines shorter than this cannot carry a timestamp and are skipped before
/// any parsing or matching happens.
pub const TIMESTAMP_WIDTH: usize = 15;

/// chrono layout of the syslog prefix once a year has been prepended.
const SYSLOG_LAYOUT: &str = "%Y %b %d %H:%M:%S";

/// Leap year used to parse the prefix so that `Feb 29` is always accepted.
const PARSE_YEAR: i32 = 2000;

/// One OOM kill extracted from a matched line.
///
/// Ephemeral: built by the tailer, handed to the counter sink, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OomEvent {
    /// First capture group of the configured pattern.
    pub pid: String,
    /// Second capture group of the configured pattern.
    pub process_name: String,
}

impl OomEvent {
    pub fn new(pid: impl Into<String>, process_name: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            process_name: process_name.into(),
        }
    }
}

impl std::fmt::Display for OomEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (pid {})", self.process_name, self.pid)
    }
}

/// Yearless syslog timestamp, e.g. `Jan 02 15:04:05`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SyslogTimestamp(NaiveDateTime);

impl SyslogTimestamp {
    /// Parse the fixed-width prefix of `line`.
    ///
    /// The caller is expected to have checked `line.len() >= TIMESTAMP_WIDTH`;
    /// a shorter line, or one whose first 15 bytes do not fall on a character
    /// boundary, is reported as a parse error rather than panicking.
    pub fn parse_prefix(line: &str) -> Result<Self, TimestampError> {
        let prefix = line
            .get(..TIMESTAMP_WIDTH)
            .ok_or_else(|| TimestampError::new(line.chars().take(TIMESTAMP_WIDTH).collect::<String>()))?;
        Self::parse(prefix)
    }

    /// Parse exactly one `Mon DD HH:MM:SS` value.
    pub fn parse(value: &str) -> Result<Self, TimestampError> {
        let stamped = format!("{PARSE_YEAR} {value}");
        let parsed = NaiveDateTime::parse_from_str(&stamped, SYSLOG_LAYOUT)
            .map_err(|_| TimestampError::new(value))?;
        Ok(Self(parsed))
    }

    /// The timestamp placed in the current UTC year, falling back to the
    /// parse year when the date does not exist there (`Feb 29`).
    pub fn in_current_year(&self) -> NaiveDateTime {
        let year = Utc::now().year();
        self.0.with_year(year).unwrap_or(self.0)
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn time(&self) -> chrono::NaiveTime {
        self.0.time()
    }

    /// Calendar date within the parse year; only month and day are meaningful.
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }
}

impl std::fmt::Display for SyslogTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%b %d %H:%M:%S"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
