//! Pattern matcher — extracts `(pid, process_name)` from a kernel log line.
//!
//! The configured pattern is compiled once at startup. It must declare exactly
//! two capture groups; anything else is a [`ConfigError`] rather than a
//! per-line failure.

use regex::Regex;

use crate::error::ConfigError;
use crate::types::OomEvent;

/// Capture groups the extraction logic expects: pid, then process name.
pub const EXPECTED_GROUPS: usize = 2;

/// A precompiled two-group pattern.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
}

impl PatternMatcher {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern)?;
        // captures_len() counts the implicit whole-match group.
        let groups = regex.captures_len() - 1;
        if groups != EXPECTED_GROUPS {
            return Err(ConfigError::GroupCount(groups));
        }
        Ok(Self { regex })
    }

    /// Match `message`, a log line with its timestamp prefix removed. `None`
    /// when the pattern does not match or when either group did not take part
    /// in the match.
    pub fn extract(&self, message: &str) -> Option<OomEvent> {
        let caps = self.regex.captures(message)?;
        let pid = caps.get(1)?;
        let process_name = caps.get(2)?;
        Some(OomEvent::new(pid.as_str(), process_name.as_str()))
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
