//! Test builders — a scratch directory holding a kernel log and a state file,
//! plus constructors for the tailer and scheduler pointed at it.
//!
//! These are designed for readability in tests, not for production use. They
//! panic on I/O failure rather than returning `Result`.

use oomx::{OomCounter, PatternMatcher, Scheduler, State, Tailer};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::fixtures::OOM_PATTERN;

/// A temp directory with `kern.log` and `state.json` paths inside it.
pub struct LogDir {
    dir: tempfile::TempDir,
    pattern: String,
}

impl LogDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
            pattern: OOM_PATTERN.to_string(),
        }
    }

    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = pattern.to_string();
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("kern.log")
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.path().join("state.json")
    }

    /// Append raw text to the log, creating it if needed.
    pub fn append(&self, text: impl AsRef<str>) -> &Self {
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path())
            .expect("open log for append");
        f.write_all(text.as_ref().as_bytes()).expect("append to log");
        self
    }

    /// Replace the log contents in place (same inode), as `> kern.log` would.
    pub fn truncate_to(&self, text: impl AsRef<str>) -> &Self {
        std::fs::write(self.log_path(), text.as_ref()).expect("rewrite log");
        self
    }

    pub fn log_len(&self) -> u64 {
        std::fs::metadata(self.log_path()).map(|m| m.len()).unwrap_or(0)
    }

    pub fn saved_state(&self) -> State {
        State::load(self.state_path()).expect("load state")
    }

    pub fn tailer(&self, counter: &OomCounter) -> Tailer {
        Tailer::new(
            self.log_path(),
            PatternMatcher::new(&self.pattern).expect("valid test pattern"),
            counter.clone(),
        )
    }

    pub fn scheduler(&self, counter: &OomCounter, interval: Duration) -> Scheduler {
        Scheduler::new(self.tailer(counter), self.state_path(), interval)
    }

    /// YAML config pointing at this directory.
    pub fn config_yaml(&self, port: u16, interval_secs: u64) -> String {
        format!(
            "log_file: {log:?}\nlog_pattern: '{pattern}'\nexporter_port: \"{port}\"\nrepeat_interval: {interval_secs}\nstate_file: {state:?}\n",
            log = self.log_path().display().to_string(),
            pattern = self.pattern,
            state = self.state_path().display().to_string(),
        )
    }
}

impl Default for LogDir {
    fn default() -> Self {
        Self::new()
    }
}

pub fn counter() -> OomCounter {
    OomCounter::new().expect("register oom counter")
}
