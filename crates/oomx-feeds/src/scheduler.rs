//! Scheduler loop — runs a [`Tailer`] pass every interval until cancelled.
//!
//! ```text
//! Idle ──► Running(pass) ──► Sleeping(interval) ──► Running(pass) ──► …
//!                                   │
//!                                   └── cancelled ──► Terminated
//! ```
//!
//! State is loaded once on entry and then lives only in memory; it is written
//! back after every pass whether or not the pass succeeded. A pass in flight
//! when cancellation arrives runs to completion and is saved before exit.

use std::path::{Path, PathBuf};
use std::time::Duration;

use oomx_core::{Config, ConfigError, OomCounter, PatternMatcher, State, StateError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::file::{Tailer, LONG_TAIL_BYTES};

pub struct Scheduler {
    tailer: Tailer,
    state_path: PathBuf,
    interval: Duration,
}

impl Scheduler {
    pub fn new(tailer: Tailer, state_path: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            tailer,
            state_path: state_path.into(),
            interval,
        }
    }

    /// Compile the configured pattern and wire a tailer to `counter`.
    pub fn from_config(config: &Config, counter: OomCounter) -> Result<Self, ConfigError> {
        let matcher = PatternMatcher::new(&config.log_pattern)?;
        let tailer = Tailer::new(&config.log_file, matcher, counter);
        Ok(Self::new(tailer, &config.state_file, config.interval()))
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Run until `cancel` fires, returning the last persisted state.
    ///
    /// Only the initial state load can fail; once the loop is running every
    /// error is logged and monitoring continues on the next interval.
    pub async fn run(self, cancel: CancellationToken) -> Result<State, StateError> {
        let mut state = State::load(&self.state_path)?;
        info!(
            path = %self.tailer.path().display(),
            offset = state.last_offset,
            interval_secs = self.interval.as_secs(),
            "starting log monitor"
        );

        // Offset at which an unterminated tail was last reported.
        let mut reported_tail = None;
        loop {
            match self.tailer.run_pass(&mut state).await {
                Ok(summary) => {
                    if summary.deferred_bytes >= LONG_TAIL_BYTES
                        && reported_tail != Some(summary.offset)
                    {
                        debug!(
                            offset = summary.offset,
                            bytes = summary.deferred_bytes,
                            "unterminated line at end of file, waiting for newline"
                        );
                        reported_tail = Some(summary.offset);
                    }
                    debug!(
                        lines = summary.lines,
                        matched = summary.matched,
                        skipped = summary.skipped,
                        offset = summary.offset,
                        "pass complete"
                    );
                    if summary.matched == 0 {
                        debug!("no OOM events detected since last check");
                    }
                }
                Err(e) => warn!(error = %e, offset = state.last_offset, "log pass failed"),
            }

            if let Err(e) = state.save(&self.state_path) {
                error!(error = %e, offset = state.last_offset, "failed to persist offset");
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!(offset = state.last_offset, "log monitor stopped");
        Ok(state)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
