//! File tailer — one incremental pass over the monitored kernel log.
//!
//! A pass opens the file, seeks to the persisted offset and reads complete
//! lines until end-of-file, advancing `State::last_offset` after every line so
//! that progress survives a read error later in the same pass.
//!
//! Rotation is only detected by size: if the file is now shorter than the
//! stored offset it was truncated or replaced, and the pass starts over from
//! byte 0. A rename-and-recreate that leaves the new file at least as large as
//! the old offset is not detected.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use oomx_core::{OomCounter, OomEvent, PatternMatcher, State, SyslogTimestamp, TIMESTAMP_WIDTH};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tracing::{info, warn};

/// A pass that could not run to end-of-file. Never fatal to the process.
#[derive(Error, Debug)]
pub enum TailError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stat {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to seek {path} to offset {offset}: {source}")]
    Seek {
        path: PathBuf,
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("read error in {path} after offset {offset}: {source}")]
    Scan {
        path: PathBuf,
        offset: u64,
        #[source]
        source: std::io::Error,
    },
}

/// What happened to a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Shorter than the timestamp prefix; never parsed or matched.
    TooShort,
    /// Prefix is not a syslog timestamp; skipped.
    BadTimestamp,
    /// Valid line that the pattern does not match.
    Unmatched,
    /// Counted.
    Matched(OomEvent),
}

/// Counters for one pass, logged by the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Complete lines consumed.
    pub lines: u64,
    /// Lines that incremented the counter.
    pub matched: u64,
    /// Lines dropped for being too short or carrying a bad timestamp.
    pub skipped: u64,
    /// The stored offset was past end-of-file and reset to 0.
    pub truncated: bool,
    /// `State::last_offset` when the pass finished.
    pub offset: u64,
    /// Bytes after `offset` that end without a newline and were left unread.
    pub deferred_bytes: u64,
}

/// A deferred tail at least this long is reported by the scheduler, since a
/// writer that never finishes the line keeps it from ever being counted.
pub const LONG_TAIL_BYTES: u64 = 4096;

/// Reads one file incrementally and feeds matches into the counter.
#[derive(Debug, Clone)]
pub struct Tailer {
    path: PathBuf,
    matcher: PatternMatcher,
    counter: OomCounter,
}

impl Tailer {
    pub fn new(path: impl Into<PathBuf>, matcher: PatternMatcher, counter: OomCounter) -> Self {
        Self {
            path: path.into(),
            matcher,
            counter,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn counter(&self) -> &OomCounter {
        &self.counter
    }

    /// Read from `state.last_offset` to end-of-file.
    ///
    /// `state` is updated in place after every consumed line, including when
    /// this returns an error part-way through. A trailing line without a
    /// newline is left for the next pass so the offset always sits on a line
    /// boundary.
    pub async fn run_pass(&self, state: &mut State) -> Result<PassSummary, TailError> {
        let mut file = File::open(&self.path).await.map_err(|source| TailError::Open {
            path: self.path.clone(),
            source,
        })?;

        let size = file
            .metadata()
            .await
            .map_err(|source| TailError::Metadata {
                path: self.path.clone(),
                source,
            })?
            .len();

        let mut summary = PassSummary::default();
        if state.last_offset > size {
            warn!(
                path = %self.path.display(),
                offset = state.last_offset,
                size,
                "file shrank below stored offset, rescanning from start"
            );
            state.last_offset = 0;
            summary.truncated = true;
        }

        let mut position = file
            .seek(SeekFrom::Start(state.last_offset))
            .await
            .map_err(|source| TailError::Seek {
                path: self.path.clone(),
                offset: state.last_offset,
                source,
            })?;

        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|source| TailError::Scan {
                    path: self.path.clone(),
                    offset: state.last_offset,
                    source,
                })?;
            if read == 0 {
                break;
            }
            if buf.last() != Some(&b'\n') {
                summary.deferred_bytes = read as u64;
                break;
            }
            position += read as u64;

            let line = String::from_utf8_lossy(trim_line_ending(&buf));
            match self.process_line(&line) {
                LineOutcome::Matched(_) => summary.matched += 1,
                LineOutcome::TooShort | LineOutcome::BadTimestamp => summary.skipped += 1,
                LineOutcome::Unmatched => {}
            }
            summary.lines += 1;
            state.last_offset = position;
        }

        summary.offset = state.last_offset;
        Ok(summary)
    }

    /// Classify one line and count it if it is an OOM event.
    ///
    /// The pattern is applied to the text after the 15-byte timestamp.
    pub fn process_line(&self, line: &str) -> LineOutcome {
        if line.len() < TIMESTAMP_WIDTH {
            return LineOutcome::TooShort;
        }
        let timestamp = match SyslogTimestamp::parse_prefix(line) {
            Ok(ts) => ts,
            Err(e) => {
                warn!(error = %e, "skipping line");
                return LineOutcome::BadTimestamp;
            }
        };
        // The timestamp's own digits must not be mistaken for a pid.
        let message = line.get(TIMESTAMP_WIDTH..).unwrap_or_default();
        match self.matcher.extract(message) {
            Some(event) => {
                self.counter.record(&event);
                info!(
                    at = %timestamp.in_current_year(),
                    pid = %event.pid,
                    process_name = %event.process_name,
                    "detected OOM event"
                );
                LineOutcome::Matched(event)
            }
            None => LineOutcome::Unmatched,
        }
    }
}

fn trim_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
