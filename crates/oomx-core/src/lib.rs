//! oomx-core — OOM exporter core library.
//!
//! This crate holds everything the tailer and the HTTP server share: the
//! static [`config::Config`], the persisted offset [`state::State`], the
//! compiled [`matcher::PatternMatcher`], the [`metrics::OomCounter`] sink and
//! the error taxonomy.
//!
//! # Data flow
//!
//! ```text
//! Scheduler ──► Tailer ──► PatternMatcher ──► OomCounter ◄── /metrics
//!     ▲            │
//!     └── State ◄──┘
//! ```

pub mod config;
pub mod error;
pub mod matcher;
pub mod metrics;
pub mod state;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, MetricsError, StateError, TimestampError};
pub use matcher::PatternMatcher;
pub use metrics::OomCounter;
pub use state::State;
pub use types::{OomEvent, SyslogTimestamp, TIMESTAMP_WIDTH};
