//! oomx — OOM exporter.
//!
//! Tails a kernel log, counts `Killed process` lines by pid and process name,
//! and exposes the counts as `oom_events_total` for Prometheus to scrape.
//! Restarts resume from the persisted byte offset, so no line is counted twice.
//!
//! # Architecture
//!
//! ```text
//! Scheduler ──► Tailer ──► PatternMatcher ──► OomCounter ◄── server (/metrics)
//!     ▲            │
//!     └── State ◄──┘
//! ```
//!
//! The scheduler and the HTTP server run as separate tokio tasks sharing one
//! cancellation token; the counter is the only state they share.

pub mod server;

pub use oomx_core::{config, error, matcher, metrics, state, types};
pub use oomx_core::{
    Config, ConfigError, OomCounter, OomEvent, PatternMatcher, State, StateError,
};
pub use oomx_feeds::{file, scheduler, PassSummary, Scheduler, TailError, Tailer};

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Run the exporter until `cancel` fires.
///
/// Configuration, bind and state-load errors are returned before or right
/// after startup. The server is stopped whenever the monitor loop returns.
pub async fn run(config: Config, cancel: CancellationToken) -> anyhow::Result<()> {
    let counter = OomCounter::new()?;
    let scheduler = Scheduler::from_config(&config, counter.clone())?;
    let listener = server::bind(config.port()?).await?;

    let server = tokio::spawn(server::serve(listener, counter, cancel.clone()));
    let monitored = scheduler.run(cancel.clone()).await;
    cancel.cancel();

    let served = server.await?;
    let state = monitored?;
    served?;
    info!(offset = state.last_offset, "exporter stopped");
    Ok(())
}
