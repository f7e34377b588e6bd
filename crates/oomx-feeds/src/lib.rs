//! oomx-feeds — the kernel log feed for oomx.
//!
//! [`file::Tailer`] performs one resumable pass over the log file and pushes
//! every matched line into the shared [`oomx_core::OomCounter`].
//! [`scheduler::Scheduler`] repeats that pass on a fixed interval, persisting
//! the consumed offset after each one, until its cancellation token fires.

pub mod file;
pub mod scheduler;

pub use file::{LineOutcome, PassSummary, TailError, Tailer};
pub use scheduler::Scheduler;
