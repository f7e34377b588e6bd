//! Event counter sink — the `oom_events_total` Prometheus counter.
//!
//! [`OomCounter`] owns its own [`Registry`] rather than the process-global
//! default, so tests and multiple exporters in one process never collide.
//! Clones share the same underlying counters; the tailer increments through
//! one clone while the HTTP server encodes through another.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::MetricsError;
use crate::types::OomEvent;

pub const METRIC_NAME: &str = "oom_events_total";
pub const METRIC_HELP: &str = "Total number of OOM events";
pub const LABELS: [&str; 2] = ["pid", "process_name"];

#[derive(Clone)]
pub struct OomCounter {
    registry: Registry,
    events: IntCounterVec,
}

impl OomCounter {
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();
        let events = IntCounterVec::new(Opts::new(METRIC_NAME, METRIC_HELP), &LABELS)?;
        registry.register(Box::new(events.clone()))?;
        Ok(Self { registry, events })
    }

    /// Count one OOM kill.
    pub fn record(&self, event: &OomEvent) {
        self.events
            .with_label_values(&[event.pid.as_str(), event.process_name.as_str()])
            .inc();
    }

    /// Current value for one label pair (0 if never recorded).
    ///
    /// Reads through a gather so that asking about an unseen pair does not
    /// create an empty series in the exposition output.
    pub fn count(&self, pid: &str, process_name: &str) -> u64 {
        self.series()
            .into_iter()
            .find(|(event, _)| event.pid == pid && event.process_name == process_name)
            .map_or(0, |(_, value)| value)
    }

    /// Sum over every label pair.
    pub fn total(&self) -> u64 {
        self.series().into_iter().map(|(_, value)| value).sum()
    }

    /// Every recorded label pair with its current value.
    pub fn series(&self) -> Vec<(OomEvent, u64)> {
        self.registry
            .gather()
            .iter()
            .filter(|family| family.get_name() == METRIC_NAME)
            .flat_map(|family| family.get_metric())
            .map(|metric| {
                let label = |name: &str| {
                    metric
                        .get_label()
                        .iter()
                        .find(|pair| pair.get_name() == name)
                        .map(|pair| pair.get_value().to_string())
                        .unwrap_or_default()
                };
                let event = OomEvent::new(label(LABELS[0]), label(LABELS[1]));
                (event, metric.get_counter().get_value() as u64)
            })
            .collect()
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn content_type(&self) -> &'static str {
        prometheus::TEXT_FORMAT
    }
}

impl std::fmt::Debug for OomCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OomCounter")
            .field("total", &self.total())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
