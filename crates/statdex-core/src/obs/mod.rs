//! Observability: in-process counters and the sink boundary engines report through.
//!
//! Engines never touch `metrics` state directly; every event flows through
//! `sink::record`.

pub mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventState, OperationCounters};
pub use sink::{MetricsEvent, MetricsSink, QueryStatus, with_metrics_sink};
