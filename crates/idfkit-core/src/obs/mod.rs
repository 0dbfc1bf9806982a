//! Observability: change notification and in-memory counters.
//!
//! Records report through `sink::record`; nothing else touches the
//! counters directly.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, EventState, TypeCounters, TypeSummary};
pub use sink::{
    CapturingSink, ChangeEvent, ChangeSink, metrics_report, metrics_reset_all, with_change_sink,
};
