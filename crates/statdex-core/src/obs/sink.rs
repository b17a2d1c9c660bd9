//! Metrics sink boundary.
//!
//! Engine logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.

use crate::{
    error::QueryError,
    obs::metrics,
    query::{Outcome, RowCount},
};
use std::{cell::RefCell, sync::Arc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Arc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// QueryStatus
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueryStatus {
    Found,
    Empty,
    Failed,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    QueryStart {
        op: &'static str,
    },
    QueryFinish {
        op: &'static str,
        rows_returned: u64,
        status: QueryStatus,
    },
    RowsScanned {
        op: &'static str,
        rows_scanned: u64,
    },
    IntegrityViolation,
    RankCache {
        hit: bool,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

///
/// GlobalMetricsSink
/// Default sink that writes into the process-wide counters.
/// Acts as the concrete sink when no scoped override is installed.
///

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| m.apply(event));
    }
}

pub(crate) fn record(event: MetricsEvent) {
    // Clone out of the slot so a sink may itself record without re-borrowing.
    let override_sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match override_sink {
        Some(sink) => sink.record(event),
        None => GlobalMetricsSink.record(event),
    }
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Arc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Arc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

/// Record start and finish events around one engine operation.
pub(crate) fn observe<T: RowCount>(
    op: &'static str,
    run: impl FnOnce() -> Result<Outcome<T>, QueryError>,
) -> Result<Outcome<T>, QueryError> {
    record(MetricsEvent::QueryStart { op });

    let result = run();
    let (rows_returned, status) = match &result {
        Ok(Outcome::Found(value)) => (value.row_count() as u64, QueryStatus::Found),
        Ok(Outcome::Empty(_)) => (0, QueryStatus::Empty),
        Err(_) => (0, QueryStatus::Failed),
    };

    record(MetricsEvent::QueryFinish {
        op,
        rows_returned,
        status,
    });

    result
}

/// Count the rows one operation had to look at.
pub(crate) fn scanned(op: &'static str, rows: usize) {
    record(MetricsEvent::RowsScanned {
        op,
        rows_scanned: rows as u64,
    });
}

///
/// TESTS
///
