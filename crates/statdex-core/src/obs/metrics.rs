use crate::obs::sink::{MetricsEvent, QueryStatus};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// EventState
/// Ephemeral, process-wide counters for engine operations.
///

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub operations: BTreeMap<String, OperationCounters>,
}

impl EventState {
    const fn new() -> Self {
        Self {
            ops: EventOps::new(),
            operations: BTreeMap::new(),
        }
    }

    /// Fold one event into the counters.
    pub(crate) fn apply(&mut self, event: MetricsEvent) {
        match event {
            MetricsEvent::QueryStart { op } => {
                self.ops.queries = self.ops.queries.saturating_add(1);
                let entry = self.entry(op);
                entry.calls = entry.calls.saturating_add(1);
            }

            MetricsEvent::QueryFinish {
                op,
                rows_returned,
                status,
            } => {
                self.ops.rows_returned = self.ops.rows_returned.saturating_add(rows_returned);
                match status {
                    QueryStatus::Found => self.ops.found = self.ops.found.saturating_add(1),
                    QueryStatus::Empty => self.ops.empty = self.ops.empty.saturating_add(1),
                    QueryStatus::Failed => self.ops.failed = self.ops.failed.saturating_add(1),
                }

                let entry = self.entry(op);
                entry.rows_returned = entry.rows_returned.saturating_add(rows_returned);
                match status {
                    QueryStatus::Found => entry.found = entry.found.saturating_add(1),
                    QueryStatus::Empty => entry.empty = entry.empty.saturating_add(1),
                    QueryStatus::Failed => entry.failed = entry.failed.saturating_add(1),
                }
            }

            MetricsEvent::RowsScanned { op, rows_scanned } => {
                self.ops.rows_scanned = self.ops.rows_scanned.saturating_add(rows_scanned);
                let entry = self.entry(op);
                entry.rows_scanned = entry.rows_scanned.saturating_add(rows_scanned);
            }

            MetricsEvent::IntegrityViolation => {
                self.ops.integrity_violations = self.ops.integrity_violations.saturating_add(1);
            }

            MetricsEvent::RankCache { hit } => {
                if hit {
                    self.ops.rank_cache_hits = self.ops.rank_cache_hits.saturating_add(1);
                } else {
                    self.ops.rank_cache_misses = self.ops.rank_cache_misses.saturating_add(1);
                }
            }
        }
    }

    fn entry(&mut self, op: &'static str) -> &mut OperationCounters {
        self.operations.entry(op.to_string()).or_default()
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EventOps {
    // Engine entrypoints
    pub queries: u64,
    pub found: u64,
    pub empty: u64,
    pub failed: u64,

    // Rows touched
    pub rows_scanned: u64,
    pub rows_returned: u64,

    // Table health
    pub integrity_violations: u64,
    pub rank_cache_hits: u64,
    pub rank_cache_misses: u64,
}

impl EventOps {
    const fn new() -> Self {
        Self {
            queries: 0,
            found: 0,
            empty: 0,
            failed: 0,
            rows_scanned: 0,
            rows_returned: 0,
            integrity_violations: 0,
            rank_cache_hits: 0,
            rank_cache_misses: 0,
        }
    }
}

///
/// OperationCounters
///

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OperationCounters {
    pub calls: u64,
    pub found: u64,
    pub empty: u64,
    pub failed: u64,
    pub rows_scanned: u64,
    pub rows_returned: u64,
}

static EVENT_STATE: Mutex<EventState> = Mutex::new(EventState::new());

/// Mutate the global counters.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    f(&mut EVENT_STATE.lock())
}

/// Point-in-time copy of the global counters.
#[must_use]
pub fn snapshot() -> EventState {
    EVENT_STATE.lock().clone()
}

/// Reset all counters.
pub fn reset() {
    with_state_mut(|m| *m = EventState::new());
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_accumulate_globally_and_per_operation() {
        let mut state = EventState::default();

        state.apply(MetricsEvent::QueryStart { op: "filter" });
        state.apply(MetricsEvent::RowsScanned {
            op: "filter",
            rows_scanned: 9,
        });
        state.apply(MetricsEvent::QueryFinish {
            op: "filter",
            rows_returned: 3,
            status: QueryStatus::Found,
        });
        state.apply(MetricsEvent::QueryStart { op: "extreme" });
        state.apply(MetricsEvent::QueryFinish {
            op: "extreme",
            rows_returned: 0,
            status: QueryStatus::Empty,
        });

        assert_eq!(state.ops.queries, 2);
        assert_eq!(state.ops.found, 1);
        assert_eq!(state.ops.empty, 1);
        assert_eq!(state.ops.rows_scanned, 9);
        assert_eq!(state.ops.rows_returned, 3);

        let filter = &state.operations["filter"];
        assert_eq!(filter.calls, 1);
        assert_eq!(filter.rows_scanned, 9);
        assert_eq!(filter.rows_returned, 3);
        assert_eq!(state.operations["extreme"].empty, 1);
    }

    #[test]
    fn cache_and_integrity_events_only_touch_global_counters() {
        let mut state = EventState::default();

        state.apply(MetricsEvent::RankCache { hit: true });
        state.apply(MetricsEvent::RankCache { hit: false });
        state.apply(MetricsEvent::RankCache { hit: true });
        state.apply(MetricsEvent::IntegrityViolation);

        assert_eq!(state.ops.rank_cache_hits, 2);
        assert_eq!(state.ops.rank_cache_misses, 1);
        assert_eq!(state.ops.integrity_violations, 1);
        assert!(state.operations.is_empty());
    }

    #[test]
    fn failures_count_without_rows() {
        let mut state = EventState::default();

        state.apply(MetricsEvent::QueryFinish {
            op: "stat_percentile",
            rows_returned: 0,
            status: QueryStatus::Failed,
        });

        assert_eq!(state.ops.failed, 1);
        assert_eq!(state.operations["stat_percentile"].failed, 1);
    }
}
