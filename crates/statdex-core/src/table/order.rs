use crate::{
    model::{EntityRecord, StatField},
    obs::sink::{self, MetricsEvent},
};
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};

///
/// RankOrder
///
/// Record indices sorted descending by one stat.
/// Ties keep table insertion order.
///

pub type RankOrder = Arc<[usize]>;

///
/// RankOrderCache
///
/// Memoized rank orders keyed by stat field.
/// Entries are computed outside the lock and published whole, so readers
/// never observe a partial order; concurrent misses may compute the same
/// order twice and the last writer wins.
///

#[derive(Debug)]
pub(crate) struct RankOrderCache {
    enabled: bool,
    orders: RwLock<HashMap<StatField, RankOrder>>,
}

impl RankOrderCache {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            orders: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn get_or_compute(&self, records: &[EntityRecord], stat: StatField) -> RankOrder {
        if !self.enabled {
            return compute_rank_order(records, stat);
        }

        if let Some(order) = self.orders.read().get(&stat) {
            sink::record(MetricsEvent::RankCache { hit: true });
            return Arc::clone(order);
        }

        sink::record(MetricsEvent::RankCache { hit: false });
        let order = compute_rank_order(records, stat);
        self.orders.write().insert(stat, Arc::clone(&order));

        order
    }

    #[cfg(test)]
    pub(crate) fn cached_len(&self) -> usize {
        self.orders.read().len()
    }
}

// Stable descending sort over record indices.
fn compute_rank_order(records: &[EntityRecord], stat: StatField) -> RankOrder {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| stat.value(&records[b]).cmp(&stat.value(&records[a])));

    order.into()
}

///
/// TESTS
///
