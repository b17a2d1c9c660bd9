//! The immutable dataset table and its startup loader.

mod load;
mod order;


use crate::{
    error::{LoadError, QueryError},
    model::{EntityRecord, StatField, name_key},
};
use std::{
    collections::{HashMap, HashSet},
    path::Path,
    sync::Arc,
};

pub use order::RankOrder;
use order::RankOrderCache;

///
/// TableHandle
///
/// Shared read-only handle passed to every engine call.
///

pub type TableHandle = Arc<DatasetTable>;

///
/// DatasetTable
///
/// Ordered collection of records, created once and never mutated.
/// Insertion order is the tie-break for every stable sort.
///

#[derive(Debug)]
pub struct DatasetTable {
    records: Vec<EntityRecord>,
    by_name: HashMap<String, usize>,
    rank_cache: RankOrderCache,
}

impl DatasetTable {
    /// A table with no rows; every query on it reports an empty outcome.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            by_name: HashMap::new(),
            rank_cache: RankOrderCache::new(true),
        }
    }

    /// Build a table from already-typed records, enforcing row invariants,
    /// unique ids, and case-insensitive unique names.
    pub fn from_records(records: Vec<EntityRecord>) -> Result<Self, LoadError> {
        let mut by_name = HashMap::with_capacity(records.len());
        let mut ids = HashSet::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            record
                .check_invariants()
                .map_err(|message| LoadError::Integrity {
                    row: index + 1,
                    message,
                })?;

            if !ids.insert(record.id) {
                return Err(LoadError::DuplicateId { id: record.id });
            }
            if by_name.insert(record.name_key(), index).is_some() {
                return Err(LoadError::DuplicateName {
                    name: record.name.clone(),
                });
            }
        }

        Ok(Self {
            records,
            by_name,
            rank_cache: RankOrderCache::new(true),
        })
    }

    /// Load the table from a CSV source. Fails as a whole on any bad row.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let records = load::read_records(path)?;
        let table = Self::from_records(records)?;

        tracing::info!(
            path = %path.display(),
            rows = table.len(),
            "dataset table loaded"
        );

        Ok(table)
    }

    /// Load the table, degrading to an empty table when loading fails.
    #[must_use]
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        match Self::load(path) {
            Ok(table) => table,
            Err(err) => {
                tracing::error!(
                    path = %path.display(),
                    error = %err,
                    "dataset load failed; serving an empty table"
                );
                Self::empty()
            }
        }
    }

    /// Toggle memoization of per-stat rank orders.
    #[must_use]
    pub fn with_memoized_rank_order(mut self, enabled: bool) -> Self {
        self.rank_cache = RankOrderCache::new(enabled);
        self
    }

    #[must_use]
    pub fn into_handle(self) -> TableHandle {
        Arc::new(self)
    }

    //
    // Access
    //

    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&EntityRecord> {
        self.records.get(index)
    }

    /// Case-insensitive lookup returning the record and its table position.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<(usize, &EntityRecord)> {
        let index = *self.by_name.get(&name_key(name))?;

        Some((index, &self.records[index]))
    }

    /// Like `find`, but absence is a `NotFound` error.
    pub fn require(&self, name: &str) -> Result<(usize, &EntityRecord), QueryError> {
        self.find(name).ok_or_else(|| QueryError::not_found(name))
    }

    /// Record indices sorted descending by `stat`, ties in insertion order.
    #[must_use]
    pub fn rank_order(&self, stat: StatField) -> RankOrder {
        self.rank_cache.get_or_compute(&self.records, stat)
    }

    #[must_use]
    pub const fn memoizes_rank_order(&self) -> bool {
        self.rank_cache.is_enabled()
    }
}
