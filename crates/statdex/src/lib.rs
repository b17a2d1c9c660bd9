//! ## Crate layout
//! - `core`: dataset table, record model, predicate compiler, and engines.
//! - `error`: public error type with a kind + origin taxonomy.
//! - `input`: statically typed inputs and argument-bag decoding.
//! - `operation`: the operation tag enum.
//! - `payload`: JSON success payloads.
//! - `registry`: the central tag to handler table.

pub use statdex_core as core;

pub mod error;
pub mod input;
pub mod operation;
pub mod payload;
pub mod registry;

pub use error::{Error, ErrorKind, ErrorOrigin, QueryErrorKind};
pub use operation::OperationKind;
pub use payload::{Payload, PayloadStatus};
pub use registry::{OperationInfo, Registry};

use statdex_core::{
    config::EngineConfig,
    table::{DatasetTable, TableHandle},
};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Load the configured dataset once, degrading to an empty table on failure.
#[must_use]
pub fn open_table(config: &EngineConfig) -> TableHandle {
    let table = match &config.data_path {
        Some(path) => DatasetTable::load_or_empty(path),
        None => {
            tracing::error!("no data_path configured; serving an empty table");
            DatasetTable::empty()
        }
    };

    table
        .with_memoized_rank_order(config.memoize_rank_order)
        .into_handle()
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{Error, OperationKind, Payload, PayloadStatus, Registry, open_table};
    pub use statdex_core::{config::EngineConfig, prelude::*};
}
