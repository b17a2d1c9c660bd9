use crate::obs::sink::{self, MetricsEvent};
use derive_more::Display;
use std::path::PathBuf;
use thiserror::Error as ThisError;

///
/// QueryError
///
/// Typed failure returned by every engine operation.
/// Zero matching records is not an error; see `query::Outcome`.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum QueryError {
    #[error("record not found: '{name}'")]
    NotFound { name: String },

    #[error("invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    #[error("data integrity violation in '{record}': {message}")]
    DataIntegrity { record: String, message: String },
}

impl QueryError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Construct an integrity violation.
    /// Logged and counted here so every call site reports it the same way.
    pub fn data_integrity(record: impl Into<String>, message: impl Into<String>) -> Self {
        let record = record.into();
        let message = message.into();

        tracing::warn!(record = %record, %message, "data integrity violation");
        sink::record(MetricsEvent::IntegrityViolation);

        Self::DataIntegrity { record, message }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::InvalidArgument { .. } => ErrorClass::InvalidArgument,
            Self::DataIntegrity { .. } => ErrorClass::DataIntegrity,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}: {self}", self.class())
    }
}

///
/// ErrorClass
/// Stable classification of query failures.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ErrorClass {
    #[display("not_found")]
    NotFound,
    #[display("invalid_argument")]
    InvalidArgument,
    #[display("data_integrity")]
    DataIntegrity,
}

///
/// LoadError
///
/// Startup failure while building the dataset table.
/// Any variant means no table was produced; partial loads never escape.
///

#[derive(Debug, ThisError)]
pub enum LoadError {
    #[error("failed to open dataset '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("row {row}: required field '{column}' is empty")]
    EmptyField { row: usize, column: &'static str },

    #[error("row {row}: field '{column}' has invalid value '{value}'")]
    InvalidField {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: {message}")]
    Integrity { row: usize, message: String },

    #[error("duplicate record name '{name}'")]
    DuplicateName { name: String },

    #[error("duplicate record id {id}")]
    DuplicateId { id: u32 },
}

///
/// TESTS
///
