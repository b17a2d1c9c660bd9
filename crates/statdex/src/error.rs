use derive_more::Display;
use serde::Serialize;
use statdex_core::{
    config::ConfigError,
    error::{ErrorClass, LoadError, QueryError},
};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    pub(crate) fn unknown_operation(name: &str) -> Self {
        Self::new(
            ErrorKind::UnknownOperation,
            ErrorOrigin::Dispatch,
            format!("unknown operation '{name}'"),
        )
    }

    pub(crate) fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Query(QueryErrorKind::InvalidArgument),
            ErrorOrigin::Arguments,
            message,
        )
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Self::new(
            ErrorKind::Query(err.class().into()),
            ErrorOrigin::Engine,
            err.to_string(),
        )
    }
}

impl From<LoadError> for Error {
    fn from(err: LoadError) -> Self {
        Self::new(ErrorKind::Load, ErrorOrigin::Table, err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Config, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Query(QueryErrorKind),

    /// The operation name is not registered.
    UnknownOperation,

    /// The dataset could not be loaded.
    Load,
    Config,

    /// The caller cannot remediate this.
    Internal,
}

///
/// QueryErrorKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryErrorKind {
    /// Named record is absent.
    NotFound,

    /// Unknown or out-of-domain argument, including undecodable argument bags.
    InvalidArgument,

    /// A stored value violates its invariant.
    DataIntegrity,
}

impl From<ErrorClass> for QueryErrorKind {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::NotFound => Self::NotFound,
            ErrorClass::InvalidArgument => Self::InvalidArgument,
            ErrorClass::DataIntegrity => Self::DataIntegrity,
        }
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorOrigin {
    Arguments,
    Config,
    Dispatch,
    Engine,
    Render,
    Table,
}

///
/// TESTS
///
