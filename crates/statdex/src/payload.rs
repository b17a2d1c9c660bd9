use crate::{
    error::{Error, ErrorKind, ErrorOrigin},
    operation::OperationKind,
};
use serde::Serialize;
use serde_json::{Value, json};
use statdex_core::query::Outcome;

///
/// PayloadStatus
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadStatus {
    Ok,

    /// Success with nothing to report; `result.reason` says why.
    Empty,
}

///
/// Payload
///
/// Structured success response for one dispatched operation.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Payload {
    pub operation: OperationKind,
    pub status: PayloadStatus,
    pub result: Value,
}

impl Payload {
    pub fn render<T: Serialize>(operation: OperationKind, outcome: Outcome<T>) -> Result<Self, Error> {
        let (status, result) = match outcome {
            Outcome::Found(value) => {
                let result = serde_json::to_value(value).map_err(|err| {
                    Error::new(ErrorKind::Internal, ErrorOrigin::Render, err.to_string())
                })?;
                (PayloadStatus::Ok, result)
            }
            Outcome::Empty(reason) => (PayloadStatus::Empty, json!({ "reason": reason })),
        };

        Ok(Self {
            operation,
            status,
            result,
        })
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.status, PayloadStatus::Empty)
    }
}

///
/// TESTS
///
