//! Response checks
//!
//! Each request carries one check that decides whether its response counts
//! as a success. Failures render to the message recorded in the stats.

use serde_json::Value as JsonValue;
use thiserror::Error;

/// Why a response was classified as a failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckFailure {
    #[error("Unexpected status: {0}")]
    UnexpectedStatus(u16),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Missing expected response fields")]
    MissingFields,
}

/// How a response is judged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResponseCheck {
    /// Any status below 400 passes
    #[default]
    Default,
    /// The status must equal the given code
    Status(u16),
    /// The status must equal `status` and the body must be a JSON object
    /// containing every field in `fields`
    JsonFields {
        status: u16,
        fields: Vec<String>,
    },
}

impl ResponseCheck {
    pub fn json_fields<I, F>(status: u16, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        ResponseCheck::JsonFields {
            status,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Classify a response
    pub fn evaluate(&self, status: u16, body: &[u8]) -> Result<(), CheckFailure> {
        match self {
            ResponseCheck::Default => {
                if status >= 400 {
                    return Err(CheckFailure::UnexpectedStatus(status));
                }
                Ok(())
            }
            ResponseCheck::Status(expected) => expect_status(*expected, status),
            ResponseCheck::JsonFields {
                status: expected,
                fields,
            } => {
                expect_status(*expected, status)?;

                let parsed: JsonValue = serde_json::from_slice(body)
                    .map_err(|e| CheckFailure::InvalidJson(e.to_string()))?;

                match parsed.as_object() {
                    Some(object) if fields.iter().all(|f| object.contains_key(f)) => Ok(()),
                    _ => Err(CheckFailure::MissingFields),
                }
            }
        }
    }
}

fn expect_status(expected: u16, actual: u16) -> Result<(), CheckFailure> {
    if actual != expected {
        return Err(CheckFailure::UnexpectedStatus(actual));
    }
    Ok(())
}
