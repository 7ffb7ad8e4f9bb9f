//! Non-default representations.
//!
//! A request either uses the default structured representation or names a custom
//! format. Custom formats go through the collection's [`Formatter`]; when none is
//! registered, or it does not handle the format for the operation kind, the request
//! fails with `UnsupportedFormat`.

use crate::framework::rights::OperationKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Representation requested by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Representation {
    #[default]
    Default,
    Custom(String),
}

impl Representation {
    pub fn custom(format: impl Into<String>) -> Self {
        Representation::Custom(format.into())
    }

    pub fn format(&self) -> Option<&str> {
        match self {
            Representation::Default => None,
            Representation::Custom(format) => Some(format),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[error("{format}: {message}")]
pub struct FormatError {
    pub format: String,
    pub message: String,
}

impl FormatError {
    pub fn new(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            message: message.into(),
        }
    }
}

/// Translates between a custom format and the default representation.
pub trait Formatter<T>: Send + Sync {
    /// Whether `format` is available for operations of `kind`.
    ///
    /// Reads ask with `Read`, item creation with `Create`, and item or
    /// whole-collection edits with `Update`. A whole-collection replace asks once
    /// with `Update` even though it may also create and drop entries.
    fn supports(&self, kind: OperationKind, format: &str) -> bool;

    /// Renders a resource in `format`.
    fn encode(&self, format: &str, resource: &T) -> Result<Value, FormatError>;

    /// Converts a payload written in `format` into the default representation.
    fn decode(&self, format: &str, payload: Value) -> Result<Value, FormatError>;
}
