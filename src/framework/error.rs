//! # Engine Errors
//!
//! This module defines the outcome taxonomy shared by every collection. Handlers
//! never invent their own failure types: a rejected operation is always one of the
//! [`ResourceError`] variants, and every variant maps onto exactly one [`Status`].

use crate::framework::rights::OperationKind;
use serde::{Deserialize, Serialize};

/// Transport-agnostic outcome of a handled operation.
///
/// The numeric codes follow HTTP so a transport binding can forward them unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Ok,
    Created,
    NoContent,
    BadRequest,
    Forbidden,
    NotFound,
    MethodNotSupported,
    UnsupportedFormat,
    Conflict,
    InternalError,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::NoContent => 204,
            Status::BadRequest => 400,
            Status::Forbidden => 403,
            Status::NotFound => 404,
            Status::MethodNotSupported => 405,
            Status::UnsupportedFormat => 406,
            Status::Conflict => 409,
            Status::InternalError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Status::Ok | Status::Created | Status::NoContent)
    }
}

/// Errors a collection operation can end with.
///
/// Validation and rights failures are raised before anything is mutated. Only
/// [`ResourceError::Internal`] can follow a commit attempt.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ResourceError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("{kind} forbidden for {id}")]
    Forbidden { kind: OperationKind, id: String },
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Method not supported: {0}")]
    MethodNotSupported(String),
    #[error("Identifier conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Collection closed")]
    CollectionClosed,
    #[error("Collection dropped response channel")]
    CollectionDropped,
}

impl ResourceError {
    pub fn status(&self) -> Status {
        match self {
            ResourceError::NotFound(_) => Status::NotFound,
            ResourceError::BadRequest(_) => Status::BadRequest,
            ResourceError::Forbidden { .. } => Status::Forbidden,
            ResourceError::UnsupportedFormat(_) => Status::UnsupportedFormat,
            ResourceError::MethodNotSupported(_) => Status::MethodNotSupported,
            ResourceError::Conflict(_) => Status::Conflict,
            ResourceError::Internal(_)
            | ResourceError::CollectionClosed
            | ResourceError::CollectionDropped => Status::InternalError,
        }
    }

    pub(crate) fn forbidden(kind: OperationKind, id: impl Into<String>) -> Self {
        ResourceError::Forbidden {
            kind,
            id: id.into(),
        }
    }
}

/// Errors raised while wiring collections together, before any request is served.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No right configured for {0} and no fallback given")]
    UnsetRight(OperationKind),
    #[error("Path already registered: {0}")]
    DuplicatePath(String),
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
