//! # Resource Trait
//!
//! The `Resource` trait is the capability boundary between the engine and the
//! application's own types. The engine constructs, edits and names resources only
//! through these three methods and never reads their fields.
//!
//! # Architecture Note
//! Payloads arrive as [`serde_json::Value`], the structured default representation.
//! Most implementations deserialize them into a private DTO with
//! `serde_json::from_value` and validate from there. Custom wire formats are
//! translated into this representation by a [`Formatter`](crate::framework::Formatter)
//! before a resource ever sees them.

use serde_json::Value;
use std::fmt::Debug;

/// Trait that any application type must implement to live in a
/// [`ResourceCollection`](crate::framework::ResourceCollection).
pub trait Resource: Clone + Send + Sync + Debug + 'static {
    /// Validation failure raised by [`instantiate`](Resource::instantiate) or
    /// [`edit`](Resource::edit). Reported to callers as `BadRequest`.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Builds a new resource from a payload.
    ///
    /// `id` is `None` when the identifier will be assigned afterwards through
    /// [`create_id`](Resource::create_id).
    fn instantiate(id: Option<&str>, payload: &Value) -> Result<Self, Self::Error>;

    /// Applies a payload to this resource in place.
    fn edit(&mut self, payload: &Value) -> Result<(), Self::Error>;

    /// Assigns a fresh identifier to this resource and returns it.
    ///
    /// Types returning `None` (the default) do not support server-assigned ids, and
    /// collection-level create answers `MethodNotSupported` for them.
    fn create_id(&mut self) -> Option<String> {
        None
    }
}
