//! Generic engine for REST-style resource collections.
//!
//! This module maps REST verbs onto CRUD operations over a keyed collection of
//! application resources, gated by a rights table and followed by a persistence hook.
//!
//! # Main Components
//!
//! - [`Resource`] - Trait application types implement to live in a collection
//! - [`Rights`] / [`Right`] - Per-operation, per-resource rights
//! - [`PersistenceNotifier`] - Hook awaited after every committed change
//! - [`ResourceCollection`] - The mapping, its commit primitives and its handlers
//! - [`CollectionActor`] / [`CollectionClient`] - Single-owner access to a collection
//! - [`ResourceError`] / [`Status`] - The outcome taxonomy
//!
//! # Testing
//!
//! See [`mock`] for a recording notifier and channel-level client helpers.

pub mod actor;
pub mod client;
pub mod collection;
pub mod error;
pub mod format;
pub mod handlers;
pub mod message;
pub mod mock;
pub mod notifier;
pub mod resource;
pub mod rights;

pub use actor::CollectionActor;
pub use client::CollectionClient;
pub use collection::ResourceCollection;
pub use error::{ConfigError, ResourceError, Status};
pub use format::{FormatError, Formatter, Representation};
pub use message::{Body, CollectionRequest, Method, Reply, Request, Response, Scope};
pub use notifier::{LoggingNotifier, PersistError, PersistenceNotifier};
pub use resource::Resource;
pub use rights::{Decision, OperationKind, RequestContext, Right, Rights, RightsBuilder};
