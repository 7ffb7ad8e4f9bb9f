#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # REST Collections
//!
//! > **REST verbs over in-memory resource collections, with rights and persistence hooks.**
//!
//! This crate maps HTTP-style verbs onto CRUD operations over named collections of
//! application-defined resources. Every operation is checked against a per-collection
//! rights table, and every committed change is handed to a persistence notifier
//! before the caller gets an answer.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Validate, then commit
//! A handler resolves every decision it owns (does the id exist? may this caller do
//! this to this resource? does the payload parse?) before it touches the store. The
//! hard case is collection-level `PUT`, which replaces the whole set: it checks every
//! create, update *and* implied delete first, then commits once. A single rejection
//! anywhere leaves the collection exactly as it was.
//!
//! ### One owner per collection
//! Each [`ResourceCollection`](framework::ResourceCollection) is owned by a
//! [`CollectionActor`](framework::CollectionActor) running in its own Tokio task.
//! Requests are processed one at a time, so there are no locks around the store and
//! no reader ever sees a half-applied change.
//!
//! ### No implicit permissions
//! [`Rights`](framework::Rights) are built once per collection from constants or
//! decision functions. An unset operation kind is a configuration error, not a
//! default allow.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Key items**: [`Resource`](framework::Resource), [`Rights`](framework::Rights),
//!   [`ResourceCollection`](framework::ResourceCollection),
//!   [`CollectionClient`](framework::CollectionClient),
//!   [`ResourceError`](framework::ResourceError).
//!
//! ### 2. The Orchestrator ([`lifecycle`])
//! - **Role**: Spawns collections, mounts them in a [`Registry`](lifecycle::Registry),
//!   shuts them down.
//! - **Key items**: [`RestSystem`](lifecycle::RestSystem), [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### 3. Configuration ([`config`])
//! - **Key items**: [`CollectionConfig`](config::CollectionConfig), [`SystemConfig`](config::SystemConfig).
//!
//! ### 4. Sample Resources ([`model`])
//! - [`User`](model::User) with caller-assigned ids, [`Product`](model::Product) with
//!   server-assigned ids and a CSV representation.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! cargo test
//! ```

pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
