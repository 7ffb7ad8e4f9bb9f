//! # System Lifecycle & Orchestration
//!
//! The composition root of the application: it builds collections, spawns the
//! actor that owns each of them, and mounts their clients in a [`Registry`].
//!
//! ## Startup
//!
//! 1. **Configure** - rights, notifier, formatter and [`CollectionConfig`](crate::config::CollectionConfig)
//!    for each collection
//! 2. **Seed** - `load_one` / `load_map` bypass rights and the notifier
//! 3. **Spawn** - one [`CollectionActor`](crate::framework::CollectionActor) task per collection
//! 4. **Mount** - register each client under its path
//!
//! ## Graceful Shutdown
//!
//! Each actor exits when the last clone of its client is dropped. The registry holds
//! clones too, so [`RestSystem::shutdown`] drops it along with the public clients
//! before awaiting the tasks.
//!
//! ## Observability
//!
//! [`setup_tracing`] initializes structured logging; see the [`tracing`](self::tracing) module.

pub mod registry;
pub mod rest_system;
pub mod tracing;

pub use registry::*;
pub use rest_system::*;
pub use self::tracing::setup_tracing;
