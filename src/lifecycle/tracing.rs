//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the subscriber used by the demo binary.
//!
//! Every log line from the engine carries a `collection` field instead of a module
//! path, so targets are hidden (`with_target(false)`) and the compact format keeps
//! span names inline.
//!
//! ## What Gets Traced
//!
//! - **Collection lifecycle**: actor start with the seeded size, shutdown
//! - **Handlers**: `debug` on dispatch, `warn` on every rejection (not found,
//!   forbidden, unsupported format, collisions, adapter failures)
//! - **Commits**: `info` after `Set`, `Replaced`, `Deleted`, `Deleted all`, with the
//!   resulting size
//! - **Persistence**: `warn` when a notifier fails and the commit is rolled back
//!
//! ## Usage
//!
//! ```bash
//! # Commits and rejections
//! RUST_LOG=info cargo run
//!
//! # Every dispatched request and notifier batch
//! RUST_LOG=debug cargo run
//!
//! # Only the engine
//! RUST_LOG=rest_collections::framework=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a small session looks like:
//!
//! ```text
//! INFO Collection started collection="users" size=2
//! INFO Set collection="users" id="carol" size=3
//! WARN Forbidden collection="users" id="alice" kind=delete principal=Some("carol")
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
