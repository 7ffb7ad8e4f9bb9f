//! # Persistence Notifier
//!
//! The engine never touches durable storage. After every committed mutation it
//! awaits the host's [`PersistenceNotifier`] with the affected identifiers, and only
//! then answers the caller.

use async_trait::async_trait;
use tracing::info;

/// Failure reported by a notifier. Surfaced to callers as `InternalError`.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[error("persistence failed: {0}")]
pub struct PersistError(pub String);

/// Hook invoked after each commit.
///
/// `ids` is sorted and free of duplicates. It may be empty (e.g. delete-all on an
/// empty collection). Implementations own their timeout policy: the engine waits
/// for as long as the returned future takes.
#[async_trait]
pub trait PersistenceNotifier: Send + Sync {
    async fn notify(&self, collection: &str, ids: &[String]) -> Result<(), PersistError>;
}

/// Notifier that only logs the change set. Useful when nothing needs to be durable.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl PersistenceNotifier for LoggingNotifier {
    async fn notify(&self, collection: &str, ids: &[String]) -> Result<(), PersistError> {
        info!(collection, ?ids, "Persist");
        Ok(())
    }
}
