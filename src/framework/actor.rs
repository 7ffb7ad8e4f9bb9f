//! # Collection Actor
//!
//! This module defines the `CollectionActor`, the single owner of one
//! [`ResourceCollection`]. It implements the "Server" side of the Actor Model:
//! requests are processed sequentially from a channel, so the collection never
//! sees two operations interleave.
//!
//! A mutating handler awaits the persistence notifier before it answers, and the
//! actor does not receive the next message until the handler is done. Readers
//! therefore only ever observe committed (or rolled-back) state.

use crate::framework::client::CollectionClient;
use crate::framework::collection::ResourceCollection;
use crate::framework::message::CollectionRequest;
use crate::framework::resource::Resource;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The actor that owns a collection.
///
/// # Usage Pattern
///
/// 1.  **Build**: Configure a [`ResourceCollection`] and load its seed data.
/// 2.  **Create**: Call `CollectionActor::new()` to get the `actor` and its `client`.
/// 3.  **Run**: Spawn `actor.run()` in a background task.
///
/// The actor stops when every client has been dropped.
pub struct CollectionActor<T: Resource> {
    receiver: mpsc::Receiver<CollectionRequest<T>>,
    collection: ResourceCollection<T>,
}

impl<T: Resource> CollectionActor<T> {
    /// Creates the actor and its client. Channel capacity comes from the
    /// collection's [`CollectionConfig`](crate::config::CollectionConfig).
    pub fn new(collection: ResourceCollection<T>) -> (Self, CollectionClient<T>) {
        let (sender, receiver) = mpsc::channel(collection.config().buffer_size.max(1));
        let actor = Self {
            receiver,
            collection,
        };
        (actor, CollectionClient::new(sender))
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    pub async fn run(mut self) {
        let collection = self.collection.name().to_string();
        info!(%collection, size = self.collection.len(), "Collection started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CollectionRequest::Handle {
                    request,
                    respond_to,
                } => {
                    let result = self.collection.handle(request).await;
                    match &result {
                        Ok(reply) => debug!(%collection, status = ?reply.status, "Handled"),
                        Err(e) => debug!(%collection, status = ?e.status(), error = %e, "Rejected"),
                    }
                    if respond_to.send(result).is_err() {
                        warn!(%collection, "Caller went away before the reply");
                    }
                }
                CollectionRequest::Snapshot { respond_to } => {
                    if respond_to.send(Ok(self.collection.map())).is_err() {
                        warn!(%collection, "Caller went away before the snapshot");
                    }
                }
            }
        }

        info!(%collection, size = self.collection.len(), "Shutdown");
    }
}
