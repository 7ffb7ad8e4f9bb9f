//! # Mock Framework
//!
//! Utilities for testing code that sits around a collection.
//!
//! - [`RecordingNotifier`] stands in for the host's persistence hook: it remembers
//!   every batch of ids it was handed and can be switched into a failing mode.
//! - [`create_mock_client`] returns a real [`CollectionClient`] wired to a channel you
//!   control instead of an actor. Use [`expect_handle`] to pull the next request off
//!   that channel, assert on it, and answer it yourself.

use crate::framework::{
    CollectionClient, CollectionRequest, PersistError, PersistenceNotifier, Reply, Request,
    Resource, Response,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Notifier that records each call and optionally fails it.
///
/// Clones share state, so keep one clone in the test and hand the other to the
/// collection.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    batches: Arc<Mutex<Vec<Vec<String>>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that rejects every batch.
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.set_failing(true);
        notifier
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every batch received so far, failed ones included.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches
            .lock()
            .map(|batches| batches.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PersistenceNotifier for RecordingNotifier {
    async fn notify(&self, collection: &str, ids: &[String]) -> Result<(), PersistError> {
        if let Ok(mut batches) = self.batches.lock() {
            batches.push(ids.to_vec());
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistError(format!("{collection}: storage unavailable")));
        }
        Ok(())
    }
}

/// Creates a client and the receiver its requests arrive on.
///
/// # Testing Strategy
/// Code that only talks to a collection through its client (a transport binding, the
/// registry) does not need a running actor. The receiver lets the test play the
/// actor: inspect what was sent and decide what comes back.
pub fn create_mock_client<T: Resource>(
    buffer_size: usize,
) -> (CollectionClient<T>, mpsc::Receiver<CollectionRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CollectionClient::new(sender), receiver)
}

/// Helper to verify that the next message is a `Handle` request.
pub async fn expect_handle<T: Resource>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(Request, Response<Reply<T>>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Handle {
            request,
            respond_to,
        }) => Some((request, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{Body, Method, ResourceError, Scope};
    use crate::model::User;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        let get_task = tokio::spawn(async move {
            client
                .handle(Request::item(Method::Get, "alice"))
                .await
        });

        let (request, responder) = expect_handle(&mut receiver)
            .await
            .expect("Expected Handle request");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.scope, Scope::Item("alice".into()));
        let alice = User::new("alice", "Alice", "alice@example.com");
        responder.send(Ok(Reply::ok(Body::Resource(alice.clone())))).unwrap();

        let reply = get_task.await.unwrap().unwrap();
        assert_eq!(reply.body, Some(Body::Resource(alice)));
    }

    #[tokio::test]
    async fn test_mock_client_dropped_responder() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        let task = tokio::spawn(async move { client.handle(Request::collection(Method::Get)).await });
        let (_, responder) = expect_handle(&mut receiver).await.unwrap();
        drop(responder);

        assert_eq!(task.await.unwrap(), Err(ResourceError::CollectionDropped));
    }

    #[tokio::test]
    async fn test_recording_notifier_toggles() {
        let notifier = RecordingNotifier::new();
        assert!(notifier.notify("c", &["a".into()]).await.is_ok());
        notifier.set_failing(true);
        assert!(notifier.notify("c", &[]).await.is_err());
        assert_eq!(notifier.batches(), vec![vec!["a".to_string()], vec![]]);
    }
}
