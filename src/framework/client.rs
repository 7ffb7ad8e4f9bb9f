//! # Collection Client
//!
//! This module defines the generic client for talking to a
//! [`CollectionActor`](crate::framework::CollectionActor).

use crate::framework::error::ResourceError;
use crate::framework::message::{CollectionRequest, Method, Reply, Request};
use crate::framework::resource::Resource;
use crate::framework::rights::RequestContext;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};

/// A type-safe handle on one collection.
///
/// Holds only a sender, so cloning is cheap and clones can be shared across tasks.
/// Every method resolves once the actor has finished the operation, including the
/// persistence notifier for mutations.
pub struct CollectionClient<T: Resource> {
    sender: mpsc::Sender<CollectionRequest<T>>,
}

impl<T: Resource> Clone for CollectionClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Resource> CollectionClient<T> {
    pub fn new(sender: mpsc::Sender<CollectionRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn handle(&self, request: Request) -> Result<Reply<T>, ResourceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CollectionRequest::Handle {
                request,
                respond_to,
            })
            .await
            .map_err(|_| ResourceError::CollectionClosed)?;
        response.await.map_err(|_| ResourceError::CollectionDropped)?
    }

    // --- Snapshot accessors (no rights check) ---

    pub async fn snapshot(&self) -> Result<HashMap<String, T>, ResourceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CollectionRequest::Snapshot { respond_to })
            .await
            .map_err(|_| ResourceError::CollectionClosed)?;
        response.await.map_err(|_| ResourceError::CollectionDropped)?
    }

    /// Identifiers in ascending order.
    pub async fn ids(&self) -> Result<Vec<String>, ResourceError> {
        let mut ids: Vec<String> = self.snapshot().await?.into_keys().collect();
        ids.sort();
        Ok(ids)
    }

    /// Resources ordered by identifier.
    pub async fn list_all(&self) -> Result<Vec<T>, ResourceError> {
        let mut entries: Vec<(String, T)> = self.snapshot().await?.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries.into_iter().map(|(_, resource)| resource).collect())
    }

    // --- Verb helpers (default representation) ---

    pub async fn list(&self, ctx: RequestContext) -> Result<Reply<T>, ResourceError> {
        self.handle(Request::collection(Method::Get).with_context(ctx))
            .await
    }

    pub async fn create(&self, ctx: RequestContext, payload: Value) -> Result<Reply<T>, ResourceError> {
        self.handle(
            Request::collection(Method::Post)
                .with_context(ctx)
                .with_payload(payload),
        )
        .await
    }

    pub async fn replace_all(
        &self,
        ctx: RequestContext,
        payload: Value,
    ) -> Result<Reply<T>, ResourceError> {
        self.handle(
            Request::collection(Method::Put)
                .with_context(ctx)
                .with_payload(payload),
        )
        .await
    }

    pub async fn delete_all(&self, ctx: RequestContext) -> Result<Reply<T>, ResourceError> {
        self.handle(Request::collection(Method::Delete).with_context(ctx))
            .await
    }

    pub async fn get(&self, ctx: RequestContext, id: &str) -> Result<Reply<T>, ResourceError> {
        self.handle(Request::item(Method::Get, id).with_context(ctx))
            .await
    }

    pub async fn patch(
        &self,
        ctx: RequestContext,
        id: &str,
        payload: Value,
    ) -> Result<Reply<T>, ResourceError> {
        self.handle(
            Request::item(Method::Patch, id)
                .with_context(ctx)
                .with_payload(payload),
        )
        .await
    }

    pub async fn put(
        &self,
        ctx: RequestContext,
        id: &str,
        payload: Value,
    ) -> Result<Reply<T>, ResourceError> {
        self.handle(
            Request::item(Method::Put, id)
                .with_context(ctx)
                .with_payload(payload),
        )
        .await
    }

    pub async fn delete(&self, ctx: RequestContext, id: &str) -> Result<Reply<T>, ResourceError> {
        self.handle(Request::item(Method::Delete, id).with_context(ctx))
            .await
    }
}
