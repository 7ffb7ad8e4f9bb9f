//! # Collection Registry
//!
//! Maps mount paths (`/users`, `/products`) to collections. The registry is an
//! ordinary value owned by the composition root and handed to whatever binds
//! transport routes; nothing reaches it through global state.
//!
//! Collections of different resource types sit behind the object-safe [`Endpoint`]
//! trait, which speaks [`serde_json::Value`] bodies.

use crate::framework::{
    CollectionClient, ConfigError, Reply, Request, Resource, ResourceError,
};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A type-erased collection.
#[async_trait]
pub trait Endpoint: Send + Sync {
    async fn dispatch(&self, request: Request) -> Result<Reply<Value>, ResourceError>;
}

#[async_trait]
impl<T: Resource + Serialize> Endpoint for CollectionClient<T> {
    async fn dispatch(&self, request: Request) -> Result<Reply<Value>, ResourceError> {
        let reply = self.handle(request).await?;
        let body = reply
            .body
            .map(|body| body.try_map(serde_json::to_value))
            .transpose()
            .map_err(|e| ResourceError::Internal(e.to_string()))?;
        Ok(Reply {
            status: reply.status,
            body,
        })
    }
}

#[derive(Default, Clone)]
pub struct Registry {
    routes: HashMap<String, Arc<dyn Endpoint>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        path: impl Into<String>,
        endpoint: Arc<dyn Endpoint>,
    ) -> Result<(), ConfigError> {
        let path = path.into();
        if self.routes.contains_key(&path) {
            return Err(ConfigError::DuplicatePath(path));
        }
        debug!(%path, "Registered");
        self.routes.insert(path, endpoint);
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<Arc<dyn Endpoint>> {
        self.routes.get(path).cloned()
    }

    /// Registered paths in ascending order.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.routes.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub async fn dispatch(&self, path: &str, request: Request) -> Result<Reply<Value>, ResourceError> {
        let Some(endpoint) = self.routes.get(path) else {
            warn!(%path, "No collection mounted");
            return Err(ResourceError::NotFound(path.to_string()));
        };
        endpoint.dispatch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_handle};
    use crate::framework::{Body, Method, Status};
    use crate::model::User;
    use serde_json::json;

    #[tokio::test]
    async fn test_dispatch_serializes_resource_bodies() {
        let (client, mut receiver) = create_mock_client::<User>(4);
        let mut registry = Registry::new();
        registry.register("/users", Arc::new(client)).unwrap();

        let task = tokio::spawn(async move {
            registry
                .dispatch("/users", Request::item(Method::Get, "alice"))
                .await
        });
        let (request, responder) = expect_handle(&mut receiver).await.unwrap();
        assert_eq!(request.method, Method::Get);
        responder
            .send(Ok(Reply::ok(Body::Resource(User::new("alice", "Alice", "a@x.io")))))
            .unwrap();

        let reply = task.await.unwrap().unwrap();
        assert_eq!(reply.status, Status::Ok);
        assert_eq!(
            reply.body,
            Some(Body::Resource(json!({"id": "alice", "name": "Alice", "email": "a@x.io"})))
        );
    }

    #[tokio::test]
    async fn test_unknown_path_and_duplicates() {
        let (client, _receiver) = create_mock_client::<User>(4);
        let mut registry = Registry::new();
        registry.register("/users", Arc::new(client.clone())).unwrap();

        assert!(matches!(
            registry.register("/users", Arc::new(client)),
            Err(ConfigError::DuplicatePath(_))
        ));
        assert_eq!(registry.paths(), vec!["/users".to_string()]);
        assert_eq!(
            registry
                .dispatch("/orders", Request::collection(Method::Get))
                .await,
            Err(ResourceError::NotFound("/orders".into()))
        );
    }
}
