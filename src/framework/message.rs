//! # Requests, Replies & Actor Messages
//!
//! A transport binding turns a wire request into a [`Request`]: a verb, a scope
//! (the whole collection, or one item), an optional payload, the caller context and
//! the requested representation. Handlers answer with a [`Reply`] or a
//! [`ResourceError`].
//!
//! [`CollectionRequest`] is the envelope the [`CollectionClient`](crate::framework::CollectionClient)
//! sends to the [`CollectionActor`](crate::framework::CollectionActor).

use crate::framework::error::{ResourceError, Status};
use crate::framework::format::Representation;
use crate::framework::resource::Resource;
use crate::framework::rights::RequestContext;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Collection,
    Item(String),
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub scope: Scope,
    pub payload: Option<Value>,
    pub context: RequestContext,
    pub representation: Representation,
}

impl Request {
    pub fn new(method: Method, scope: Scope) -> Self {
        Self {
            method,
            scope,
            payload: None,
            context: RequestContext::anonymous(),
            representation: Representation::Default,
        }
    }

    pub fn collection(method: Method) -> Self {
        Self::new(method, Scope::Collection)
    }

    pub fn item(method: Method, id: impl Into<String>) -> Self {
        Self::new(method, Scope::Item(id.into()))
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }
}

/// Body of a successful reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Body<T> {
    Resource(T),
    List(Vec<T>),
    Id(String),
    Formatted(Value),
}

impl<T> Body<T> {
    /// Converts every resource in the body, leaving ids and formatted output alone.
    pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<Body<U>, E> {
        Ok(match self {
            Body::Resource(resource) => Body::Resource(f(resource)?),
            Body::List(resources) => {
                Body::List(resources.into_iter().map(f).collect::<Result<_, _>>()?)
            }
            Body::Id(id) => Body::Id(id),
            Body::Formatted(value) => Body::Formatted(value),
        })
    }
}

/// Successful outcome of a handled request.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub status: Status,
    pub body: Option<Body<T>>,
}

impl<T> Reply<T> {
    pub fn ok(body: Body<T>) -> Self {
        Self {
            status: Status::Ok,
            body: Some(body),
        }
    }

    pub fn created(id: String) -> Self {
        Self {
            status: Status::Created,
            body: Some(Body::Id(id)),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: Status::NoContent,
            body: None,
        }
    }
}

/// Type alias for the one-shot response channel used by collection actors.
pub type Response<T> = oneshot::Sender<Result<T, ResourceError>>;

/// Message sent to a [`CollectionActor`](crate::framework::CollectionActor).
#[derive(Debug)]
pub enum CollectionRequest<T: Resource> {
    /// Run the operation handler matching the request's verb and scope.
    Handle {
        request: Request,
        respond_to: Response<Reply<T>>,
    },
    /// Copy of the whole mapping, bypassing rights.
    Snapshot {
        respond_to: Response<HashMap<String, T>>,
    },
}
