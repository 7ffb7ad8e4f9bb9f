//! # Operation Handlers
//!
//! One handler per verb × scope. Each is a short decision sequence that stops at its
//! first terminal condition:
//!
//! | Scope      | Verb   | Handler                                           |
//! |------------|--------|---------------------------------------------------|
//! | collection | GET    | [`list_all`](ResourceCollection::list_all)        |
//! | collection | POST   | [`create_one`](ResourceCollection::create_one)    |
//! | collection | PUT    | [`replace_all`](ResourceCollection::replace_all)  |
//! | collection | DELETE | [`delete_all`](ResourceCollection::delete_all)    |
//! | item       | GET    | [`read_one`](ResourceCollection::read_one)        |
//! | item       | PATCH  | [`patch_one`](ResourceCollection::patch_one)      |
//! | item       | PUT    | [`put_one`](ResourceCollection::put_one)          |
//! | item       | DELETE | [`delete_one`](ResourceCollection::delete_one)    |
//!
//! Collection PATCH and item POST answer `MethodNotSupported`.
//!
//! ## Validate, then commit
//!
//! No handler mutates the store before every check it owns has passed. Edits are
//! applied to a clone, and the clone is committed. Collection PUT resolves the
//! decision for every identifier in the payload *and* every identifier it would drop
//! before its single call to [`set_all`](ResourceCollection::set_all).

use crate::framework::collection::ResourceCollection;
use crate::framework::error::ResourceError;
use crate::framework::format::{Formatter, Representation};
use crate::framework::message::{Body, Method, Reply, Request, Scope};
use crate::framework::resource::Resource;
use crate::framework::rights::{OperationKind, RequestContext};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

impl<T: Resource> ResourceCollection<T> {
    /// Dispatches a request to the handler for its verb and scope.
    pub async fn handle(&mut self, request: Request) -> Result<Reply<T>, ResourceError> {
        let Request {
            method,
            scope,
            payload,
            context,
            representation,
        } = request;
        debug!(collection = %self.name(), %method, ?scope, "Handle");

        match (method, scope) {
            (Method::Get, Scope::Collection) => self.list_all(&context, &representation),
            (Method::Post, Scope::Collection) => {
                self.create_one(&context, &representation, payload).await
            }
            (Method::Put, Scope::Collection) => {
                self.replace_all(&context, &representation, payload).await
            }
            (Method::Delete, Scope::Collection) => self.delete_all(&context).await,
            (Method::Get, Scope::Item(id)) => self.read_one(&context, &representation, &id),
            (Method::Patch, Scope::Item(id)) => {
                self.patch_one(&context, &representation, id, payload).await
            }
            (Method::Put, Scope::Item(id)) => {
                self.put_one(&context, &representation, id, payload).await
            }
            (Method::Delete, Scope::Item(id)) => self.delete_one(&context, &id).await,
            (method @ Method::Patch, Scope::Collection) | (method @ Method::Post, Scope::Item(_)) => {
                warn!(collection = %self.name(), %method, "Method not supported");
                Err(ResourceError::MethodNotSupported(format!(
                    "{method} on {}",
                    self.name()
                )))
            }
        }
    }

    // --- Collection scope ---

    /// Lists every resource the caller may read. Unreadable ones are left out.
    pub fn list_all(
        &self,
        ctx: &RequestContext,
        representation: &Representation,
    ) -> Result<Reply<T>, ResourceError> {
        let formatter = self.custom_formatter(OperationKind::Read, representation)?;
        let visible: Vec<T> = self
            .list()
            .into_iter()
            .filter(|resource| self.rights.authorize(OperationKind::Read, ctx, resource))
            .collect();
        debug!(collection = %self.name(), visible = visible.len(), total = self.len(), "List");

        match formatter {
            None => Ok(Reply::ok(Body::List(visible))),
            Some((formatter, format)) => {
                let encoded = visible
                    .iter()
                    .map(|resource| formatter.encode(format, resource))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| ResourceError::Internal(e.to_string()))?;
                Ok(Reply::ok(Body::Formatted(Value::Array(encoded))))
            }
        }
    }

    /// Creates one resource under a server-assigned identifier.
    pub async fn create_one(
        &mut self,
        ctx: &RequestContext,
        representation: &Representation,
        payload: Option<Value>,
    ) -> Result<Reply<T>, ResourceError> {
        let formatter = self.custom_formatter(OperationKind::Create, representation)?;
        let payload = decode(formatter, require(payload)?)?;
        let mut resource = self.instantiate(None, &payload)?;

        let attempts = self.config.create_id_attempts.max(1);
        let mut attempt = 0;
        let mut collided: Option<String> = None;
        let id = loop {
            let Some(id) = resource.create_id() else {
                // Out of fresh ids after a collision
                if let Some(last) = collided {
                    warn!(collection = %self.name(), id = %last, attempt, "No identifier left");
                    return Err(ResourceError::Conflict(last));
                }
                warn!(collection = %self.name(), "No create_id capability");
                return Err(ResourceError::MethodNotSupported(format!(
                    "POST on {}: resource does not assign identifiers",
                    self.name()
                )));
            };
            if !self.has(&id) {
                break id;
            }
            attempt += 1;
            warn!(collection = %self.name(), %id, attempt, "Identifier collision");
            if attempt >= attempts {
                return Err(ResourceError::Conflict(id));
            }
            collided = Some(id);
        };

        self.authorize(OperationKind::Create, ctx, &id, &resource)?;
        self.set(id.clone(), resource).await?;
        Ok(Reply::created(id))
    }

    /// Replaces the whole collection with the payload mapping.
    pub async fn replace_all(
        &mut self,
        ctx: &RequestContext,
        representation: &Representation,
        payload: Option<Value>,
    ) -> Result<Reply<T>, ResourceError> {
        let formatter = self.custom_formatter(OperationKind::Update, representation)?;
        let Value::Object(items) = decode(formatter, require(payload)?)? else {
            warn!(collection = %self.name(), "Replace payload is not a mapping");
            return Err(ResourceError::BadRequest(
                "expected a mapping from identifier to payload".into(),
            ));
        };

        let mut next = HashMap::with_capacity(items.len());
        for (id, item) in items {
            let resource = match self.get(&id) {
                Some(current) => {
                    let mut edited = current.clone();
                    edited.edit(&item).map_err(|e| self.rejected_edit(&id, e))?;
                    self.authorize(OperationKind::Update, ctx, &id, current)?;
                    edited
                }
                None => {
                    let created = self.instantiate(Some(&id), &item)?;
                    self.authorize(OperationKind::Create, ctx, &id, &created)?;
                    created
                }
            };
            next.insert(id, resource);
        }

        for id in self.ids() {
            if next.contains_key(&id) {
                continue;
            }
            if let Some(current) = self.get(&id) {
                self.authorize(OperationKind::Delete, ctx, &id, current)?;
            }
        }

        self.set_all(next).await?;
        Ok(Reply::no_content())
    }

    /// Deletes everything, provided the caller may delete every resource.
    pub async fn delete_all(&mut self, ctx: &RequestContext) -> Result<Reply<T>, ResourceError> {
        for id in self.ids() {
            if let Some(current) = self.get(&id) {
                self.authorize(OperationKind::Delete, ctx, &id, current)?;
            }
        }
        self.del_all().await?;
        Ok(Reply::no_content())
    }

    // --- Item scope ---

    pub fn read_one(
        &self,
        ctx: &RequestContext,
        representation: &Representation,
        id: &str,
    ) -> Result<Reply<T>, ResourceError> {
        let current = self.existing(id)?;
        let formatter = self.custom_formatter(OperationKind::Read, representation)?;
        self.authorize(OperationKind::Read, ctx, id, current)?;

        match formatter {
            None => Ok(Reply::ok(Body::Resource(current.clone()))),
            Some((formatter, format)) => formatter
                .encode(format, current)
                .map(|encoded| Reply::ok(Body::Formatted(encoded)))
                .map_err(|e| ResourceError::Internal(e.to_string())),
        }
    }

    /// Updates an existing resource.
    pub async fn patch_one(
        &mut self,
        ctx: &RequestContext,
        representation: &Representation,
        id: String,
        payload: Option<Value>,
    ) -> Result<Reply<T>, ResourceError> {
        let current = self.existing(&id)?;
        let formatter = self.custom_formatter(OperationKind::Update, representation)?;
        self.authorize(OperationKind::Update, ctx, &id, current)?;

        let payload = decode(formatter, require(payload)?)?;
        let mut edited = current.clone();
        edited.edit(&payload).map_err(|e| self.rejected_edit(&id, e))?;

        self.set(id, edited).await?;
        Ok(Reply::no_content())
    }

    /// Updates the resource if it exists, creates it under `id` otherwise.
    pub async fn put_one(
        &mut self,
        ctx: &RequestContext,
        representation: &Representation,
        id: String,
        payload: Option<Value>,
    ) -> Result<Reply<T>, ResourceError> {
        if self.has(&id) {
            return self.patch_one(ctx, representation, id, payload).await;
        }

        let formatter = self.custom_formatter(OperationKind::Create, representation)?;
        let payload = decode(formatter, require(payload)?)?;
        let created = self.instantiate(Some(&id), &payload)?;
        self.authorize(OperationKind::Create, ctx, &id, &created)?;

        self.set(id, created).await?;
        Ok(Reply::no_content())
    }

    pub async fn delete_one(
        &mut self,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<Reply<T>, ResourceError> {
        let current = self.existing(id)?;
        self.authorize(OperationKind::Delete, ctx, id, current)?;

        self.del(id).await?;
        Ok(Reply::no_content())
    }

    // --- Checks ---

    fn existing(&self, id: &str) -> Result<&T, ResourceError> {
        self.get(id).ok_or_else(|| {
            debug!(collection = %self.name(), %id, "Not found");
            ResourceError::NotFound(id.to_string())
        })
    }

    fn authorize(
        &self,
        kind: OperationKind,
        ctx: &RequestContext,
        id: &str,
        resource: &T,
    ) -> Result<(), ResourceError> {
        if self.rights.authorize(kind, ctx, resource) {
            return Ok(());
        }
        warn!(collection = %self.name(), %id, %kind, principal = ?ctx.principal, "Forbidden");
        Err(ResourceError::forbidden(kind, id))
    }

    /// Resolves the formatter for a custom representation; `None` for the default one.
    fn custom_formatter<'a>(
        &'a self,
        kind: OperationKind,
        representation: &'a Representation,
    ) -> Result<Option<(&'a Arc<dyn Formatter<T>>, &'a str)>, ResourceError> {
        let Some(format) = representation.format() else {
            return Ok(None);
        };
        match &self.formatter {
            Some(formatter) if formatter.supports(kind, format) => Ok(Some((formatter, format))),
            _ => {
                warn!(collection = %self.name(), format, %kind, "Unsupported format");
                Err(ResourceError::UnsupportedFormat(format.to_string()))
            }
        }
    }

    fn rejected_edit(&self, id: &str, e: T::Error) -> ResourceError {
        warn!(collection = %self.name(), %id, error = %e, "Edit rejected");
        ResourceError::BadRequest(e.to_string())
    }
}

fn require(payload: Option<Value>) -> Result<Value, ResourceError> {
    payload.ok_or_else(|| ResourceError::BadRequest("missing payload".into()))
}

fn decode<T>(
    formatter: Option<(&Arc<dyn Formatter<T>>, &str)>,
    payload: Value,
) -> Result<Value, ResourceError> {
    match formatter {
        None => Ok(payload),
        Some((formatter, format)) => formatter
            .decode(format, payload)
            .map_err(|e| ResourceError::BadRequest(e.to_string())),
    }
}
