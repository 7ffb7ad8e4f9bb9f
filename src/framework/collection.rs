//! # Resource Collection
//!
//! [`ResourceCollection`] is the identifier → resource mapping of one resource type,
//! together with the policy that governs it: its [`Rights`], its
//! [`PersistenceNotifier`] and an optional [`Formatter`].
//!
//! ## Commit primitives
//!
//! All mutation goes through [`set`](ResourceCollection::set),
//! [`set_all`](ResourceCollection::set_all), [`del`](ResourceCollection::del) and
//! [`del_all`](ResourceCollection::del_all). Each one applies the change, awaits the
//! notifier with the affected ids, and on notifier failure restores every entry it
//! touched before answering `Internal`. After a failed commit the mapping is exactly
//! what it was before the call.
//!
//! The accessors ([`get`](ResourceCollection::get) aside) return owned copies, so
//! nothing a caller does with them can reach the stored state.

use crate::config::CollectionConfig;
use crate::framework::error::ResourceError;
use crate::framework::format::Formatter;
use crate::framework::notifier::PersistenceNotifier;
use crate::framework::resource::Resource;
use crate::framework::rights::Rights;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ResourceCollection<T: Resource> {
    name: String,
    store: HashMap<String, T>,
    pub(crate) rights: Rights<T>,
    notifier: Arc<dyn PersistenceNotifier>,
    pub(crate) formatter: Option<Arc<dyn Formatter<T>>>,
    pub(crate) config: CollectionConfig,
}

impl<T: Resource> ResourceCollection<T> {
    pub fn new(
        name: impl Into<String>,
        rights: Rights<T>,
        notifier: Arc<dyn PersistenceNotifier>,
    ) -> Self {
        Self {
            name: name.into(),
            store: HashMap::new(),
            rights,
            notifier,
            formatter: None,
            config: CollectionConfig::default(),
        }
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter<T>>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn with_config(mut self, config: CollectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    // --- Accessors ---

    pub fn get(&self, id: &str) -> Option<&T> {
        self.store.get(id)
    }

    pub fn has(&self, id: &str) -> bool {
        self.store.contains_key(id)
    }

    /// Identifiers in ascending order.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.store.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn map(&self) -> HashMap<String, T> {
        self.store.clone()
    }

    /// Resources ordered by identifier.
    pub fn list(&self) -> Vec<T> {
        self.ids()
            .iter()
            .filter_map(|id| self.store.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // --- Construction ---

    /// Builds a resource through the adapter. Rejections become `BadRequest`.
    pub fn instantiate(&self, id: Option<&str>, payload: &Value) -> Result<T, ResourceError> {
        T::instantiate(id, payload).map_err(|e| {
            warn!(collection = %self.name, ?id, error = %e, "Instantiate failed");
            ResourceError::BadRequest(e.to_string())
        })
    }

    /// Inserts one resource at startup. No rights check, no notifier.
    pub fn load_one(&mut self, id: impl Into<String>, payload: &Value) -> Result<(), ResourceError> {
        let id = id.into();
        let resource = self.instantiate(Some(&id), payload)?;
        self.store.insert(id, resource);
        Ok(())
    }

    /// Inserts a batch at startup. Every entry is validated before any is inserted.
    pub fn load_map(&mut self, entries: Map<String, Value>) -> Result<(), ResourceError> {
        let mut loaded = Vec::with_capacity(entries.len());
        for (id, payload) in entries {
            let resource = self.instantiate(Some(&id), &payload)?;
            loaded.push((id, resource));
        }
        self.store.extend(loaded);
        info!(collection = %self.name, size = self.store.len(), "Loaded");
        Ok(())
    }

    // --- Commit primitives ---

    /// Inserts or replaces one entry, then notifies with `[id]`.
    pub async fn set(&mut self, id: String, resource: T) -> Result<(), ResourceError> {
        let previous = self.store.insert(id.clone(), resource);
        if let Err(e) = self.notify(std::slice::from_ref(&id)).await {
            match previous {
                Some(previous) => self.store.insert(id, previous),
                None => self.store.remove(&id),
            };
            return Err(e);
        }
        info!(collection = %self.name, %id, size = self.store.len(), "Set");
        Ok(())
    }

    /// Replaces the entire mapping with `next`.
    ///
    /// The notifier receives every id that was created, overwritten or dropped.
    /// Callers must have finished all validation and rights review beforehand.
    pub async fn set_all(&mut self, next: HashMap<String, T>) -> Result<(), ResourceError> {
        let affected: BTreeSet<String> = self.store.keys().chain(next.keys()).cloned().collect();
        let affected: Vec<String> = affected.into_iter().collect();
        let previous = std::mem::replace(&mut self.store, next);
        if let Err(e) = self.notify(&affected).await {
            self.store = previous;
            return Err(e);
        }
        info!(collection = %self.name, affected = affected.len(), size = self.store.len(), "Replaced");
        Ok(())
    }

    pub async fn del(&mut self, id: &str) -> Result<(), ResourceError> {
        let removed = self
            .store
            .remove(id)
            .ok_or_else(|| ResourceError::NotFound(id.to_string()))?;
        if let Err(e) = self.notify(&[id.to_string()]).await {
            self.store.insert(id.to_string(), removed);
            return Err(e);
        }
        info!(collection = %self.name, %id, size = self.store.len(), "Deleted");
        Ok(())
    }

    pub async fn del_all(&mut self) -> Result<(), ResourceError> {
        let affected = self.ids();
        let previous = std::mem::take(&mut self.store);
        if let Err(e) = self.notify(&affected).await {
            self.store = previous;
            return Err(e);
        }
        info!(collection = %self.name, affected = affected.len(), "Deleted all");
        Ok(())
    }

    async fn notify(&self, ids: &[String]) -> Result<(), ResourceError> {
        debug!(collection = %self.name, ?ids, "Notify");
        self.notifier.notify(&self.name, ids).await.map_err(|e| {
            warn!(collection = %self.name, error = %e, "Persistence failed, rolled back");
            ResourceError::Internal(e.to_string())
        })
    }
}
