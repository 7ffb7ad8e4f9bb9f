//! Configuration for collections and the system that hosts them.
//!
//! Everything here deserializes with `serde` and falls back to defaults field by
//! field, so a config file only needs to mention what it changes:
//!
//! ```json
//! { "collections": { "products": { "create_id_attempts": 4 } } }
//! ```

use crate::framework::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-collection tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Capacity of the collection actor's request channel.
    pub buffer_size: usize,
    /// How many ids collection-level create asks for before answering `Conflict`.
    pub create_id_attempts: u32,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 32,
            create_id_attempts: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub collections: HashMap<String, CollectionConfig>,
}

impl SystemConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Config for the named collection, or the default when it has none.
    pub fn collection(&self, name: &str) -> CollectionConfig {
        self.collections.get(name).cloned().unwrap_or_default()
    }
}
