//! Specification extensions (`x-*` fields) attached to document objects.
//!
//! Extensions are flattened into their owning object. Deserialization keeps
//! any field the model does not name, so `$ref`s hidden inside extension
//! values are still seen by the reference validator.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A map of extension fields that can be added to any OpenRPC object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Extensions(HashMap<String, Value>);

impl Extensions {
    /// Create a new empty extensions map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an extension field
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Get an extension field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterate over all extension key-value pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Check if extensions map is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builder pattern for adding extensions
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }
}

impl From<HashMap<String, Value>> for Extensions {
    fn from(map: HashMap<String, Value>) -> Self {
        Self(map)
    }
}
