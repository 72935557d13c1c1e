use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque key-value bag attached to a resource, a relationship link or a
/// collection response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meta(Map<String, Value>);

impl Meta {
    pub fn new(data: Map<String, Value>) -> Self {
        Self(data)
    }

    /// Get a value from the meta object. An empty key never matches.
    pub fn get(&self, key: &str) -> Option<&Value> {
        if key.is_empty() {
            return None;
        }
        self.0.get(key)
    }

    /// Whether the key is present with a non-null value.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.is_null())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Meta {
    fn from(data: Map<String, Value>) -> Self {
        Self(data)
    }
}
