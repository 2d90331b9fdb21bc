//! Endpoint resolution: logical resource names to versioned base paths.

use std::collections::HashMap;

use serde::Deserialize;

/// Resource key of the composite root the collections endpoint lives under.
pub const COMPOSITE_KEY: &str = "composite";

const STANDARD_RESOURCES: &[&str] = &[COMPOSITE_KEY, "sobjects", "query", "limits"];

/// Maps a resource key to its base path.
pub trait EndpointResolver: Send + Sync {
    fn resolve(&self, key: &str) -> Option<String>;
}

/// Resource key → path table, as listed by `GET /services/data/<version>`.
///
/// ```text
/// { "composite": "/services/data/v43.0/composite", "sobjects": "/services/data/v43.0/sobjects", ... }
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ResourceMap {
    resources: HashMap<String, String>,
}

impl ResourceMap {
    /// Standard paths for an API version such as `v43.0`.
    pub fn for_version(api_version: &str) -> Self {
        let resources = STANDARD_RESOURCES
            .iter()
            .map(|key| {
                (
                    key.to_string(),
                    format!("/services/data/{}/{}", api_version, key),
                )
            })
            .collect();
        ResourceMap { resources }
    }

    /// Parse a resource listing body.
    pub fn from_json(listing: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(listing)
    }

    /// Add or replace the base path for `key`.
    pub fn insert(&mut self, key: impl Into<String>, path: impl Into<String>) {
        self.resources.insert(key.into(), path.into());
    }

    /// Number of known resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl EndpointResolver for ResourceMap {
    fn resolve(&self, key: &str) -> Option<String> {
        self.resources.get(key).cloned()
    }
}
