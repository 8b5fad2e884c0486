//! Servers a document's methods are exposed on.

use crate::Extensions;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An endpoint the methods are served from. `url` may contain `{variable}`
/// placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct Server {
    #[builder(into)]
    pub name: String,

    #[builder(into)]
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<HashMap<String, ServerVariable>>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

/// Substitution value for one `{variable}` in a server URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct ServerVariable {
    /// Allowed values, when restricted
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,

    pub default: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Server {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::builder().name(name).url(url).build()
    }

    /// Expand `{variable}` placeholders in the URL with their default values
    pub fn resolved_url(&self) -> String {
        let mut url = self.url.clone();
        if let Some(variables) = &self.variables {
            for (name, variable) in variables {
                url = url.replace(&format!("{{{}}}", name), &variable.default);
            }
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_url_variables() {
        let server: Server = serde_json::from_value(json!({
            "name": "management",
            "url": "ws://{host}:{port}",
            "variables": {
                "host": {"default": "localhost"},
                "port": {"default": "25585", "enum": ["25585", "25586"]}
            }
        }))
        .unwrap();

        assert_eq!(server.resolved_url(), "ws://localhost:25585");
    }

    #[test]
    fn test_server_without_variables() {
        let server = Server::new("local", "ws://127.0.0.1:9000");
        assert_eq!(server.resolved_url(), "ws://127.0.0.1:9000");
    }
}
