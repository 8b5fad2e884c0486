//! Design-time links between a method's result and another method.

use crate::{Extensions, Server};
use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Points from a result to a follow-up method. Links are carried through
/// untouched; the client never follows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct Link {
    #[builder(into)]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Name of the linked method
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub method: Option<String>,

    /// Arguments for the linked method, keyed by parameter name. Values may be
    /// runtime expressions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<Server>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Link {
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder().name(name).build()
    }

    /// Link to the method called `method`
    pub fn to_method(name: impl Into<String>, method: impl Into<String>) -> Self {
        Self::builder().name(name).method(method).build()
    }
}
