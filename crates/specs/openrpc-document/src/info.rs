//! Document metadata.

use crate::Extensions;
use bon::Builder;
use serde::{Deserialize, Serialize};

/// Title and version of the API the document describes.
///
/// `version` is the API's own version, not the OpenRPC version in
/// [`crate::OpenRpcDocument::openrpc`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct Info {
    #[builder(into)]
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "termsOfService", skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    #[builder(into)]
    pub version: String,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct License {
    #[builder(into)]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Info {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self::builder().title(title).version(version).build()
    }

    /// `"<title> <version>"`, as shown in console output
    pub fn label(&self) -> String {
        format!("{} {}", self.title, self.version)
    }
}

impl License {
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder().name(name).build()
    }
}
