//! Reference validation and the validated-document acceptance gate.

use crate::{
    Arity, Method, MethodSignature, OpenRpcDocument,
    error::{OpenRpcError, OpenRpcResult},
    projection,
    reference::is_valid_ref,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::ops::Deref;
use tracing::debug;

/// Collect every `$ref` in the document that does not resolve to a component.
///
/// The whole document is walked, including component bags, nested schemas and
/// extension values. The result is sorted and de-duplicated; it is empty iff the
/// document's references are all valid.
pub fn collect_invalid_refs(document: &OpenRpcDocument) -> OpenRpcResult<Vec<String>> {
    let value = serde_json::to_value(document)?;
    Ok(collect_invalid_refs_in_value(document, &value))
}

/// Whether the document contains at least one unresolvable `$ref`.
pub fn has_invalid_refs(document: &OpenRpcDocument) -> OpenRpcResult<bool> {
    Ok(!collect_invalid_refs(document)?.is_empty())
}

/// Walk an arbitrary JSON value and collect the `$ref`s that do not resolve
/// against `document`'s components.
pub fn collect_invalid_refs_in_value(document: &OpenRpcDocument, value: &Value) -> Vec<String> {
    let mut invalid = BTreeSet::new();
    walk(document, value, &mut invalid);
    invalid.into_iter().collect()
}

fn walk(document: &OpenRpcDocument, value: &Value, invalid: &mut BTreeSet<String>) {
    match value {
        Value::Object(object) => {
            // A reference node is a leaf; non-string `$ref` values are not references.
            if let Some(reference) = object.get("$ref") {
                if let Value::String(reference) = reference {
                    if !is_valid_ref(document, reference) {
                        invalid.insert(reference.clone());
                    }
                }
                return;
            }
            for child in object.values() {
                walk(document, child, invalid);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(document, item, invalid);
            }
        }
        _ => {}
    }
}

/// A document whose references have all been checked.
///
/// This is the only form of document the client accepts. The wrapped document is
/// exactly the one that was passed in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedDocument {
    document: OpenRpcDocument,
}

impl ValidatedDocument {
    pub fn new(document: OpenRpcDocument) -> OpenRpcResult<Self> {
        let invalid = collect_invalid_refs(&document)?;
        if !invalid.is_empty() {
            debug!(count = invalid.len(), "document rejected: invalid references");
            return Err(OpenRpcError::invalid_references(invalid));
        }
        Ok(Self { document })
    }

    pub fn from_json_str(json: &str) -> OpenRpcResult<Self> {
        Self::new(OpenRpcDocument::from_json_str(json)?)
    }

    pub fn from_value(value: Value) -> OpenRpcResult<Self> {
        Self::new(serde_json::from_value(value)?)
    }

    pub fn document(&self) -> &OpenRpcDocument {
        &self.document
    }

    pub fn into_inner(self) -> OpenRpcDocument {
        self.document
    }

    pub fn method_names(&self) -> Vec<&str> {
        projection::method_names(&self.document)
    }

    pub fn request_method_names(&self) -> Vec<&str> {
        projection::request_method_names(&self.document)
    }

    pub fn notification_method_names(&self) -> Vec<&str> {
        projection::notification_method_names(&self.document)
    }

    pub fn duplicate_method_names(&self) -> Vec<&str> {
        projection::duplicate_method_names(&self.document)
    }

    pub fn method(&self, name: &str) -> OpenRpcResult<&Method> {
        projection::extract_method(&self.document, name)
    }

    pub fn signature(&self, name: &str) -> OpenRpcResult<MethodSignature> {
        MethodSignature::project(&self.document, name)
    }

    /// Argument count bounds, without resolving parameter schemas
    pub fn arity(&self, name: &str) -> OpenRpcResult<Arity> {
        projection::extract_arity(&self.document, self.method(name)?)
    }

    /// First declaration of each method name, in declaration order
    pub fn distinct_methods(&self) -> Vec<&Method> {
        projection::distinct_methods(&self.document)
    }

    /// Signatures of every distinct method, in declaration order
    pub fn signatures(&self) -> OpenRpcResult<Vec<MethodSignature>> {
        self.distinct_methods()
            .into_iter()
            .map(|method| MethodSignature::from_method(&self.document, method))
            .collect()
    }
}

impl Deref for ValidatedDocument {
    type Target = OpenRpcDocument;

    fn deref(&self) -> &Self::Target {
        &self.document
    }
}

impl TryFrom<OpenRpcDocument> for ValidatedDocument {
    type Error = OpenRpcError;

    fn try_from(document: OpenRpcDocument) -> Result<Self, Self::Error> {
        Self::new(document)
    }
}

impl std::str::FromStr for ValidatedDocument {
    type Err = OpenRpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json_str(s)
    }
}
