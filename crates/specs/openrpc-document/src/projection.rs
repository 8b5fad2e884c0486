//! Method projection: names, parameter tuples and result shapes derived from a document.

use crate::{
    Component, ContentDescriptor, ContentDescriptorOrReference, Method, OpenRpcDocument, Shape,
    error::{OpenRpcError, OpenRpcResult},
    reference::resolve_ref,
    schema::resolve_type,
};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Names of all inline methods, in document order.
pub fn method_names(document: &OpenRpcDocument) -> Vec<&str> {
    document.methods().map(|m| m.name.as_str()).collect()
}

/// Inline methods with repeated names removed, keeping the first declaration.
pub fn distinct_methods(document: &OpenRpcDocument) -> Vec<&Method> {
    let mut seen = HashSet::new();
    document
        .methods()
        .filter(|m| seen.insert(m.name.as_str()))
        .collect()
}

/// Names of methods that declare a result.
///
/// A name is classified by its first declaration, so it never appears in both
/// this list and [`notification_method_names`].
pub fn request_method_names(document: &OpenRpcDocument) -> Vec<&str> {
    distinct_methods(document)
        .into_iter()
        .filter(|m| m.result.is_some())
        .map(|m| m.name.as_str())
        .collect()
}

/// Names of methods without a result: these are sent by the server as notifications.
pub fn notification_method_names(document: &OpenRpcDocument) -> Vec<&str> {
    distinct_methods(document)
        .into_iter()
        .filter(|m| m.result.is_none())
        .map(|m| m.name.as_str())
        .collect()
}

/// Names declared by more than one method, sorted.
pub fn duplicate_method_names(document: &OpenRpcDocument) -> Vec<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in method_names(document) {
        *counts.entry(name).or_default() += 1;
    }
    let mut duplicates: Vec<&str> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name)
        .collect();
    duplicates.sort_unstable();
    duplicates
}

/// The first method declared with this name.
pub fn extract_method<'a>(document: &'a OpenRpcDocument, name: &str) -> OpenRpcResult<&'a Method> {
    document
        .methods()
        .find(|m| m.name == name)
        .ok_or_else(|| OpenRpcError::method_not_found(name))
}

/// One positional parameter of a method.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamShape {
    pub name: String,
    pub required: bool,
    /// Wrapped in [`Shape::Optional`] when the parameter is not required
    pub shape: Shape,
}

impl fmt::Display for ParamShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            Shape::Optional(inner) if !self.required => write!(f, "{}?: {}", self.name, inner),
            shape => write!(f, "{}: {}", self.name, shape),
        }
    }
}

fn content_descriptor<'a>(
    document: &'a OpenRpcDocument,
    entry: &'a ContentDescriptorOrReference,
) -> OpenRpcResult<&'a ContentDescriptor> {
    match entry {
        ContentDescriptorOrReference::ContentDescriptor(descriptor) => Ok(descriptor),
        ContentDescriptorOrReference::Reference(reference) => {
            match resolve_ref(document, &reference.reference)? {
                Component::ContentDescriptor(descriptor) => Ok(descriptor),
                other => Err(OpenRpcError::reference(
                    format!("expected a content descriptor, found {}", other.kind()),
                    &reference.reference,
                )),
            }
        }
    }
}

/// Resolved parameter shapes in declaration order.
pub fn extract_params(document: &OpenRpcDocument, method: &Method) -> OpenRpcResult<Vec<ParamShape>> {
    method
        .params
        .iter()
        .map(|entry| {
            let descriptor = content_descriptor(document, entry)?;
            let shape = resolve_type(document, &descriptor.schema)?;
            let required = descriptor.is_required();
            Ok(ParamShape {
                name: descriptor.name.clone(),
                required,
                shape: if required { shape } else { Shape::optional(shape) },
            })
        })
        .collect()
}

/// How many positional arguments a method accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    /// Leading parameters that must be supplied
    pub required: usize,
    pub total: usize,
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        (self.required..=self.total).contains(&count)
    }
}

/// Argument count bounds of a method, read from the content descriptors'
/// `required` flags without resolving any schema.
pub fn extract_arity(document: &OpenRpcDocument, method: &Method) -> OpenRpcResult<Arity> {
    let required = method
        .params
        .iter()
        .map(|entry| content_descriptor(document, entry).map(ContentDescriptor::is_required))
        .collect::<OpenRpcResult<Vec<bool>>>()?;

    Ok(Arity {
        required: required.iter().rposition(|r| *r).map_or(0, |index| index + 1),
        total: required.len(),
    })
}

/// Resolved result shape, or [`Shape::Void`] when the method declares no result.
pub fn extract_result(document: &OpenRpcDocument, method: &Method) -> OpenRpcResult<Shape> {
    match &method.result {
        Some(entry) => {
            let descriptor = content_descriptor(document, entry)?;
            resolve_type(document, &descriptor.schema)
        }
        None => Ok(Shape::Void),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Has a result; called by the client
    Request,
    /// No result; delivered by the server
    Notification,
}

/// Everything the client needs to know about a method, fully resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub name: String,
    pub kind: MethodKind,
    pub params: Vec<ParamShape>,
    pub result: Shape,
}

impl MethodSignature {
    pub fn project(document: &OpenRpcDocument, name: &str) -> OpenRpcResult<Self> {
        Self::from_method(document, extract_method(document, name)?)
    }

    pub fn from_method(document: &OpenRpcDocument, method: &Method) -> OpenRpcResult<Self> {
        Ok(Self {
            name: method.name.clone(),
            kind: if method.result.is_some() {
                MethodKind::Request
            } else {
                MethodKind::Notification
            },
            params: extract_params(document, method)?,
            result: extract_result(document, method)?,
        })
    }

    pub fn is_request(&self) -> bool {
        self.kind == MethodKind::Request
    }

    /// Number of leading parameters that must be supplied
    pub fn required_arity(&self) -> usize {
        self.params
            .iter()
            .rposition(|param| param.required)
            .map_or(0, |index| index + 1)
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        write!(f, "{}({}) -> {}", self.name, params.join(", "), self.result)
    }
}
