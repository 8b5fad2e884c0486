//! OpenRPC Document
//!
//! Rust types for OpenRPC 1.3 documents, plus the analysis a typed client needs:
//!
//! - same-document `$ref` resolution against `components`
//! - whole-document reference validation and the [`ValidatedDocument`] gate
//! - schema shape resolution ([`SchemaForm`], [`Shape`], [`resolve_type`])
//! - method projection (names, parameter tuples, result shapes, [`MethodSignature`])
//!
//! # Example
//!
//! ```rust
//! use openrpc_document::{Shape, ValidatedDocument};
//!
//! let document = ValidatedDocument::from_json_str(r##"{
//!     "openrpc": "1.3.2",
//!     "info": {"title": "Example API", "version": "1.0.0"},
//!     "methods": [{
//!         "name": "hello",
//!         "params": [{"name": "who", "required": true, "schema": {"$ref": "#/components/schemas/name"}}],
//!         "result": {"name": "greeting", "schema": {"type": "string"}}
//!     }],
//!     "components": {"schemas": {"name": {"type": "string"}}}
//! }"##).unwrap();
//!
//! let signature = document.signature("hello").unwrap();
//! assert_eq!(signature.params[0].shape, Shape::String);
//! assert_eq!(signature.to_string(), "hello(who: string) -> string");
//! ```

pub mod error;

mod components;
mod content_descriptor;
mod error_object;
mod example;
mod extensions;
mod external_docs;
mod info;
mod link;
mod method;
mod openrpc;
mod projection;
mod reference;
mod schema;
mod server;
mod shape;
mod tag;
mod validation;

pub use components::*;
pub use content_descriptor::*;
pub use error_object::*;
pub use example::*;
pub use extensions::*;
pub use external_docs::*;
pub use info::*;
pub use link::*;
pub use method::*;
pub use openrpc::*;
pub use projection::*;
pub use reference::*;
pub use schema::*;
pub use server::*;
pub use shape::*;
pub use tag::*;
pub use validation::*;

pub use error::*;

/// OpenRPC specification version constants
pub mod version {
    /// Version written by [`crate::OpenRpcDocument::new`]
    pub const CURRENT: &str = "1.3.2";

    pub const SUPPORTED: &[&str] = &["1.0.0", "1.1.0", "1.2.0", "1.3.0", "1.3.1", "1.3.2"];

    pub fn is_supported(version: &str) -> bool {
        SUPPORTED.contains(&version)
    }
}
