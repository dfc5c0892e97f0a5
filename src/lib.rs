//! # Protobind: HTTP request-binding options for protobuf code generators
//!
//! Protobind reads a compiled protobuf descriptor set whose fields, messages
//! and oneof groups are annotated with request-binding extensions, and
//! computes one deterministic binding per field: which part of the HTTP
//! request supplies it, and the struct-tag string a generator attaches to it.
//!
//! ## Features
//!
//! - **Three-scope precedence**: field, then oneof group, then message, then BODY
//! - **Auto tags**: repeatable tag keys merged across scopes, order-preserving
//! - **Custom tags**: author-supplied tag text appended verbatim
//! - **Descriptor input**: `FileDescriptorSet` rendered as JSON or YAML
//!
//! ## Example schema
//!
//! ```proto
//! message GetUserRequest {
//!   option (protobind.default_auto_tags) = "json";
//!
//!   string user_id = 1 [(protobind.location) = URI];
//!   string fields = 2 [(protobind.location) = QUERY,
//!                      (protobind.tags) = "validate:\"required\""];
//! }
//! ```
//!
//! Binding `user_id` yields `uri:"user_id" json:"user_id"`; `fields` yields
//! `form:"fields" json:"fields" validate:"required"`.

pub mod binding;
pub mod config;
pub mod error;
pub mod report;
pub mod schema;
pub mod utils;

// Re-export key types
pub use binding::{
    Binder, EffectiveBinding, Extension, ExtensionSet, FieldBinding, FieldDescriptor,
    FieldOptions, Location, LocationSource, MessageBindings, MessageDescriptor, MessageOptions,
    OneofOptions, ResolvedBinding, SchemaBindings, TagFormatter,
};
pub use config::{BindingConfig, OutputFormat};
pub use error::{Error, FormatError, SchemaError};
pub use report::BindingManifest;
pub use schema::FileDescriptorSet;

/// Bind every message in the descriptor set at `path` using `config`
///
/// `path` may be a single descriptor file or a directory of them.
pub fn bind_path(
    path: impl AsRef<std::path::Path>,
    config: &BindingConfig,
) -> error::Result<SchemaBindings> {
    let set = schema::load(path)?;
    Ok(config.binder().bind_descriptor_set(&set))
}
