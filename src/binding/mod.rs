//! Request-binding resolution engine.
//!
//! Three stages run once per message: the [`extractor`] decodes raw option
//! values into normalized records, the [`resolver`] applies field > oneof >
//! message precedence and merges auto tags, and the [`formatter`] renders the
//! final struct-tag string. [`pipeline::Binder`] chains them.

pub mod extensions;
pub mod extractor;
pub mod formatter;
pub mod pipeline;
pub mod resolver;
pub mod types;

pub use extensions::{Extension, ExtensionScope, ExtensionSet, DEFAULT_EXTENSION_PACKAGE};
pub use extractor::{collect_messages, validate_oneof_membership, Extractor, RepeatedOptionPolicy};
pub use formatter::{TagFormatter, WireNameStyle, SUPPRESSION_MARKER};
pub use pipeline::{Binder, FieldBinding, MessageBindings, MessageFailure, SchemaBindings};
pub use resolver::{resolve_field, resolve_message, FALLBACK_LOCATION};
pub use types::{
    EffectiveBinding, FieldDescriptor, FieldOptions, Location, LocationSource, MessageDescriptor,
    MessageOptions, OneofOptions, ResolvedBinding,
};
