//! Extractor → Resolver → Formatter, per message and across descriptor sets.
//!
//! A [`Binder`] holds only immutable configuration, so one instance can bind
//! many messages concurrently.

use crate::binding::extractor::{collect_messages, validate_oneof_membership, Extractor};
use crate::binding::formatter::TagFormatter;
use crate::binding::resolver::resolve_field;
use crate::binding::types::{EffectiveBinding, MessageDescriptor, ResolvedBinding};
use crate::error::{FormatError, SchemaError};
use crate::schema::FileDescriptorSet;

/// Binding result for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    pub field: String,
    pub number: i32,
    pub wire_name: String,
    pub resolved: ResolvedBinding,
    pub outcome: Result<EffectiveBinding, FormatError>,
}

impl FieldBinding {
    /// Rendered tag string, if formatting succeeded
    pub fn tag_string(&self) -> Option<&str> {
        self.outcome.as_ref().ok().map(|b| b.tag_string.as_str())
    }
}

/// Binding results for every field of one message, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBindings {
    pub message: String,
    pub fields: Vec<FieldBinding>,
}

impl MessageBindings {
    pub fn field(&self, name: &str) -> Option<&FieldBinding> {
        self.fields.iter().find(|f| f.field == name)
    }

    pub fn format_errors(&self) -> impl Iterator<Item = &FormatError> {
        self.fields.iter().filter_map(|f| f.outcome.as_ref().err())
    }
}

/// A message that could not be bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFailure {
    pub message: String,
    pub error: SchemaError,
}

/// Results for a whole descriptor set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaBindings {
    pub messages: Vec<MessageBindings>,
    pub failures: Vec<MessageFailure>,
}

impl SchemaBindings {
    pub fn message(&self, full_name: &str) -> Option<&MessageBindings> {
        self.messages.iter().find(|m| m.message == full_name)
    }

    pub fn format_error_count(&self) -> usize {
        self.messages.iter().map(|m| m.format_errors().count()).sum()
    }

    pub fn has_errors(&self) -> bool {
        !self.failures.is_empty() || self.format_error_count() > 0
    }

    /// Keep only the named message (fully-qualified), successes and failures alike
    pub fn retain_message(&mut self, full_name: &str) {
        self.messages.retain(|m| m.message == full_name);
        self.failures.retain(|f| f.message == full_name);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Binder {
    extractor: Extractor,
    formatter: TagFormatter,
}

impl Binder {
    pub fn new(extractor: Extractor, formatter: TagFormatter) -> Self {
        Self {
            extractor,
            formatter,
        }
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    pub fn formatter(&self) -> &TagFormatter {
        &self.formatter
    }

    /// Resolve and format every field of an extracted message
    ///
    /// Fails only when a field belongs to a oneof group with no options entry.
    /// Format failures stay in the affected field's outcome.
    pub fn bind_message(
        &self,
        message: &MessageDescriptor,
    ) -> Result<MessageBindings, SchemaError> {
        validate_oneof_membership(message)?;

        let style = self.formatter.wire_name_style();
        let fields = message
            .fields
            .iter()
            .map(|field| {
                let resolved = resolve_field(message, field);
                let outcome = self.formatter.format(field, &resolved);
                match &outcome {
                    Ok(binding) => tracing::debug!(
                        "{}.{}: {:?} ({:?}) `{}`",
                        message.full_name,
                        field.name,
                        binding.location,
                        resolved.location_source,
                        binding.tag_string
                    ),
                    Err(e) => tracing::warn!("{}: {}", message.full_name, e),
                }
                FieldBinding {
                    field: field.name.clone(),
                    number: field.number,
                    wire_name: style.wire_name(field).to_string(),
                    resolved,
                    outcome,
                }
            })
            .collect();

        Ok(MessageBindings {
            message: message.full_name.clone(),
            fields,
        })
    }

    /// Extract and bind every message of every file in `set`
    ///
    /// A schema error is recorded against its message and does not stop the
    /// remaining messages from binding.
    pub fn bind_descriptor_set(&self, set: &FileDescriptorSet) -> SchemaBindings {
        let mut out = SchemaBindings::default();

        for file in &set.file {
            for (scope, descriptor) in collect_messages(file) {
                let name = descriptor
                    .name
                    .as_deref()
                    .map(|n| crate::utils::qualify_name(&scope, n))
                    .unwrap_or_else(|| scope.clone());

                let bound = self
                    .extractor
                    .extract_message(&scope, descriptor)
                    .and_then(|message| self.bind_message(&message));

                match bound {
                    Ok(bindings) => out.messages.push(bindings),
                    Err(error) => {
                        tracing::warn!("Skipping message {}: {}", name, error);
                        out.failures.push(MessageFailure {
                            message: name,
                            error,
                        });
                    }
                }
            }
        }

        tracing::info!(
            "Bound {} message(s), {} failed, {} field format error(s)",
            out.messages.len(),
            out.failures.len(),
            out.format_error_count()
        );
        out
    }
}
