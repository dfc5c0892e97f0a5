//! Option extractor.
//!
//! Walks compiled message descriptors and decodes the raw extension values
//! on each message, oneof group and field into the normalized records of
//! [`crate::binding::types`]. No extension lookups happen past this stage.

use crate::binding::extensions::{Extension, ExtensionSet};
use crate::binding::types::{
    FieldDescriptor, FieldOptions, Location, MessageDescriptor, MessageOptions, OneofOptions,
};
use crate::error::SchemaError;
use crate::schema::{DescriptorProto, FileDescriptorProto, OptionsJson};
use crate::utils::{qualify_name, to_json_name};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// How repeated option contributions are normalized into one sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatedOptionPolicy {
    /// Keep every contribution in declaration order
    #[default]
    Accumulate,
    /// Keep only the final contribution
    LastWins,
}

/// Collect every message of a file, nested messages included, in declaration order
///
/// Synthesized map-entry messages are skipped. Nested messages of an unnamed
/// message cannot be qualified and are skipped as well; the unnamed message
/// itself is still returned so extraction can report it.
pub fn collect_messages(file: &FileDescriptorProto) -> Vec<(String, &DescriptorProto)> {
    let package = file.package.clone().unwrap_or_default();
    let mut out = Vec::new();
    for message in &file.message_type {
        collect_nested(&package, message, &mut out);
    }
    out
}

fn collect_nested<'a>(
    scope: &str,
    message: &'a DescriptorProto,
    out: &mut Vec<(String, &'a DescriptorProto)>,
) {
    if message.is_map_entry() {
        return;
    }
    out.push((scope.to_string(), message));

    if let Some(name) = &message.name {
        let nested_scope = qualify_name(scope, name);
        for nested in &message.nested_type {
            collect_nested(&nested_scope, nested, out);
        }
    }
}

/// Check that every oneof member field has an options entry for its group
pub fn validate_oneof_membership(message: &MessageDescriptor) -> Result<(), SchemaError> {
    for field in &message.fields {
        if let Some(oneof) = &field.oneof {
            if !message.oneofs.contains_key(oneof) {
                return Err(SchemaError::MissingOneofOptions {
                    message: message.full_name.clone(),
                    field: field.name.clone(),
                    oneof: oneof.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Decodes binding options for one extension package
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    extensions: ExtensionSet,
    policy: RepeatedOptionPolicy,
}

impl Extractor {
    pub fn new(extensions: ExtensionSet, policy: RepeatedOptionPolicy) -> Self {
        Self { extensions, policy }
    }

    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    /// Extract one message (nested messages are not descended into)
    ///
    /// `scope` is the package or enclosing message the descriptor is declared in.
    pub fn extract_message(
        &self,
        scope: &str,
        descriptor: &DescriptorProto,
    ) -> Result<MessageDescriptor, SchemaError> {
        let name = descriptor.name.as_deref().ok_or_else(|| {
            SchemaError::UnnamedMessage(if scope.is_empty() {
                "<root>".to_string()
            } else {
                scope.to_string()
            })
        })?;
        let full_name = qualify_name(scope, name);
        let message_scope = format!("message '{}'", full_name);
        let message_options = descriptor.options.as_ref();

        let options = MessageOptions {
            default_location: self.location(
                message_options,
                Extension::DefaultLocation,
                &message_scope,
            )?,
            default_auto_tags: self.string_list(
                message_options,
                Extension::DefaultAutoTags,
                &message_scope,
            )?,
        };

        // proto3 `optional` fields each live in a synthesized oneof
        let synthetic: HashSet<i32> = descriptor
            .field
            .iter()
            .filter(|f| f.proto3_optional == Some(true))
            .filter_map(|f| f.oneof_index)
            .collect();

        let mut group_names = Vec::with_capacity(descriptor.oneof_decl.len());
        let mut oneofs = IndexMap::new();
        for (index, decl) in descriptor.oneof_decl.iter().enumerate() {
            let group = decl
                .name
                .clone()
                .unwrap_or_else(|| format!("oneof_{}", index));
            group_names.push(group.clone());

            if synthetic.contains(&(index as i32)) {
                continue;
            }

            let oneof_scope = format!("oneof '{}.{}'", full_name, group);
            let raw = decl.options.as_ref();
            oneofs.insert(
                group,
                OneofOptions {
                    default_oneof_location: self.location(
                        raw,
                        Extension::DefaultOneofLocation,
                        &oneof_scope,
                    )?,
                    default_oneof_auto_tags: self.string_list(
                        raw,
                        Extension::DefaultOneofAutoTags,
                        &oneof_scope,
                    )?,
                },
            );
        }

        let mut fields = Vec::with_capacity(descriptor.field.len());
        for (index, field) in descriptor.field.iter().enumerate() {
            let field_name = field.name.clone().ok_or_else(|| SchemaError::UnnamedField {
                message: full_name.clone(),
                index,
            })?;

            let oneof = match (field.oneof_index, field.proto3_optional) {
                (_, Some(true)) | (None, _) => None,
                (Some(idx), _) => {
                    let group = usize::try_from(idx)
                        .ok()
                        .and_then(|i| group_names.get(i))
                        .ok_or_else(|| SchemaError::UnknownOneofIndex {
                            message: full_name.clone(),
                            field: field_name.clone(),
                            index: idx,
                            declared: group_names.len(),
                        })?;
                    Some(group.clone())
                }
            };

            let field_scope = format!("field '{}.{}'", full_name, field_name);
            let raw = field.options.as_ref();
            let options = FieldOptions {
                location: self.location(raw, Extension::Location, &field_scope)?,
                tags: self.string(raw, Extension::Tags, &field_scope)?,
                auto_tags: self.string_list(raw, Extension::AutoTags, &field_scope)?,
            };

            fields.push(FieldDescriptor {
                json_name: field
                    .json_name
                    .clone()
                    .unwrap_or_else(|| to_json_name(&field_name)),
                name: field_name,
                number: field.number.unwrap_or_default(),
                oneof,
                options,
            });
        }

        let message = MessageDescriptor {
            full_name,
            options,
            fields,
            oneofs,
        };
        validate_oneof_membership(&message)?;

        tracing::debug!(
            "Extracted {} ({} fields, {} oneof groups)",
            message.full_name,
            message.fields.len(),
            message.oneofs.len()
        );

        Ok(message)
    }

    fn location(
        &self,
        options: Option<&OptionsJson>,
        extension: Extension,
        scope: &str,
    ) -> Result<Location, SchemaError> {
        let Some(value) = options.and_then(|o| self.extensions.lookup(o, extension)) else {
            return Ok(Location::Unspecified);
        };

        let decoded = match value {
            Value::Null => Some(Location::Unspecified),
            Value::String(s) => Location::from_str_name(s)
                .or_else(|| s.parse::<i32>().ok().and_then(Location::from_i32)),
            Value::Number(n) => n
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .and_then(Location::from_i32),
            _ => None,
        };

        decoded.ok_or_else(|| invalid(scope, extension, format!("{} is not a Location", value)))
    }

    fn string(
        &self,
        options: Option<&OptionsJson>,
        extension: Extension,
        scope: &str,
    ) -> Result<Option<String>, SchemaError> {
        match options.and_then(|o| self.extensions.lookup(o, extension)) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(invalid(
                scope,
                extension,
                format!("expected a string, found {}", other),
            )),
        }
    }

    fn string_list(
        &self,
        options: Option<&OptionsJson>,
        extension: Extension,
        scope: &str,
    ) -> Result<Vec<String>, SchemaError> {
        let mut values = match options.and_then(|o| self.extensions.lookup(o, extension)) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(invalid(
                        scope,
                        extension,
                        format!("expected a string element, found {}", other),
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(invalid(
                    scope,
                    extension,
                    format!("expected a list of strings, found {}", other),
                ))
            }
        };

        if self.policy == RepeatedOptionPolicy::LastWins && values.len() > 1 {
            values = values.split_off(values.len() - 1);
        }
        Ok(values)
    }
}

fn invalid(scope: &str, extension: Extension, reason: String) -> SchemaError {
    SchemaError::InvalidOptionValue {
        scope: scope.to_string(),
        option: extension.name().to_string(),
        reason,
    }
}
