//! Binding manifest: the serializable form of [`SchemaBindings`] handed to
//! code generators.

use crate::binding::pipeline::{MessageBindings, SchemaBindings};
use crate::binding::types::{Location, LocationSource};
use crate::config::OutputFormat;
use crate::error::Result;
use serde::Serialize;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BindingManifest {
    pub messages: Vec<MessageEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailureEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageEntry {
    pub name: String,
    pub fields: Vec<FieldEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldEntry {
    pub name: String,
    pub number: i32,
    pub wire_name: String,
    pub location: Location,
    pub location_source: LocationSource,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub auto_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureEntry {
    pub message: String,
    pub error: String,
}

impl From<&MessageBindings> for MessageEntry {
    fn from(bindings: &MessageBindings) -> Self {
        MessageEntry {
            name: bindings.message.clone(),
            fields: bindings
                .fields
                .iter()
                .map(|f| {
                    let (tag, error) = match &f.outcome {
                        Ok(binding) => (Some(binding.tag_string.clone()), None),
                        Err(e) => (None, Some(e.to_string())),
                    };
                    FieldEntry {
                        name: f.field.clone(),
                        number: f.number,
                        wire_name: f.wire_name.clone(),
                        location: f.resolved.location,
                        location_source: f.resolved.location_source,
                        auto_tags: f.resolved.auto_tags.clone(),
                        custom_tags: f.resolved.custom_tags.clone(),
                        tag,
                        error,
                    }
                })
                .collect(),
        }
    }
}

impl BindingManifest {
    pub fn from_bindings(bindings: &SchemaBindings) -> Self {
        BindingManifest {
            messages: bindings.messages.iter().map(MessageEntry::from).collect(),
            failures: bindings
                .failures
                .iter()
                .map(|f| FailureEntry {
                    message: f.message.clone(),
                    error: f.error.to_string(),
                })
                .collect(),
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(self)?,
            OutputFormat::Yaml => serde_yaml::to_string(self)?,
        })
    }

    /// Write the rendered manifest, creating parent directories if needed
    pub fn write_to<P: AsRef<Path>>(&self, path: P, format: OutputFormat) -> Result<()> {
        let path = path.as_ref();
        let rendered = self.render(format)?;
        write_file(path, rendered).map_err(|e| crate::error::Error::io(path, e))
    }
}

fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> io::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, contents)
}
