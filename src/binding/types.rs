//! Normalized binding records.
//!
//! These types carry no protobuf-specific representation: the extractor
//! decodes raw descriptor options into them, and the resolver and formatter
//! only ever see these shapes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of the HTTP request supplies a field's value.
///
/// Wire values are fixed: UNSPECIFIED=0, QUERY=1, URI=2, BODY=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Location {
    #[default]
    Unspecified,
    Query,
    Uri,
    Body,
}

impl Location {
    /// Protobuf enum number for this location
    pub const fn as_i32(self) -> i32 {
        match self {
            Location::Unspecified => 0,
            Location::Query => 1,
            Location::Uri => 2,
            Location::Body => 3,
        }
    }

    /// Decode a protobuf enum number
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Location::Unspecified),
            1 => Some(Location::Query),
            2 => Some(Location::Uri),
            3 => Some(Location::Body),
            _ => None,
        }
    }

    /// Enum value name as declared in the schema
    pub const fn as_str_name(self) -> &'static str {
        match self {
            Location::Unspecified => "UNSPECIFIED",
            Location::Query => "QUERY",
            Location::Uri => "URI",
            Location::Body => "BODY",
        }
    }

    /// Decode an enum value name, with or without a `LOCATION_` prefix
    pub fn from_str_name(name: &str) -> Option<Self> {
        let bare = name.strip_prefix("LOCATION_").unwrap_or(name);
        match bare {
            "UNSPECIFIED" => Some(Location::Unspecified),
            "QUERY" => Some(Location::Query),
            "URI" => Some(Location::Uri),
            "BODY" => Some(Location::Body),
            _ => None,
        }
    }

    pub const fn is_specified(self) -> bool {
        !matches!(self, Location::Unspecified)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str_name())
    }
}

/// Options declared directly on a field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOptions {
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub auto_tags: Vec<String>,
}

/// Defaults declared on a message, inherited by each of its fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageOptions {
    #[serde(default)]
    pub default_location: Location,
    #[serde(default)]
    pub default_auto_tags: Vec<String>,
}

/// Defaults declared on a oneof group, inherited by its member fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneofOptions {
    #[serde(default)]
    pub default_oneof_location: Location,
    #[serde(default)]
    pub default_oneof_auto_tags: Vec<String>,
}

/// A field of a message together with its decoded options
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Declared protobuf name
    pub name: String,
    /// Name used when the wire-name style is `json`
    pub json_name: String,
    /// Declared field number
    pub number: i32,
    /// Oneof group this field belongs to, if any
    pub oneof: Option<String>,
    pub options: FieldOptions,
}

impl FieldDescriptor {
    /// Create a field with no options and no oneof membership
    pub fn new(name: impl Into<String>, number: i32) -> Self {
        let name = name.into();
        let json_name = crate::utils::to_json_name(&name);
        Self {
            name,
            json_name,
            number,
            oneof: None,
            options: FieldOptions::default(),
        }
    }

    pub fn with_oneof(mut self, oneof: impl Into<String>) -> Self {
        self.oneof = Some(oneof.into());
        self
    }

    pub fn with_options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }
}

/// A message with its defaults, fields (in declaration order) and oneof groups
///
/// Holds no reference back to the descriptor it was extracted from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageDescriptor {
    /// Fully-qualified name (`package.Outer.Inner`)
    pub full_name: String,
    pub options: MessageOptions,
    pub fields: Vec<FieldDescriptor>,
    /// Oneof group name to its options, in declaration order
    pub oneofs: IndexMap<String, OneofOptions>,
}

impl MessageDescriptor {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    pub fn with_options(mut self, options: MessageOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_oneof(mut self, name: impl Into<String>, options: OneofOptions) -> Self {
        self.oneofs.insert(name.into(), options);
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field by its declared name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Scope that supplied a field's resolved location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Field,
    Oneof,
    Message,
    Fallback,
}

/// Resolver output for one field: location, merged auto tags, custom tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBinding {
    /// Never `Location::Unspecified`
    pub location: Location,
    pub location_source: LocationSource,
    pub auto_tags: Vec<String>,
    pub custom_tags: Option<String>,
}

/// Final binding for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveBinding {
    pub location: Location,
    pub tag_string: String,
}
