//! Extension identifiers for the request-binding options.
//!
//! Field numbers are stable. Descriptor JSON renders a registered extension
//! under its bracketed full name (`"[protobind.location]"`); dumps made
//! without the extension registered carry the bare field number instead.
//! Lookups try the bracketed name first, then the number.

use crate::schema::OptionsJson;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Default package the extensions are declared in
pub const DEFAULT_EXTENSION_PACKAGE: &str = "protobind";

/// Descriptor type an extension is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionScope {
    Field,
    Message,
    Oneof,
}

impl fmt::Display for ExtensionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionScope::Field => write!(f, "google.protobuf.FieldOptions"),
            ExtensionScope::Message => write!(f, "google.protobuf.MessageOptions"),
            ExtensionScope::Oneof => write!(f, "google.protobuf.OneofOptions"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    Location,
    Tags,
    AutoTags,
    DefaultLocation,
    DefaultAutoTags,
    DefaultOneofLocation,
    DefaultOneofAutoTags,
}

impl Extension {
    pub const ALL: [Extension; 7] = [
        Extension::Location,
        Extension::Tags,
        Extension::AutoTags,
        Extension::DefaultLocation,
        Extension::DefaultAutoTags,
        Extension::DefaultOneofLocation,
        Extension::DefaultOneofAutoTags,
    ];

    pub const fn number(self) -> u32 {
        match self {
            Extension::Location => 18534200,
            Extension::Tags => 18534210,
            Extension::AutoTags => 18534220,
            Extension::DefaultLocation => 18534230,
            Extension::DefaultAutoTags => 18534240,
            Extension::DefaultOneofLocation => 18534250,
            Extension::DefaultOneofAutoTags => 18534260,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Extension::Location => "location",
            Extension::Tags => "tags",
            Extension::AutoTags => "auto_tags",
            Extension::DefaultLocation => "default_location",
            Extension::DefaultAutoTags => "default_auto_tags",
            Extension::DefaultOneofLocation => "default_oneof_location",
            Extension::DefaultOneofAutoTags => "default_oneof_auto_tags",
        }
    }

    pub const fn scope(self) -> ExtensionScope {
        match self {
            Extension::Location | Extension::Tags | Extension::AutoTags => ExtensionScope::Field,
            Extension::DefaultLocation | Extension::DefaultAutoTags => ExtensionScope::Message,
            Extension::DefaultOneofLocation | Extension::DefaultOneofAutoTags => {
                ExtensionScope::Oneof
            }
        }
    }

    pub const fn is_repeated(self) -> bool {
        matches!(
            self,
            Extension::AutoTags | Extension::DefaultAutoTags | Extension::DefaultOneofAutoTags
        )
    }
}

/// Resolves extension values out of raw option maps for one extension package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    package: String,
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION_PACKAGE)
    }
}

impl ExtensionSet {
    pub fn new(package: impl Into<String>) -> Self {
        let package = package.into();
        Self {
            package: package.trim_start_matches('.').to_string(),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Bracketed option key, e.g. `[protobind.auto_tags]`
    pub fn option_key(&self, extension: Extension) -> String {
        if self.package.is_empty() {
            format!("[{}]", extension.name())
        } else {
            format!("[{}.{}]", self.package, extension.name())
        }
    }

    /// Find the raw value for `extension`, by bracketed name then by number
    pub fn lookup<'a>(&self, options: &'a OptionsJson, extension: Extension) -> Option<&'a Value> {
        options
            .get(&self.option_key(extension))
            .or_else(|| options.get(&extension.number().to_string()))
    }
}
