//! Project configuration schema for protobind.yaml
//!
//! Every section is optional; an empty file yields the defaults.

use crate::binding::extensions::{ExtensionSet, DEFAULT_EXTENSION_PACKAGE};
use crate::binding::extractor::{Extractor, RepeatedOptionPolicy};
use crate::binding::formatter::{
    is_valid_tag_key, TagFormatter, WireNameStyle, DEFAULT_QUERY_KEY, DEFAULT_SUPPRESSED_FAMILIES,
    DEFAULT_URI_KEY,
};
use crate::binding::pipeline::Binder;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Top-level configuration from protobind.yaml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BindingConfig {
    #[serde(default)]
    pub extensions: ExtensionsConfig,
    #[serde(default)]
    pub tags: TagsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the binding options are declared and how repeats are normalized
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionsConfig {
    #[serde(default = "default_package")]
    pub package: String,
    #[serde(default)]
    pub repeated: RepeatedOptionPolicy,
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Self {
            package: default_package(),
            repeated: RepeatedOptionPolicy::default(),
        }
    }
}

/// Tag rendering options
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TagsConfig {
    #[serde(default = "default_query_key")]
    pub query_key: String,
    #[serde(default = "default_uri_key")]
    pub uri_key: String,
    #[serde(default = "default_suppressed_families")]
    pub body_suppressed_families: Vec<String>,
    #[serde(default)]
    pub wire_name: WireNameStyle,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            query_key: default_query_key(),
            uri_key: default_uri_key(),
            body_suppressed_families: default_suppressed_families(),
            wire_name: WireNameStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Manifest serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

fn default_package() -> String {
    DEFAULT_EXTENSION_PACKAGE.to_string()
}

fn default_query_key() -> String {
    DEFAULT_QUERY_KEY.to_string()
}

fn default_uri_key() -> String {
    DEFAULT_URI_KEY.to_string()
}

fn default_suppressed_families() -> Vec<String> {
    DEFAULT_SUPPRESSED_FAMILIES.iter().map(|s| s.to_string()).collect()
}

impl BindingConfig {
    /// Load configuration from protobind.yaml
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_yaml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration text; an empty document yields the defaults
    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Load `path` if given, otherwise `protobind.yaml` in the working
    /// directory if present, otherwise the defaults
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let local = Path::new("protobind.yaml");
                if local.exists() {
                    Self::from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.extensions.package.trim().is_empty() {
            return Err(Error::Config("extensions.package cannot be empty".to_string()));
        }

        for (name, key) in [
            ("tags.query_key", &self.tags.query_key),
            ("tags.uri_key", &self.tags.uri_key),
        ] {
            if !is_valid_tag_key(key) {
                return Err(Error::Config(format!("{} '{}' is not a valid tag key", name, key)));
            }
        }

        for family in &self.tags.body_suppressed_families {
            if !is_valid_tag_key(family) {
                return Err(Error::Config(format!(
                    "tags.body_suppressed_families entry '{}' is not a valid tag key",
                    family
                )));
            }
        }

        Ok(())
    }

    pub fn extension_set(&self) -> ExtensionSet {
        ExtensionSet::new(self.extensions.package.trim())
    }

    pub fn extractor(&self) -> Extractor {
        Extractor::new(self.extension_set(), self.extensions.repeated)
    }

    pub fn formatter(&self) -> TagFormatter {
        TagFormatter::new(
            self.tags.query_key.clone(),
            self.tags.uri_key.clone(),
            self.tags.body_suppressed_families.clone(),
            self.tags.wire_name,
        )
    }

    pub fn binder(&self) -> Binder {
        Binder::new(self.extractor(), self.formatter())
    }
}
