//! Tag formatter.
//!
//! Renders a resolved binding into the struct-tag string embedded verbatim by
//! code generators. Order is fixed: the location slot, one `key:"wire_name"`
//! pair per resolved auto tag, then the custom tags string.
//!
//! QUERY and URI fill the location slot with the configured form/uri key.
//! BODY fields are decoded from the whole request body, so the slot instead
//! carries `family:"-"` for each suppressed tag family the field does not
//! already tag through an auto tag or a custom tag.

use crate::binding::types::{EffectiveBinding, FieldDescriptor, Location, ResolvedBinding};
use crate::error::FormatError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Struct-tag value that tells a framework to skip the field
pub const SUPPRESSION_MARKER: &str = "-";

pub const DEFAULT_QUERY_KEY: &str = "form";
pub const DEFAULT_URI_KEY: &str = "uri";
pub const DEFAULT_SUPPRESSED_FAMILIES: &[&str] = &["json"];

/// Quotes, backslashes, backticks and control characters break a quoted tag value
static WIRE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[^"`\\\x00-\x1F\x7F]+$"#).unwrap());

static TAG_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[^\s:"`\x00-\x1F\x7F]+$"#).unwrap());

/// Keys of `key:"value"` pairs inside an author-supplied tag string
static CUSTOM_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:^|\s)([^\s:"`]+):""#).unwrap());

/// Which declared name is used as the tag value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireNameStyle {
    /// Declared protobuf name (`user_id`)
    #[default]
    Proto,
    /// JSON name (`userId`)
    Json,
}

impl WireNameStyle {
    pub fn wire_name<'a>(&self, field: &'a FieldDescriptor) -> &'a str {
        match self {
            WireNameStyle::Proto => &field.name,
            WireNameStyle::Json => &field.json_name,
        }
    }
}

/// Whether `key` can appear as a struct tag key
pub fn is_valid_tag_key(key: &str) -> bool {
    TAG_KEY_RE.is_match(key)
}

/// Whether `value` can be placed between tag quotes unescaped
pub fn is_valid_wire_name(value: &str) -> bool {
    WIRE_NAME_RE.is_match(value)
}

fn tag_pair(key: &str, value: &str) -> String {
    format!("{}:\"{}\"", key, value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFormatter {
    query_key: String,
    uri_key: String,
    suppressed_families: Vec<String>,
    wire_name_style: WireNameStyle,
}

impl Default for TagFormatter {
    fn default() -> Self {
        Self {
            query_key: DEFAULT_QUERY_KEY.to_string(),
            uri_key: DEFAULT_URI_KEY.to_string(),
            suppressed_families: DEFAULT_SUPPRESSED_FAMILIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            wire_name_style: WireNameStyle::default(),
        }
    }
}

impl TagFormatter {
    pub fn new(
        query_key: impl Into<String>,
        uri_key: impl Into<String>,
        suppressed_families: Vec<String>,
        wire_name_style: WireNameStyle,
    ) -> Self {
        Self {
            query_key: query_key.into(),
            uri_key: uri_key.into(),
            suppressed_families,
            wire_name_style,
        }
    }

    pub fn wire_name_style(&self) -> WireNameStyle {
        self.wire_name_style
    }

    /// Render the tag string for `field`
    pub fn format(
        &self,
        field: &FieldDescriptor,
        resolved: &ResolvedBinding,
    ) -> Result<EffectiveBinding, FormatError> {
        let wire_name = self.wire_name_style.wire_name(field);
        if !is_valid_wire_name(wire_name) {
            return Err(FormatError::InvalidWireName {
                field: field.name.clone(),
                wire_name: wire_name.to_string(),
            });
        }
        if let Some(key) = resolved.auto_tags.iter().find(|k| !is_valid_tag_key(k)) {
            return Err(FormatError::InvalidTagKey {
                field: field.name.clone(),
                key: key.clone(),
            });
        }

        let custom_tags = resolved.custom_tags.as_deref().filter(|t| !t.is_empty());

        let mut parts: Vec<String> = Vec::with_capacity(resolved.auto_tags.len() + 2);
        match resolved.location {
            Location::Query => parts.push(tag_pair(&self.query_key, wire_name)),
            Location::Uri => parts.push(tag_pair(&self.uri_key, wire_name)),
            Location::Body | Location::Unspecified => {
                parts.extend(self.suppression_markers(&resolved.auto_tags, custom_tags))
            }
        }
        parts.extend(resolved.auto_tags.iter().map(|key| tag_pair(key, wire_name)));
        if let Some(custom) = custom_tags {
            parts.push(custom.to_string());
        }

        Ok(EffectiveBinding {
            location: resolved.location,
            tag_string: parts.join(" "),
        })
    }

    fn suppression_markers(&self, auto_tags: &[String], custom_tags: Option<&str>) -> Vec<String> {
        let mut tagged: HashSet<&str> = auto_tags.iter().map(String::as_str).collect();
        if let Some(custom) = custom_tags {
            tagged.extend(
                CUSTOM_KEY_RE
                    .captures_iter(custom)
                    .filter_map(|c| c.get(1))
                    .map(|m| m.as_str()),
            );
        }

        let mut emitted = HashSet::new();
        self.suppressed_families
            .iter()
            .filter(|family| !tagged.contains(family.as_str()))
            .filter(|family| emitted.insert(family.as_str()))
            .map(|family| tag_pair(family, SUPPRESSION_MARKER))
            .collect()
    }
}
