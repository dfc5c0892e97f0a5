//! Serde model of a compiled `google.protobuf.FileDescriptorSet`.
//!
//! Only the subset needed for binding resolution is modelled. Keys follow the
//! protobuf JSON mapping (camelCase); snake_case aliases are accepted for
//! hand-written YAML descriptors.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw options of a descriptor, extension values included
pub type OptionsJson = IndexMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FileDescriptorSet {
    #[serde(default)]
    pub file: Vec<FileDescriptorProto>,
}

impl FileDescriptorSet {
    /// Append every file of `other`, skipping files already present by name
    pub fn merge(&mut self, other: FileDescriptorSet) {
        for file in other.file {
            let duplicate = file.name.is_some()
                && self.file.iter().any(|existing| existing.name == file.name);
            if !duplicate {
                self.file.push(file);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptorProto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default, alias = "message_type")]
    pub message_type: Vec<DescriptorProto>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorProto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub field: Vec<FieldDescriptorProto>,
    #[serde(default, alias = "nested_type")]
    pub nested_type: Vec<DescriptorProto>,
    #[serde(default, alias = "oneof_decl")]
    pub oneof_decl: Vec<OneofDescriptorProto>,
    #[serde(default)]
    pub options: Option<OptionsJson>,
}

impl DescriptorProto {
    /// Whether protoc synthesized this message for a `map<K, V>` field
    pub fn is_map_entry(&self) -> bool {
        self.options
            .as_ref()
            .and_then(|o| o.get("mapEntry").or_else(|| o.get("map_entry")))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptorProto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub number: Option<i32>,
    #[serde(default, alias = "json_name")]
    pub json_name: Option<String>,
    #[serde(default, alias = "oneof_index")]
    pub oneof_index: Option<i32>,
    #[serde(default, alias = "proto3_optional")]
    pub proto3_optional: Option<bool>,
    #[serde(default)]
    pub options: Option<OptionsJson>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OneofDescriptorProto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub options: Option<OptionsJson>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_camel_case_descriptor() {
        let set: FileDescriptorSet = serde_json::from_value(json!({
            "file": [{
                "name": "api/v1/search.proto",
                "package": "api.v1",
                "messageType": [{
                    "name": "Search",
                    "field": [
                        { "name": "query", "number": 1, "jsonName": "query", "oneofIndex": 0 }
                    ],
                    "oneofDecl": [{ "name": "criteria" }],
                    "options": { "[protobind.default_location]": "QUERY" }
                }]
            }]
        }))
        .unwrap();

        let message = &set.file[0].message_type[0];
        assert_eq!(message.name.as_deref(), Some("Search"));
        assert_eq!(message.field[0].oneof_index, Some(0));
        assert_eq!(message.oneof_decl[0].name.as_deref(), Some("criteria"));
        assert!(!message.is_map_entry());
    }

    #[test]
    fn test_parse_snake_case_yaml_descriptor() {
        let yaml = r#"
file:
  - package: api.v1
    message_type:
      - name: Lookup
        oneof_decl:
          - name: key
        field:
          - name: id
            number: 1
            oneof_index: 0
"#;
        let set: FileDescriptorSet = serde_yaml::from_str(yaml).unwrap();
        let message = &set.file[0].message_type[0];
        assert_eq!(message.field[0].oneof_index, Some(0));
        assert_eq!(message.oneof_decl.len(), 1);
    }

    #[test]
    fn test_map_entry_detection() {
        let message: DescriptorProto = serde_json::from_value(json!({
            "name": "LabelsEntry",
            "options": { "mapEntry": true }
        }))
        .unwrap();
        assert!(message.is_map_entry());
    }

    #[test]
    fn test_merge_skips_duplicate_files() {
        let file = |name: &str| FileDescriptorProto {
            name: Some(name.to_string()),
            ..Default::default()
        };
        let mut set = FileDescriptorSet {
            file: vec![file("a.proto")],
        };
        set.merge(FileDescriptorSet {
            file: vec![file("a.proto"), file("b.proto")],
        });
        assert_eq!(set.file.len(), 2);
    }
}
