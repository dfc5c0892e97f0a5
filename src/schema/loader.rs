//! Descriptor set loader.
//!
//! Loads compiled descriptor sets rendered as JSON or YAML, from a single
//! file or from every `.json`/`.yaml`/`.yml` file in a directory.

use crate::error::{Error, Result};
use crate::schema::descriptor::FileDescriptorSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Load a descriptor set from a file or a directory of descriptor files
pub fn load<P: AsRef<Path>>(path: P) -> Result<FileDescriptorSet> {
    let path = path.as_ref();
    if path.is_dir() {
        load_descriptor_sets(path)
    } else {
        load_descriptor_set(path)
    }
}

/// Load every descriptor file in a directory and merge them into one set
///
/// Files are read in name order so the merged set is stable across runs.
pub fn load_descriptor_sets<P: AsRef<Path>>(dir: P) -> Result<FileDescriptorSet> {
    let dir_path = dir.as_ref();

    if !dir_path.exists() {
        return Err(Error::Config(format!(
            "Directory does not exist: {}",
            dir_path.display()
        )));
    }

    let read_dir = fs::read_dir(dir_path).map_err(|e| Error::io(dir_path, e))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| Error::io(dir_path, e))?;
        let path = entry.path();
        if let Some(ext) = path.extension() {
            if ext == "json" || ext == "yaml" || ext == "yml" {
                paths.push(path);
            }
        }
    }
    paths.sort();

    let mut merged = FileDescriptorSet::default();
    for path in &paths {
        let set = load_descriptor_set(path)?;
        tracing::debug!("Loaded {} file(s) from {}", set.file.len(), path.display());
        merged.merge(set);
    }

    Ok(merged)
}

/// Load a single descriptor set file
///
/// `.json` files are parsed as JSON and `.yaml`/`.yml` as YAML. Any other
/// extension tries JSON first, then falls back to YAML.
pub fn load_descriptor_set<P: AsRef<Path>>(path: P) -> Result<FileDescriptorSet> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(serde_json::from_str(&content)?),
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
        _ => parse_descriptor_set(&content),
    }
}

/// Parse descriptor set text, trying JSON before YAML
pub fn parse_descriptor_set(content: &str) -> Result<FileDescriptorSet> {
    if let Ok(set) = serde_json::from_str::<FileDescriptorSet>(content) {
        return Ok(set);
    }
    Ok(serde_yaml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const JSON_SET: &str = r#"{"file":[{"name":"a.proto","package":"a","messageType":[{"name":"A"}]}]}"#;
    const YAML_SET: &str = "file:\n  - name: b.proto\n    package: b\n    messageType:\n      - name: B\n";

    #[test]
    fn test_load_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("set.json");
        fs::write(&path, JSON_SET).unwrap();

        let set = load_descriptor_set(&path).unwrap();
        assert_eq!(set.file[0].package.as_deref(), Some("a"));
    }

    #[test]
    fn test_unknown_extension_falls_back_to_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("set.desc");
        fs::write(&path, YAML_SET).unwrap();

        let set = load_descriptor_set(&path).unwrap();
        assert_eq!(set.file[0].message_type[0].name.as_deref(), Some("B"));
    }

    #[test]
    fn test_load_directory_merges_in_name_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("2.yaml"), YAML_SET).unwrap();
        fs::write(dir.path().join("1.json"), JSON_SET).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let set = load(dir.path()).unwrap();
        let names: Vec<_> = set.file.iter().filter_map(|f| f.name.as_deref()).collect();
        assert_eq!(names, vec!["a.proto", "b.proto"]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_descriptor_set("/nonexistent/set.json").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_missing_directory() {
        assert!(load_descriptor_sets("/nonexistent/descriptors").is_err());
    }
}
