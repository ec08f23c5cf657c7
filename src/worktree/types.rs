// src/worktree/types.rs
// =============================================================================
// Data types for worktree conversion.
//
// Input:  a JSON object mapping "dir/file.ext" -> {size, time, hash}
// Output: a list of TreeNode values (the root-level items)
//
// Rust concepts:
// - Tagged enums in serde: #[serde(tag = "type")] writes "type": "folder"
//   or "type": "file" next to the variant's own fields
// - Option<T>: size and date are "absent", never zero
// =============================================================================

use super::error::WorktreeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata for one tracked file, as read from the worktree data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMeta {
    /// Size in bytes
    pub size: Option<u64>,
    /// Last modification, Unix seconds
    pub modified_at: Option<i64>,
    /// Content hash; carried through, not used for the tree
    pub content_hash: Option<String>,
}

/// Flat worktree data: relative path -> metadata
pub type FlatWorktree = BTreeMap<String, FileMeta>;

// Wire shape of one record. Sizes are read signed so that a negative size
// is reported as an error instead of a generic parse failure.
#[derive(Debug, Deserialize)]
struct RawFileMeta {
    #[serde(default)]
    size: Option<i64>,
    #[serde(default)]
    time: Option<i64>,
    #[serde(default)]
    hash: Option<String>,
}

impl RawFileMeta {
    fn validate(self, path: &str) -> Result<FileMeta, WorktreeError> {
        let size = match self.size {
            Some(size) if size < 0 => {
                return Err(WorktreeError::NegativeSize {
                    path: path.to_string(),
                    size,
                })
            }
            Some(size) => Some(size as u64),
            None => None,
        };

        Ok(FileMeta {
            size,
            modified_at: self.time,
            content_hash: self.hash,
        })
    }
}

/// Parses worktree JSON into validated flat entries.
pub fn parse_worktree(json: &str) -> Result<FlatWorktree, WorktreeError> {
    let raw: BTreeMap<String, RawFileMeta> =
        serde_json::from_str(json).map_err(WorktreeError::Parse)?;

    raw.into_iter()
        .map(|(path, meta)| {
            let meta = meta.validate(&path)?;
            Ok((path, meta))
        })
        .collect()
}

/// A node of the generated file tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Folder(FolderNode),
    File(FileNode),
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Folder(folder) => &folder.name,
            TreeNode::File(file) => &file.name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, TreeNode::Folder(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    /// Full path from the tree root, e.g. "docs/slides"
    pub id: String,
    pub name: String,
    pub depth: usize,
    #[serde(rename = "defaultOpen")]
    pub default_open: bool,
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// Full path, identical to the key in the flat worktree data
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub url: String,
    pub size: Option<u64>,
    /// "YYYY-MM-DD"
    pub date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let entries =
            parse_worktree(r#"{"a/b.pdf": {"size": 12, "time": 1700000000, "hash": "x"}}"#)
                .unwrap();
        let meta = &entries["a/b.pdf"];
        assert_eq!(meta.size, Some(12));
        assert_eq!(meta.modified_at, Some(1700000000));
        assert_eq!(meta.content_hash.as_deref(), Some("x"));
    }

    #[test]
    fn test_parse_missing_fields_are_absent() {
        let entries = parse_worktree(r#"{"a.pdf": {}, "b.pdf": {"size": null}}"#).unwrap();
        assert_eq!(entries["a.pdf"], FileMeta::default());
        assert_eq!(entries["b.pdf"].size, None);
    }

    #[test]
    fn test_parse_negative_size_is_rejected() {
        let result = parse_worktree(r#"{"a.pdf": {"size": -1, "time": 0}}"#);
        assert!(matches!(
            result,
            Err(WorktreeError::NegativeSize { ref path, size: -1 }) if path == "a.pdf"
        ));
    }

    #[test]
    fn test_parse_not_an_object() {
        assert!(matches!(
            parse_worktree("\"nope\""),
            Err(WorktreeError::Parse(_))
        ));
    }

    #[test]
    fn test_node_json_shape() {
        let node = TreeNode::Folder(FolderNode {
            id: "docs".to_string(),
            name: "docs".to_string(),
            depth: 0,
            default_open: false,
            children: vec![TreeNode::File(FileNode {
                id: "docs/a.pdf".to_string(),
                name: "a.pdf".to_string(),
                depth: 1,
                url: "u".to_string(),
                size: None,
                date: None,
            })],
        });

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "folder");
        assert_eq!(value["defaultOpen"], false);
        assert_eq!(value["children"][0]["type"], "file");
        // Absent size and date are written as null, not dropped
        assert!(value["children"][0]["size"].is_null());
        assert!(value["children"][0]
            .as_object()
            .unwrap()
            .contains_key("date"));
    }
}
