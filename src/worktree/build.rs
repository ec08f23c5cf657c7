// src/worktree/build.rs
// =============================================================================
// Builds the nested file tree from flat worktree data.
//
// Two phases:
// 1. Draft: walk every included path and register its folders in a map
//    keyed by full folder path, so "does this folder exist yet?" is a
//    single lookup and shared prefixes are created once.
// 2. Freeze: starting at the root, turn each draft folder into an ordered
//    Vec<TreeNode>, recursing into sub-folders first and dropping any
//    folder that ends up with no children.
//
// Sibling order: folders before files, then case-insensitive name.
//
// Rust concepts:
// - HashMap keyed by full path: folders are deduplicated by path, not name
// - Recursion with an owned map: freeze() removes drafts as it consumes them
// =============================================================================

use super::error::WorktreeError;
use super::filter::should_include;
use super::types::{FileNode, FlatWorktree, FolderNode, TreeNode};
use super::download::build_url;
use chrono::DateTime;
use std::cmp::Ordering;
use std::collections::HashMap;

// Key of the implicit root folder in the draft map
const ROOT: &str = "";

#[derive(Debug, Default)]
struct DraftFolder {
    name: String,
    depth: usize,
    // Full paths of sub-folders, in first-seen order
    subfolders: Vec<String>,
    files: Vec<FileNode>,
}

/// Builds the root-level tree items for one repository.
///
/// Excluded paths are dropped before any folder is created, so they can
/// never leave an empty folder behind. An empty result means "no tree".
pub fn build_tree(entries: &FlatWorktree, repo_name: &str) -> Result<Vec<TreeNode>, WorktreeError> {
    let mut drafts: HashMap<String, DraftFolder> = HashMap::new();
    drafts.insert(ROOT.to_string(), DraftFolder::default());

    for (path, meta) in entries.iter().filter(|(path, _)| should_include(path)) {
        let segments: Vec<&str> = path.split('/').collect();
        let Some((file_name, folders)) = segments.split_last() else {
            continue;
        };

        let mut parent = ROOT.to_string();
        for (depth, segment) in folders.iter().enumerate() {
            let folder_id = if depth == 0 {
                segment.to_string()
            } else {
                format!("{}/{}", parent, segment)
            };

            if !drafts.contains_key(&folder_id) {
                drafts.insert(folder_id.clone(), DraftFolder {
                    name: segment.to_string(),
                    depth,
                    ..Default::default()
                });
                drafts
                    .entry(parent)
                    .or_default()
                    .subfolders
                    .push(folder_id.clone());
            }

            parent = folder_id;
        }

        let date = match meta.modified_at {
            Some(time) => Some(format_date(path, time)?),
            None => None,
        };

        let file = FileNode {
            id: path.clone(),
            name: file_name.to_string(),
            depth: folders.len(),
            url: build_url(repo_name, path),
            size: meta.size,
            date,
        };

        drafts.entry(parent).or_default().files.push(file);
    }

    Ok(freeze(&mut drafts, ROOT))
}

// Converts one draft folder's contents into the final ordered children.
fn freeze(drafts: &mut HashMap<String, DraftFolder>, id: &str) -> Vec<TreeNode> {
    let Some(draft) = drafts.remove(id) else {
        return Vec::new();
    };

    let mut children = Vec::with_capacity(draft.subfolders.len() + draft.files.len());

    for folder_id in draft.subfolders {
        // Read name/depth before the recursive call removes the entry
        let (name, depth) = match drafts.get(&folder_id) {
            Some(folder) => (folder.name.clone(), folder.depth),
            None => continue,
        };

        let grandchildren = freeze(drafts, &folder_id);
        if grandchildren.is_empty() {
            continue;
        }

        children.push(TreeNode::Folder(FolderNode {
            id: folder_id,
            name,
            depth,
            default_open: false,
            children: grandchildren,
        }));
    }

    children.extend(draft.files.into_iter().map(TreeNode::File));
    children.sort_by(compare_siblings);
    children
}

// Folders first, then case-insensitive name. Names that only differ by
// case fall back to a case-sensitive comparison so the order never
// depends on input order.
fn compare_siblings(a: &TreeNode, b: &TreeNode) -> Ordering {
    b.is_folder()
        .cmp(&a.is_folder())
        .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
        .then_with(|| a.name().cmp(b.name()))
}

// Unix seconds -> "YYYY-MM-DD" (UTC)
fn format_date(path: &str, time: i64) -> Result<String, WorktreeError> {
    DateTime::from_timestamp(time, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .ok_or_else(|| WorktreeError::InvalidTimestamp {
            path: path.to_string(),
            time,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worktree::types::FileMeta;

    fn meta(size: u64, time: i64) -> FileMeta {
        FileMeta {
            size: Some(size),
            modified_at: Some(time),
            content_hash: Some("h".to_string()),
        }
    }

    fn entries(paths: &[&str]) -> FlatWorktree {
        paths
            .iter()
            .map(|p| (p.to_string(), meta(1, 1700000000)))
            .collect()
    }

    fn collect_file_ids(nodes: &[TreeNode], out: &mut Vec<String>) {
        for node in nodes {
            match node {
                TreeNode::Folder(folder) => collect_file_ids(&folder.children, out),
                TreeNode::File(file) => out.push(file.id.clone()),
            }
        }
    }

    fn assert_no_empty_folders(nodes: &[TreeNode]) {
        for node in nodes {
            if let TreeNode::Folder(folder) = node {
                assert!(!folder.children.is_empty(), "empty folder {}", folder.id);
                assert_no_empty_folders(&folder.children);
            }
        }
    }

    fn assert_sibling_order(nodes: &[TreeNode]) {
        for pair in nodes.windows(2) {
            assert_ne!(compare_siblings(&pair[0], &pair[1]), Ordering::Greater);
            if pair[0].is_folder() == pair[1].is_folder() {
                assert!(pair[0].name().to_lowercase() <= pair[1].name().to_lowercase());
            } else {
                assert!(pair[0].is_folder());
            }
        }
        for node in nodes {
            if let TreeNode::Folder(folder) = node {
                assert_sibling_order(&folder.children);
            }
        }
    }

    #[test]
    fn test_deep_path_depths_and_ids() {
        let tree = build_tree(&entries(&["a/b/c/file.txt"]), "r").unwrap();

        let TreeNode::Folder(a) = &tree[0] else { panic!() };
        assert_eq!((a.id.as_str(), a.name.as_str(), a.depth), ("a", "a", 0));
        let TreeNode::Folder(b) = &a.children[0] else { panic!() };
        assert_eq!((b.id.as_str(), b.name.as_str(), b.depth), ("a/b", "b", 1));
        let TreeNode::Folder(c) = &b.children[0] else { panic!() };
        assert_eq!((c.id.as_str(), c.name.as_str(), c.depth), ("a/b/c", "c", 2));
        let TreeNode::File(file) = &c.children[0] else { panic!() };
        assert_eq!(file.id, "a/b/c/file.txt");
        assert_eq!(file.name, "file.txt");
        assert_eq!(file.depth, 3);
    }

    #[test]
    fn test_root_level_file() {
        let tree = build_tree(&entries(&["notes.pdf"]), "r").unwrap();
        assert_eq!(tree.len(), 1);
        let TreeNode::File(file) = &tree[0] else { panic!() };
        assert_eq!(file.depth, 0);
        assert_eq!(file.id, "notes.pdf");
    }

    #[test]
    fn test_shared_prefix_creates_one_folder() {
        let tree = build_tree(&entries(&["docs/a.pdf", "docs/b.pdf", "docs/x/c.pdf"]), "r").unwrap();
        assert_eq!(tree.len(), 1);
        let TreeNode::Folder(docs) = &tree[0] else { panic!() };
        assert_eq!(docs.children.len(), 3);
        assert_eq!(docs.children[0].name(), "x");
    }

    #[test]
    fn test_folders_before_files_case_insensitive() {
        let tree = build_tree(
            &entries(&["b.txt", "A.txt", "zeta/1.txt", "Alpha/2.txt", "c.TXT", "a.md"]),
            "r",
        )
        .unwrap();
        let names: Vec<&str> = tree.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["Alpha", "zeta", "a.md", "A.txt", "b.txt", "c.TXT"]);
    }

    #[test]
    fn test_case_variants_are_distinct_entries() {
        let tree = build_tree(&entries(&["Notes.md", "notes.md"]), "r").unwrap();
        let ids: Vec<&str> = tree.iter().map(|n| n.name()).collect();
        assert_eq!(ids, vec!["Notes.md", "notes.md"]);
    }

    #[test]
    fn test_excluded_files_leave_no_folders() {
        let tree = build_tree(
            &entries(&[
                ".github/workflows/ci.yml",
                "empty/.gitkeep",
                "deep/er/README.md",
                "deep/keep.pdf",
            ]),
            "r",
        )
        .unwrap();

        assert_eq!(tree.len(), 1);
        let TreeNode::Folder(deep) = &tree[0] else { panic!() };
        assert_eq!(deep.id, "deep");
        assert_eq!(deep.children.len(), 1);
        assert_eq!(deep.children[0].name(), "keep.pdf");
    }

    #[test]
    fn test_everything_excluded_gives_empty_tree() {
        let tree = build_tree(&entries(&["README.md", "x/LICENSE", "pyproject.toml"]), "r").unwrap();
        assert!(tree.is_empty());
        assert!(build_tree(&FlatWorktree::new(), "r").unwrap().is_empty());
    }

    #[test]
    fn test_missing_metadata_is_absent() {
        let mut input = FlatWorktree::new();
        input.insert("a.pdf".to_string(), FileMeta::default());
        let tree = build_tree(&input, "r").unwrap();
        let TreeNode::File(file) = &tree[0] else { panic!() };
        assert_eq!(file.size, None);
        assert_eq!(file.date, None);
    }

    #[test]
    fn test_file_fields() {
        let mut input = FlatWorktree::new();
        input.insert("docs/a.pdf".to_string(), meta(100, 1700000000));
        let tree = build_tree(&input, "cs101").unwrap();
        let TreeNode::Folder(docs) = &tree[0] else { panic!() };
        let TreeNode::File(file) = &docs.children[0] else { panic!() };
        assert_eq!(file.size, Some(100));
        assert_eq!(file.date.as_deref(), Some("2023-11-14"));
        assert_eq!(
            file.url,
            "https://gh.hoa.moe/github.com/HITSZ-OpenAuto/cs101/raw/main/docs/a.pdf"
        );
    }

    #[test]
    fn test_out_of_range_timestamp() {
        let mut input = FlatWorktree::new();
        input.insert("a.pdf".to_string(), meta(1, i64::MAX));
        assert!(matches!(
            build_tree(&input, "r"),
            Err(WorktreeError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_structural_properties_on_mixed_input() {
        let paths = [
            "README.md",
            "lab/Report.docx",
            "lab/data/raw.csv",
            "lab/data/.gitkeep",
            "lab/empty/tag.txt",
            "Lab2/x.py",
            "exam/2021/期末.pdf",
            "exam/2021/期中.pdf",
            "exam/2022/final.PDF",
            ".github/ISSUE_TEMPLATE/bug.md",
            "pyproject.toml",
            "z.txt",
            "Y.txt",
        ];
        let input = entries(&paths);
        let tree = build_tree(&input, "r").unwrap();

        // Every included key appears exactly once as a leaf id
        let mut ids = Vec::new();
        collect_file_ids(&tree, &mut ids);
        ids.sort();
        let mut expected: Vec<String> = paths
            .iter()
            .filter(|p| should_include(p))
            .map(|p| p.to_string())
            .collect();
        expected.sort();
        assert_eq!(ids, expected);

        assert_no_empty_folders(&tree);
        assert_sibling_order(&tree);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let input = entries(&["README.md", "docs/a.pdf", ".github/ci.yml", "b/.gitkeep", "c.txt"]);
        let filtered: FlatWorktree = input
            .iter()
            .filter(|(p, _)| should_include(p))
            .map(|(p, m)| (p.clone(), m.clone()))
            .collect();

        assert_eq!(
            build_tree(&filtered, "r").unwrap(),
            build_tree(&input, "r").unwrap()
        );
    }
}
