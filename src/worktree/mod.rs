// src/worktree/mod.rs
// =============================================================================
// This module turns flat worktree data into the nested file tree shown on
// every course page.
//
// Pipeline (one-way, no I/O):
//   flat JSON mapping -> filtered mapping -> nested tree -> escaped string
//
// Submodules:
// - types: FileMeta input records and the TreeNode output union
// - filter: decides which repository paths are shown
// - download: builds the mirror download URL for a file
// - build: materializes folders and files, sorts and prunes
// - serialize: compact JSON, escaped for a single-quoted JS literal
// - error: the typed error for this module
//
// Rust concepts:
// - Enums with data: TreeNode is either a folder or a file
// - Result<T, E>: every step that can see bad input returns one
// =============================================================================

mod build;
mod download;
mod error;
mod filter;
mod serialize;
mod types;

pub use build::build_tree;
pub use error::WorktreeError;
pub use serialize::serialize;
#[cfg(test)]
pub use serialize::unescape_embedded;
pub use types::{parse_worktree, TreeNode};

// Converts raw worktree JSON for one repository into the embedding-safe
// tree string.
//
// Returns Ok(None) when nothing survives filtering: the caller must not
// emit a tree block at all in that case.
pub fn render_worktree(json: &str, repo_name: &str) -> Result<Option<String>, WorktreeError> {
    let entries = parse_worktree(json)?;
    let tree = build_tree(&entries, repo_name)?;

    if tree.is_empty() {
        return Ok(None);
    }

    serialize(&tree).map(Some)
}
