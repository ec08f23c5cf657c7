// src/worktree/filter.rs
// =============================================================================
// Decides whether a repository path appears in the generated file tree.
//
// Three fixed tables drive the decision:
// - exact basenames (housekeeping files every course repo carries)
// - basename extensions
// - full-path prefixes (CI configuration)
// =============================================================================

/// Basenames that never show up in the tree
pub const EXCLUDED_NAMES: &[&str] = &[".gitkeep", "README.md", "LICENSE", "tag.txt"];

/// Extensions (matched against the basename) that never show up in the tree
pub const EXCLUDED_EXTENSIONS: &[&str] = &[".toml"];

/// Path prefixes that never show up in the tree
pub const EXCLUDED_PREFIXES: &[&str] = &[".github/"];

/// Returns true if `path` is eligible for the file tree.
pub fn should_include(path: &str) -> bool {
    // rsplit always yields at least one item, even for ""
    let name = path.rsplit('/').next().unwrap_or(path);

    if EXCLUDED_NAMES.contains(&name) {
        return false;
    }

    if EXCLUDED_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        return false;
    }

    !EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}
