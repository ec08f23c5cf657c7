// src/page/assemble.rs
// =============================================================================
// Builds the text of one course page.
//
// Page layout:
//   ---
//   title: <course name>
//   ---
//
//   <formatted README>
//
//   ## 资源下载                                  (only if a tree exists)
//
//   <Files repo="COMP1001" data={JSON.parse('[...]')} />
//
// The tree string comes from worktree::serialize and is already escaped
// for the single-quoted literal it lands in.
// =============================================================================

use crate::github::{Artifact, ArtifactCache};
use crate::worktree::render_worktree;
use tracing::{debug, warn};

/// Heading placed above the file browser
pub const TREE_HEADING: &str = "## 资源下载";

/// The file-browser block for one repository.
pub fn tree_block(repo: &str, serialized_tree: &str) -> String {
    format!(
        "\n\n{}\n\n<Files repo=\"{}\" data={{JSON.parse('{}')}} />\n",
        TREE_HEADING, repo, serialized_tree
    )
}

/// Full page text: frontmatter, body, and the optional tree block.
pub fn course_page(title: &str, body: &str, tree: Option<&str>) -> String {
    let mut page = String::with_capacity(body.len() + 64);
    page.push_str("---\n");
    page.push_str(&format!("title: {}\n", frontmatter_value(title)));
    page.push_str("---\n\n");
    page.push_str(body);

    if let Some(tree) = tree {
        page.push_str(tree);
    }

    page
}

// Plain titles are written bare; anything YAML would misread is quoted
// (a JSON string is a valid YAML double-quoted scalar).
fn frontmatter_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value != value.trim()
        || value.contains([':', '#', '"', '\'', '\n'])
        || value.starts_with(['-', '[', '{', '&', '*', '!', '|', '>', '%', '@', '`'])
        || resolves_to_non_string(value);

    if needs_quotes {
        serde_json::Value::String(value.to_string()).to_string()
    } else {
        value.to_string()
    }
}

// Plain scalars a YAML 1.1 or 1.2 loader reads as bool, null or a number
const YAML_KEYWORDS: &[&str] = &[
    "true", "false", "yes", "no", "on", "off", "y", "n", "null", "~",
];

fn resolves_to_non_string(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    if YAML_KEYWORDS.contains(&lower.as_str()) {
        return true;
    }

    let unsigned = lower.trim_start_matches(['+', '-']);
    let radix_digits = |prefix: &str, radix: u32| {
        unsigned
            .strip_prefix(prefix)
            .is_some_and(|d| !d.is_empty() && d.chars().all(|c| c.is_digit(radix)))
    };

    matches!(unsigned, ".inf" | ".nan")
        || radix_digits("0x", 16)
        || radix_digits("0o", 8)
        || radix_digits("0b", 2)
        || unsigned.replace('_', "").parse::<f64>().is_ok()
}

/// Loads and renders the cached worktree data for `repo`.
///
/// Every problem downgrades to "no tree": missing data, malformed data and
/// trees where every file was filtered out all return None.
pub async fn load_tree(cache: &ArtifactCache, repo: &str) -> Option<String> {
    let json = match cache.read(repo, Artifact::Worktree).await {
        Ok(Some(json)) => json,
        Ok(None) => {
            debug!(repo, "no worktree data");
            return None;
        }
        Err(e) => {
            warn!(repo, error = %format!("{:#}", e), "failed to read worktree data");
            return None;
        }
    };

    match render_worktree(&json, repo) {
        Ok(Some(tree)) => Some(tree_block(repo, &tree)),
        Ok(None) => {
            debug!(repo, "worktree has no displayable files");
            None
        }
        Err(e) => {
            warn!(repo, error = %e, "malformed worktree data");
            None
        }
    }
}
