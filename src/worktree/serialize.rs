// src/worktree/serialize.rs
// =============================================================================
// Renders the tree as compact JSON that can sit inside a single-quoted
// JavaScript string literal in the generated page:
//
//   <Files repo="cs101" data={JSON.parse('...here...')} />
//
// Escaping order matters: backslashes are doubled first, then single
// quotes get a backslash. Doing it the other way round would double the
// backslashes we just inserted in front of the quotes.
// =============================================================================

use super::error::WorktreeError;
use super::types::TreeNode;

/// Compact JSON for `tree`, escaped for a single-quoted literal.
pub fn serialize(tree: &[TreeNode]) -> Result<String, WorktreeError> {
    let json = serde_json::to_string(tree).map_err(WorktreeError::Encode)?;
    Ok(escape_single_quoted(&json))
}

fn escape_single_quoted(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Reverses the literal escaping, the way the downstream JS parser reads
/// the string: a backslash always takes the next character verbatim.
#[cfg(test)]
pub fn unescape_embedded(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }

    out
}
