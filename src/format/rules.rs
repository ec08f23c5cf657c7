// src/format/rules.rs
// =============================================================================
// Text-level rewrites that make upstream README markup valid MDX.
//
// Each rule is a regex substitution, applied in this order:
//   1. drop <!-- comments -->
//   2. drop shields.io badges
//   3. <br> / <hr> -> self-closing
//   4. drop empty table rows
//   5. style="a-b: c" -> style={{aB: "c"}}
//   6. escape { } inside $math$
// Accordion conversion and blank-line cleanup live in accordion.rs / mod.rs.
// =============================================================================

use regex::{Captures, Regex};

/// Compiled rewrite rules; build once, reuse for every file
#[derive(Debug, Clone)]
pub struct MarkupRules {
    comment: Regex,
    badge: Regex,
    line_break: Regex,
    rule: Regex,
    empty_row_before_table_end: Regex,
    empty_row: Regex,
    style_attr: Regex,
    math: Regex,
    pub(super) blank_lines: Regex,
}

impl MarkupRules {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            comment: Regex::new(r"(?s)<!--.*?-->")?,
            badge: Regex::new(r"!\[[^\]]*\]\(https://img\.shields\.io/[^)]+\)\s*")?,
            line_break: Regex::new(r"<br\s*>")?,
            rule: Regex::new(r"<hr\s*>")?,
            empty_row_before_table_end: Regex::new(r"<tr>\s*</table>")?,
            empty_row: Regex::new(r"<tr>\s*</tr>")?,
            style_attr: Regex::new(r#"style="([^"]*)""#)?,
            // Display math first so "$$" is not read as an empty inline span
            math: Regex::new(r"\$\$[^$]+\$\$|\$[^$]+\$")?,
            blank_lines: Regex::new(r"\n{3,}")?,
        })
    }

    /// Applies rules 1-6 in order.
    pub fn apply(&self, content: &str) -> String {
        let content = self.comment.replace_all(content, "");
        let content = self.badge.replace_all(&content, "");
        let content = self.line_break.replace_all(&content, "<br />");
        let content = self.rule.replace_all(&content, "<hr />");
        let content = self
            .empty_row_before_table_end
            .replace_all(&content, "</table>");
        let content = self.empty_row.replace_all(&content, "");
        let content = self
            .style_attr
            .replace_all(&content, |caps: &Captures| style_to_jsx(&caps[1]));
        let content = self
            .math
            .replace_all(&content, |caps: &Captures| escape_braces(&caps[0]));

        content.into_owned()
    }
}

// "text-align:center; color: red" -> style={{textAlign: "center", color: "red"}}
// An attribute with no usable declarations is dropped entirely.
fn style_to_jsx(declarations: &str) -> String {
    let props: Vec<String> = declarations
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.trim().split_once(':')?;
            Some(format!("{}: \"{}\"", camel_case(name.trim()), value.trim()))
        })
        .collect();

    if props.is_empty() {
        String::new()
    } else {
        format!("style={{{{{}}}}}", props.join(", "))
    }
}

// "border-top-width" -> "borderTopWidth"
fn camel_case(property: &str) -> String {
    let mut parts = property.split('-');
    let mut out = parts.next().unwrap_or_default().to_string();

    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }

    out
}

// Backslash every { or } that is not already escaped
fn escape_braces(math: &str) -> String {
    let mut out = String::with_capacity(math.len());
    let mut prev = None;

    for c in math.chars() {
        if (c == '{' || c == '}') && prev != Some('\\') {
            out.push('\\');
        }
        out.push(c);
        prev = Some(c);
    }

    out
}
