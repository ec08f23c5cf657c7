// src/format/mod.rs
// =============================================================================
// This module rewrites README markup into MDX the docs site can render.
//
// Submodules:
// - rules: regex rewrites (comments, badges, tags, styles, math)
// - accordion: Hugo details shortcodes -> <Accordions>/<Accordion>
//
// Used in two places:
// - on every README before it becomes a course page (in memory)
// - by the `format` subcommand over an existing docs directory (in place)
// =============================================================================

mod accordion;
mod rules;

use accordion::AccordionConverter;
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use rules::MarkupRules;
use std::path::{Path, PathBuf};

/// All markup rewrites, compiled once
#[derive(Debug, Clone)]
pub struct MarkupFormatter {
    rules: MarkupRules,
    accordions: AccordionConverter,
}

/// Outcome of formatting a directory
#[derive(Debug, Default)]
pub struct FormatReport {
    pub found: usize,
    pub modified: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl MarkupFormatter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: MarkupRules::new().context("invalid markup rule")?,
            accordions: AccordionConverter::new().context("invalid shortcode pattern")?,
        })
    }

    /// Runs every rewrite over `content`.
    pub fn format(&self, content: &str) -> String {
        let content = self.rules.apply(content);
        let content = self.accordions.convert(&content);
        self.rules
            .blank_lines
            .replace_all(&content, "\n\n")
            .into_owned()
    }

    /// Formats one file in place. Returns true if it changed.
    pub async fn format_file(&self, path: &Path) -> Result<bool> {
        let original = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        let formatted = self.format(&original);
        if formatted == original {
            return Ok(false);
        }

        tokio::fs::write(path, formatted)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(true)
    }

    /// Formats every .mdx file below `dir`.
    ///
    /// A file that cannot be read or written is recorded and skipped.
    pub async fn format_dir(&self, dir: &Path) -> Result<FormatReport> {
        let files = find_mdx_files(dir.to_path_buf()).await?;

        let mut report = FormatReport {
            found: files.len(),
            ..Default::default()
        };

        for path in files {
            match self.format_file(&path).await {
                Ok(true) => report.modified.push(path),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %format!("{:#}", e), "format failed");
                    report.failed.push((path, format!("{:#}", e)));
                }
            }
        }

        Ok(report)
    }
}

// Walks `dir` on a blocking thread; hidden and git-ignored files included
async fn find_mdx_files(dir: PathBuf) -> Result<Vec<PathBuf>> {
    if !tokio::fs::try_exists(&dir).await.unwrap_or(false) {
        anyhow::bail!("{} does not exist", dir.display());
    }

    tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkBuilder::new(&dir).standard_filters(false).build() {
            let entry = entry.context("failed to walk docs directory")?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "mdx") {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    })
    .await
    .context("directory walk panicked")?
}
