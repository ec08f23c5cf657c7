// src/page/mod.rs
// =============================================================================
// This module writes the generated docs tree.
//
// Submodules:
// - assemble: the text of one course page (frontmatter + body + tree block)
// - meta: meta.json navigation manifests per year and per major
// - write: write-if-changed helper shared by both
//
// Everything here reads from the artifact cache only. It must run after
// the GitHub sync has finished.
// =============================================================================

mod assemble;
mod meta;
mod write;

use crate::format::MarkupFormatter;
use crate::github::{Artifact, ArtifactCache};
use crate::plan::{Course, Plan};
use crate::summary::RunSummary;
use anyhow::Result;
use assemble::{course_page, load_tree};
use meta::ManifestWriter;
use std::path::{Path, PathBuf};
use tracing::warn;
use write::write_if_changed;

/// Where a course page lives: {docs}/{year}/{major}/{course}.mdx
pub fn course_page_path(docs_dir: &Path, plan: &Plan, course: &Course) -> PathBuf {
    docs_dir
        .join(&plan.year)
        .join(&plan.major_code)
        .join(format!("{}.mdx", course.code))
}

/// Writes every course page and manifest for `plans`.
///
/// A course whose README is not cached is skipped; a course without
/// worktree data gets a page with no tree block.
pub async fn generate_pages(
    plans: &[Plan],
    cache: &ArtifactCache,
    docs_dir: &Path,
    formatter: &MarkupFormatter,
    summary: &mut RunSummary,
) {
    let mut manifests = ManifestWriter::new(docs_dir);

    for plan in plans {
        for course in &plan.courses {
            let item = format!("{}/{}/{}", plan.year, plan.major_code, course.code);
            match write_course_page(plan, course, cache, docs_dir, formatter).await {
                Ok(Some(modified)) => summary.record_processed(modified),
                Ok(None) => summary.record_skip(item, "README not cached"),
                Err(e) => {
                    warn!(course = %item, error = %format!("{:#}", e), "failed to write page");
                    summary.record_skip(item, format!("{:#}", e));
                }
            }
        }

        match manifests.write_for_plan(plan).await {
            Ok(changed) => summary.modified += changed,
            Err(e) => {
                warn!(plan = %plan.plan_id, error = %format!("{:#}", e), "failed to write meta.json");
                summary.record_skip(format!("{} meta.json", plan.plan_id), format!("{:#}", e));
            }
        }
    }
}

// Ok(None) = no README; Ok(Some(changed)) = page written (or unchanged)
async fn write_course_page(
    plan: &Plan,
    course: &Course,
    cache: &ArtifactCache,
    docs_dir: &Path,
    formatter: &MarkupFormatter,
) -> Result<Option<bool>> {
    let Some(readme) = cache.read(&course.code, Artifact::Readme).await? else {
        return Ok(None);
    };

    let body = formatter.format(&readme);
    let tree = load_tree(cache, &course.code).await;
    let page = course_page(&course.name, &body, tree.as_deref());

    let path = course_page_path(docs_dir, plan, course);
    write_if_changed(&path, &page).await.map(Some)
}
