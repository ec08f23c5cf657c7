// src/page/meta.rs
// =============================================================================
// Writes the navigation manifests (meta.json) for the docs tree.
//
//   {docs}/{year}/meta.json          {"title": "2024"}
//   {docs}/{year}/{major}/meta.json  {"title": "...", "root": true, "defaultOpen": true}
//
// Several plans can share a year, so each manifest is written once per
// run: the writer remembers which groupings it has already handled.
// =============================================================================

use super::write::write_if_changed;
use crate::plan::Plan;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct YearMeta<'a> {
    title: &'a str,
}

#[derive(Debug, Serialize)]
struct MajorMeta<'a> {
    title: &'a str,
    root: bool,
    #[serde(rename = "defaultOpen")]
    default_open: bool,
}

/// Writes each year / major manifest at most once
#[derive(Debug)]
pub struct ManifestWriter {
    docs_dir: PathBuf,
    years: HashSet<String>,
    majors: HashSet<(String, String)>,
}

impl ManifestWriter {
    pub fn new(docs_dir: impl Into<PathBuf>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            years: HashSet::new(),
            majors: HashSet::new(),
        }
    }

    /// Writes the manifests `plan` needs that were not written yet.
    ///
    /// Returns how many files were created or changed on disk.
    pub async fn write_for_plan(&mut self, plan: &Plan) -> Result<usize> {
        let mut changed = 0;

        if self.years.insert(plan.year.clone()) {
            let path = self.docs_dir.join(&plan.year).join("meta.json");
            let meta = YearMeta { title: &plan.year };
            changed += usize::from(write_json(&path, &meta).await?);
        }

        let major_key = (plan.year.clone(), plan.major_code.clone());
        if self.majors.insert(major_key) {
            let path = self
                .docs_dir
                .join(&plan.year)
                .join(&plan.major_code)
                .join("meta.json");
            let meta = MajorMeta {
                title: &plan.major_name,
                root: true,
                default_open: true,
            };
            changed += usize::from(write_json(&path, &meta).await?);
        }

        Ok(changed)
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<bool> {
    let json = serde_json::to_string(value)
        .with_context(|| format!("failed to encode {}", path.display()))?;
    write_if_changed(path, &json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn plan(id: &str, year: &str, code: &str, name: &str) -> Plan {
        Plan {
            plan_id: id.to_string(),
            year: year.to_string(),
            major_code: code.to_string(),
            major_name: name.to_string(),
            courses: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_manifests_written_once_per_grouping() {
        let dir = tempdir().unwrap();
        let mut writer = ManifestWriter::new(dir.path());

        assert_eq!(writer.write_for_plan(&plan("p1", "2024", "CS", "计算机")).await.unwrap(), 2);
        // Same year, new major: only the major manifest
        assert_eq!(writer.write_for_plan(&plan("p2", "2024", "AI", "人工智能")).await.unwrap(), 1);
        // Same year and major again: nothing
        assert_eq!(writer.write_for_plan(&plan("p3", "2024", "CS", "计算机")).await.unwrap(), 0);

        let year = std::fs::read_to_string(dir.path().join("2024/meta.json")).unwrap();
        assert_eq!(year, r#"{"title":"2024"}"#);

        let major = std::fs::read_to_string(dir.path().join("2024/CS/meta.json")).unwrap();
        assert_eq!(major, r#"{"title":"计算机","root":true,"defaultOpen":true}"#);
    }

    #[tokio::test]
    async fn test_unchanged_manifest_is_not_counted() {
        let dir = tempdir().unwrap();
        let p = plan("p1", "2023", "EE", "电子");

        ManifestWriter::new(dir.path()).write_for_plan(&p).await.unwrap();
        // A fresh run over identical data modifies nothing
        let changed = ManifestWriter::new(dir.path()).write_for_plan(&p).await.unwrap();
        assert_eq!(changed, 0);
    }
}
