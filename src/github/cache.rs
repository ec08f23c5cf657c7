// src/github/cache.rs
// =============================================================================
// On-disk cache of fetched repository artifacts.
//
// Layout (one flat directory):
//   {dir}/{repo}.mdx   README text, as fetched
//   {dir}/{repo}.json  flat worktree data
//
// Fetching is idempotent on a cache hit: if the file exists it is used
// as-is and never re-downloaded. Delete it to force a refresh.
// =============================================================================

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Which cached artifact of a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Readme,
    Worktree,
}

impl Artifact {
    fn extension(self) -> &'static str {
        match self {
            Artifact::Readme => "mdx",
            Artifact::Worktree => "json",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactCache {
    dir: PathBuf,
}

impl ArtifactCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, repo: &str, artifact: Artifact) -> PathBuf {
        self.dir.join(format!("{}.{}", repo, artifact.extension()))
    }

    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create cache dir {}", self.dir.display()))
    }

    pub async fn contains(&self, repo: &str, artifact: Artifact) -> bool {
        tokio::fs::try_exists(self.path(repo, artifact))
            .await
            .unwrap_or(false)
    }

    /// Reads a cached artifact; Ok(None) if it was never fetched.
    pub async fn read(&self, repo: &str, artifact: Artifact) -> Result<Option<String>> {
        let path = self.path(repo, artifact);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    pub async fn write(&self, repo: &str, artifact: Artifact, content: &str) -> Result<()> {
        let path = self.path(repo, artifact);
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_paths() {
        let cache = ArtifactCache::new("repos");
        assert_eq!(
            cache.path("COMP1001", Artifact::Readme),
            PathBuf::from("repos/COMP1001.mdx")
        );
        assert_eq!(
            cache.path("COMP1001", Artifact::Worktree),
            PathBuf::from("repos/COMP1001.json")
        );
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let cache = ArtifactCache::new(dir.path().join("repos"));
        cache.ensure_dir().await.unwrap();

        assert!(!cache.contains("a", Artifact::Readme).await);
        assert_eq!(cache.read("a", Artifact::Readme).await.unwrap(), None);

        cache.write("a", Artifact::Readme, "# A").await.unwrap();
        assert!(cache.contains("a", Artifact::Readme).await);
        assert_eq!(
            cache.read("a", Artifact::Readme).await.unwrap().as_deref(),
            Some("# A")
        );
        // Different artifact of the same repo is still missing
        assert_eq!(cache.read("a", Artifact::Worktree).await.unwrap(), None);
    }
}
