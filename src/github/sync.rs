// src/github/sync.rs
// =============================================================================
// Downloads README and worktree data for every course repository.
//
// How it works:
// 1. For each repository, check the cache for each artifact
// 2. Fetch only what is missing, through the contents API
// 3. Run up to `concurrency` repositories at once (buffer_unordered)
// 4. Return one report per repository once ALL of them have finished
//
// Page generation reads from the cache afterwards, so it must only start
// after sync_repos() has returned.
//
// A failure is isolated to its repository: it is logged, reported and the
// rest of the batch carries on.
// =============================================================================

use super::cache::{Artifact, ArtifactCache};
use super::fetch::GithubClient;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

/// Where each artifact lives upstream
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub owner: String,
    pub readme_path: String,
    pub readme_ref: String,
    pub worktree_path: String,
    pub worktree_ref: String,
    pub concurrency: usize,
}

/// What happened to one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Downloaded and written to the cache
    Fetched,
    /// Already cached, nothing downloaded
    Cached,
    /// Does not exist upstream
    Missing,
    /// Network, API or cache failure
    Failed(String),
}

impl FetchOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, FetchOutcome::Fetched | FetchOutcome::Cached)
    }
}

/// Per-repository result of a sync
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub repo: String,
    pub readme: FetchOutcome,
    pub worktree: FetchOutcome,
}

/// Brings the cache up to date for every repository in `repos`.
pub async fn sync_repos(
    client: &GithubClient,
    cache: &ArtifactCache,
    repos: &[String],
    options: &SyncOptions,
) -> Vec<SyncReport> {
    let mut reports: Vec<SyncReport> = stream::iter(repos)
        .map(|repo| sync_repo(client, cache, repo, options))
        .buffer_unordered(options.concurrency.max(1))
        .collect()
        .await;

    // Completion order is arbitrary; report in a stable order
    reports.sort_by(|a, b| a.repo.cmp(&b.repo));
    reports
}

async fn sync_repo(
    client: &GithubClient,
    cache: &ArtifactCache,
    repo: &str,
    options: &SyncOptions,
) -> SyncReport {
    let readme = sync_artifact(
        client,
        cache,
        repo,
        Artifact::Readme,
        &options.owner,
        &options.readme_path,
        &options.readme_ref,
    )
    .await;

    // A README failure does not stop the worktree fetch, and vice versa
    let worktree = sync_artifact(
        client,
        cache,
        repo,
        Artifact::Worktree,
        &options.owner,
        &options.worktree_path,
        &options.worktree_ref,
    )
    .await;

    SyncReport {
        repo: repo.to_string(),
        readme,
        worktree,
    }
}

async fn sync_artifact(
    client: &GithubClient,
    cache: &ArtifactCache,
    repo: &str,
    artifact: Artifact,
    owner: &str,
    path: &str,
    git_ref: &str,
) -> FetchOutcome {
    if cache.contains(repo, artifact).await {
        debug!(repo, ?artifact, "cache hit");
        return FetchOutcome::Cached;
    }

    info!(repo, ?artifact, "fetching");

    let content = match client.fetch_file(owner, repo, path, git_ref).await {
        Ok(Some(content)) => content,
        Ok(None) => {
            debug!(repo, ?artifact, path, git_ref, "not found upstream");
            return FetchOutcome::Missing;
        }
        Err(e) => {
            warn!(repo, ?artifact, error = %format!("{:#}", e), "fetch failed");
            return FetchOutcome::Failed(format!("{:#}", e));
        }
    };

    match cache.write(repo, artifact, &content).await {
        Ok(()) => FetchOutcome::Fetched,
        Err(e) => {
            warn!(repo, ?artifact, error = %format!("{:#}", e), "cache write failed");
            FetchOutcome::Failed(format!("{:#}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn options() -> SyncOptions {
        SyncOptions {
            owner: "HITSZ-OpenAuto".to_string(),
            readme_path: "README.md".to_string(),
            readme_ref: "main".to_string(),
            worktree_path: "worktree.json".to_string(),
            worktree_ref: "worktree".to_string(),
            concurrency: 4,
        }
    }

    #[test]
    fn test_outcome_availability() {
        assert!(FetchOutcome::Fetched.is_available());
        assert!(FetchOutcome::Cached.is_available());
        assert!(!FetchOutcome::Missing.is_available());
        assert!(!FetchOutcome::Failed("x".to_string()).is_available());
    }

    // Everything cached: no request is made, so the unroutable API base
    // is never contacted.
    #[tokio::test]
    async fn test_fully_cached_repos_skip_network() {
        let dir = tempdir().unwrap();
        let cache = ArtifactCache::new(dir.path());
        for repo in ["b", "a"] {
            cache.write(repo, Artifact::Readme, "# x").await.unwrap();
            cache.write(repo, Artifact::Worktree, "{}").await.unwrap();
        }

        let client = GithubClient::new("http://127.0.0.1:9", "token").unwrap();
        let repos = vec!["b".to_string(), "a".to_string()];
        let reports = sync_repos(&client, &cache, &repos, &options()).await;

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].repo, "a");
        assert_eq!(reports[1].repo, "b");
        for report in reports {
            assert_eq!(report.readme, FetchOutcome::Cached);
            assert_eq!(report.worktree, FetchOutcome::Cached);
        }
    }

    // A failing fetch is reported per artifact, not raised
    #[tokio::test]
    async fn test_unreachable_api_is_isolated() {
        let dir = tempdir().unwrap();
        let cache = ArtifactCache::new(dir.path());
        cache.write("a", Artifact::Readme, "# a").await.unwrap();

        let client = GithubClient::new("http://127.0.0.1:9", "token").unwrap();
        let reports = sync_repos(&client, &cache, &["a".to_string()], &options()).await;

        assert_eq!(reports[0].readme, FetchOutcome::Cached);
        assert!(matches!(reports[0].worktree, FetchOutcome::Failed(_)));
    }
}
