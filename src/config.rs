// src/config.rs
// =============================================================================
// Runtime settings for a build.
//
// Sources, in order:
// 1. .env file in the working directory, if any (dotenvy)
// 2. process environment: PERSONAL_ACCESS_TOKEN (required)
// 3. command-line flags (BuildArgs), each with a default
//
// The token is checked before anything else runs: a build without it
// would fail on every single repository.
// =============================================================================

use crate::cli::BuildArgs;
use crate::github::SyncOptions;
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable holding the GitHub token
pub const TOKEN_VAR: &str = "PERSONAL_ACCESS_TOKEN";

#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub token: String,
    pub api_base: String,
    pub repos_list: PathBuf,
    pub cache_dir: PathBuf,
    pub docs_dir: PathBuf,
    pub plan_command: String,
    pub sync: SyncOptions,
    pub json: bool,
}

impl BuildConfig {
    /// Combines CLI flags with the environment.
    pub fn from_args(args: BuildArgs) -> Result<Self> {
        dotenvy::dotenv().ok();
        let token = env::var(TOKEN_VAR).ok();
        Self::with_token(args, token)
    }

    fn with_token(args: BuildArgs, token: Option<String>) -> Result<Self> {
        let token = match token.map(|t| t.trim().to_string()) {
            Some(token) if !token.is_empty() => token,
            _ => bail!("missing {}: set it in the environment or in .env", TOKEN_VAR),
        };

        let concurrency = usize::from(args.concurrency);

        Ok(Self {
            token,
            api_base: args.api_base,
            repos_list: args.repos_list,
            cache_dir: args.cache_dir,
            docs_dir: args.docs_dir,
            plan_command: args.plan_command,
            sync: SyncOptions {
                owner: args.owner,
                readme_path: args.readme_file,
                readme_ref: args.readme_ref,
                worktree_path: args.worktree_file,
                worktree_ref: args.worktree_ref,
                concurrency,
            },
            json: args.json,
        })
    }

    pub fn concurrency(&self) -> usize {
        self.sync.concurrency
    }
}

/// Reads repos_list.txt: one name per line, blanks ignored, order kept,
/// duplicates dropped.
pub async fn read_repos_list(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read repository list {}", path.display()))?;
    Ok(parse_repos_list(&content))
}

fn parse_repos_list(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(line.to_string()))
        .map(str::to_string)
        .collect()
}
