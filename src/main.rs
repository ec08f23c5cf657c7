// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = finished, possibly with skips; 2 = error)
//
// The build pipeline is strictly ordered:
//   plans -> sync every repository -> (all fetches done) -> pages
// Pages only ever read from the cache, so they must wait for the sync.
// =============================================================================

mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - token and build settings
mod format; // src/format/ - README markup -> MDX
mod github; // src/github/ - contents API client, cache, sync
mod page; // src/page/ - course pages and meta.json manifests
mod plan; // src/plan/ - course-plan command
mod summary; // src/summary.rs - processed/modified/skipped counts
mod worktree; // src/worktree/ - flat file list -> nested file tree

use anyhow::{Context, Result};
use clap::Parser;
use cli::{BuildArgs, Cli, Commands};
use config::BuildConfig;
use format::MarkupFormatter;
use github::{ArtifactCache, FetchOutcome, GithubClient, SyncReport};
use std::collections::HashSet;
use std::path::Path;
use summary::RunSummary;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Diagnostics go to stderr so that --json output on stdout stays clean
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => handle_build(args).await,
        Commands::Format { dir, json } => handle_format(&dir, json).await,
        Commands::Tree { file, repo, pretty } => handle_tree(&file, &repo, pretty).await,
    }
}

// Handles the 'build' subcommand
async fn handle_build(args: BuildArgs) -> Result<i32> {
    // Fatal before any work: no token, no build
    let config = BuildConfig::from_args(args)?;
    let formatter = MarkupFormatter::new()?;
    let client = GithubClient::new(&config.api_base, &config.token)?;
    let cache = ArtifactCache::new(&config.cache_dir);
    let mut summary = RunSummary::default();

    println!("📋 Reading repository list: {}", config.repos_list.display());
    let repos = config::read_repos_list(&config.repos_list).await?;
    let known: HashSet<String> = repos.iter().cloned().collect();
    println!("   {} repositories", repos.len());

    cache.ensure_dir().await?;
    tokio::fs::create_dir_all(&config.docs_dir)
        .await
        .with_context(|| format!("failed to create {}", config.docs_dir.display()))?;

    println!("🔍 Listing plans with `{}`...", config.plan_command);
    let load = plan::load_plans(&config.plan_command, &known, config.concurrency()).await?;
    for plan_id in &load.failed {
        summary.record_skip(format!("plan {}", plan_id), "failed to list courses");
    }
    let course_count: usize = load.plans.iter().map(|p| p.courses.len()).sum();
    println!("   {} plan(s), {} course page(s)", load.plans.len(), course_count);

    println!(
        "⬇️  Syncing {} repositories from {} into {} (up to {} at once)...",
        repos.len(),
        config.sync.owner,
        cache.dir().display(),
        config.concurrency()
    );
    let reports = github::sync_repos(&client, &cache, &repos, &config.sync).await;
    record_sync_failures(&reports, &mut summary);
    let fetched = reports
        .iter()
        .filter(|r| r.readme == FetchOutcome::Fetched)
        .count();
    println!("   {} README(s) downloaded, the rest from cache", fetched);
    let with_tree = reports.iter().filter(|r| r.worktree.is_available()).count();
    println!("   {} of {} repositories have worktree data", with_tree, reports.len());

    println!("📝 Generating pages in {}...", config.docs_dir.display());
    page::generate_pages(&load.plans, &cache, &config.docs_dir, &formatter, &mut summary).await;

    println!();
    summary::print_summary(&summary, config.json)?;

    Ok(0)
}

// Repository-level problems become skips; only pages count as processed
fn record_sync_failures(reports: &[SyncReport], summary: &mut RunSummary) {
    for report in reports {
        match &report.readme {
            FetchOutcome::Fetched | FetchOutcome::Cached => {}
            FetchOutcome::Missing => {
                summary.record_skip(format!("{} README", report.repo), "not found upstream")
            }
            FetchOutcome::Failed(reason) => {
                summary.record_skip(format!("{} README", report.repo), reason.as_str())
            }
        }
        // No worktree data only means no file browser on the page
        if let FetchOutcome::Failed(reason) = &report.worktree {
            summary.record_skip(format!("{} worktree", report.repo), reason.as_str());
        }
    }
}

// Handles the 'format' subcommand
async fn handle_format(dir: &Path, json: bool) -> Result<i32> {
    println!("🔍 Formatting MDX files in {}", dir.display());

    let formatter = MarkupFormatter::new()?;
    let report = formatter.format_dir(dir).await?;

    println!("📄 Found {} MDX file(s)", report.found);

    for path in &report.modified {
        let shown = path.strip_prefix(dir).unwrap_or(path);
        println!("   Modified: {}", shown.display());
    }

    let mut summary = RunSummary {
        processed: report.found - report.failed.len(),
        modified: report.modified.len(),
        ..Default::default()
    };
    for (path, reason) in &report.failed {
        summary.record_skip(path.display().to_string(), reason.as_str());
    }

    println!();
    summary::print_summary(&summary, json)?;
    Ok(0)
}

// Handles the 'tree' subcommand
async fn handle_tree(file: &Path, repo: &str, pretty: bool) -> Result<i32> {
    let json = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let entries = worktree::parse_worktree(&json)
        .with_context(|| format!("failed to load {}", file.display()))?;
    let tree = worktree::build_tree(&entries, repo)?;

    if tree.is_empty() {
        eprintln!("⚠️  No files to display for {}", repo);
        return Ok(0);
    }

    if pretty {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        println!("{}", worktree::serialize(&tree)?);
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(repo: &str, readme: FetchOutcome, worktree: FetchOutcome) -> SyncReport {
        SyncReport {
            repo: repo.to_string(),
            readme,
            worktree,
        }
    }

    #[test]
    fn test_sync_results_are_not_counted_as_processed() {
        let reports = vec![
            report("A", FetchOutcome::Fetched, FetchOutcome::Fetched),
            report("B", FetchOutcome::Cached, FetchOutcome::Missing),
            report("C", FetchOutcome::Missing, FetchOutcome::Missing),
            report(
                "D",
                FetchOutcome::Failed("timeout".to_string()),
                FetchOutcome::Failed("timeout".to_string()),
            ),
        ];

        let mut summary = RunSummary::default();
        record_sync_failures(&reports, &mut summary);

        assert_eq!(summary.processed, 0);
        assert_eq!(summary.modified, 0);
        assert_eq!(summary.skipped, 3);
        let items: Vec<&str> = summary.skips.iter().map(|s| s.item.as_str()).collect();
        assert_eq!(items, vec!["C README", "D README", "D worktree"]);
    }
}
