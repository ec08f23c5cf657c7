// src/github/mod.rs
// =============================================================================
// This module handles everything that comes from GitHub.
//
// Currently implements:
// - An authenticated contents-API client (fetch one file at one ref)
// - A flat on-disk cache of fetched READMEs and worktree data
// - A bounded-concurrency sync over every course repository
//
// Rust concepts:
// - Modules: Organizing related functionality
// - Public API: What other parts of the app can use
// =============================================================================

mod cache;
mod fetch;
mod sync;

pub use cache::{Artifact, ArtifactCache};
pub use fetch::GithubClient;
pub use sync::{sync_repos, FetchOutcome, SyncOptions, SyncReport};
