// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - build:  full pipeline (plans -> GitHub sync -> pages + manifests)
// - format: rewrite markup of existing .mdx files in place
// - tree:   convert one worktree JSON file, print the embeddable tree
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "course-docs",
    version,
    about = "Build course documentation pages from curriculum plans and GitHub repositories",
    long_about = "course-docs reads the curriculum from the course-plan CLI, downloads each course \
                  repository's README and file listing, and writes MDX pages with navigation \
                  manifests and a file browser for every course."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Regenerate the docs tree from upstream data
    ///
    /// Example: course-docs build --concurrency 16
    ///
    /// Needs PERSONAL_ACCESS_TOKEN in the environment (or a .env file).
    Build(BuildArgs),

    /// Rewrite README markup into MDX for every .mdx file under a directory
    ///
    /// Example: course-docs format content/docs
    Format {
        /// Directory to scan recursively
        #[arg(default_value = "content/docs")]
        dir: PathBuf,

        /// Output the summary in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Convert one flat worktree JSON file into the embeddable tree string
    ///
    /// Example: course-docs tree repos/COMP1001.json --repo COMP1001
    Tree {
        /// Path to the worktree JSON file
        file: PathBuf,

        /// Repository name used in download URLs
        #[arg(long)]
        repo: String,

        /// Print indented, unescaped JSON instead of the embeddable string
        #[arg(long)]
        pretty: bool,
    },
}

/// Options for the `build` subcommand
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// GitHub organization that owns the course repositories
    #[arg(long, default_value = "HITSZ-OpenAuto")]
    pub owner: String,

    /// File listing one repository name per line
    #[arg(long, default_value = "repos_list.txt")]
    pub repos_list: PathBuf,

    /// Where fetched READMEs and worktree data are cached
    #[arg(long, default_value = "repos")]
    pub cache_dir: PathBuf,

    /// Root of the generated docs tree
    #[arg(long, default_value = "content/docs")]
    pub docs_dir: PathBuf,

    /// Path of the README inside each repository
    #[arg(long, default_value = "README.md")]
    pub readme_file: String,

    /// Git ref the README is read from
    #[arg(long, default_value = "main")]
    pub readme_ref: String,

    /// Path of the worktree data inside each repository
    #[arg(long, default_value = "worktree.json")]
    pub worktree_file: String,

    /// Git ref the worktree data is read from
    #[arg(long, default_value = "worktree")]
    pub worktree_ref: String,

    /// Maximum number of fetches / plan commands running at once
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Course-plan command (`<cmd> plans`, `<cmd> courses <id>`)
    #[arg(long, default_value = "hoa")]
    pub plan_command: String,

    /// GitHub API base URL
    #[arg(long, default_value = "https://api.github.com")]
    pub api_base: String,

    /// Output the summary in JSON format instead of a table
    #[arg(long)]
    pub json: bool,
}
