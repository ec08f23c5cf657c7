// src/github/fetch.rs
// =============================================================================
// This module fetches single files from GitHub repositories.
//
// Strategy:
// - Use the contents API: GET /repos/{owner}/{repo}/contents/{path}?ref=...
// - Authenticate with a personal access token (private course repos, and
//   the unauthenticated rate limit is far too low for a full build)
// - The API answers with JSON whose `content` field is base64, wrapped
//   at 60 columns with '\n'
//
// A 404 is not an error here: it means "this repo has no such file" and
// is returned as Ok(None) so callers can treat it as missing input.
//
// Rust concepts:
// - async functions: For network I/O
// - Result<Option<T>>: error vs. absent vs. present, three distinct cases
// - serde Deserialize: only the fields we need are declared
// =============================================================================

use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

// Part of the contents API response we care about
#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: String,
    encoding: String,
}

/// Authenticated client for the GitHub contents API
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    api_base: Url,
    token: String,
}

impl GithubClient {
    /// Creates a client against `api_base` (normally https://api.github.com)
    pub fn new(api_base: &str, token: &str) -> Result<Self> {
        let api_base =
            Url::parse(api_base).map_err(|e| anyhow!("Invalid API URL '{}': {}", api_base, e))?;

        // One client for every request (connection pooling)
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("course-docs/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            http,
            api_base,
            token: token.to_string(),
        })
    }

    /// Fetches `path` from `owner/repo` at `git_ref` as UTF-8 text.
    ///
    /// Returns Ok(None) if the file (or repo, or ref) does not exist.
    pub async fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<String>> {
        let url = self.contents_url(owner, repo, path, git_ref)?;

        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            bail!("Failed to fetch {}: HTTP {}", url, response.status());
        }

        let body: ContentsResponse = response
            .json()
            .await
            .with_context(|| format!("unexpected response body from {}", url))?;

        decode_content(&body).map(Some)
    }

    // {api}/repos/{owner}/{repo}/contents/{path}?ref={git_ref}
    fn contents_url(&self, owner: &str, repo: &str, path: &str, git_ref: &str) -> Result<Url> {
        let mut url = self.api_base.clone();

        url.path_segments_mut()
            .map_err(|_| anyhow!("API URL cannot be a base: {}", self.api_base))?
            .pop_if_empty()
            .extend(["repos", owner, repo, "contents"])
            .extend(path.split('/'));

        url.query_pairs_mut().append_pair("ref", git_ref);
        Ok(url)
    }
}

// base64 (with embedded newlines) -> UTF-8 text
fn decode_content(body: &ContentsResponse) -> Result<String> {
    if body.encoding != "base64" {
        bail!("unsupported content encoding '{}'", body.encoding);
    }

    let packed: String = body
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = STANDARD
        .decode(packed.as_bytes())
        .context("content is not valid base64")?;

    String::from_utf8(bytes).context("content is not valid UTF-8")
}
