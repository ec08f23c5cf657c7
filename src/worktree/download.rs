// src/worktree/download.rs
// =============================================================================
// Builds the download URL for a single file in a course repository.
//
// Files are served through a GitHub mirror:
//   https://gh.hoa.moe/github.com/{org}/{repo}/raw/{branch}/{path}
//
// Every segment of {path} is percent-encoded on its own. Only ASCII letters,
// digits and `-._~` stay as they are, so brackets, quotes, spaces and CJK
// names are all escaped while the '/' separators stay intact. Segments are
// never normalized: `.` and `..` are kept literally.
// =============================================================================

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Mirror host and the upstream host prefix it proxies
pub const MIRROR_BASE: &str = "https://gh.hoa.moe/github.com";

/// Organization that owns every course repository
pub const ORGANIZATION: &str = "HITSZ-OpenAuto";

/// Branch the download links point at
pub const BRANCH: &str = "main";

// Everything except the unreserved characters of RFC 3986
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Returns the mirror download URL for `path` inside `repo_name`.
///
/// Same input, same output: no network access happens here.
pub fn build_url(repo_name: &str, path: &str) -> String {
    let encoded: Vec<String> = path
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect();

    format!(
        "{}/{}/{}/raw/{}/{}",
        MIRROR_BASE,
        ORGANIZATION,
        repo_name,
        BRANCH,
        encoded.join("/")
    )
}
