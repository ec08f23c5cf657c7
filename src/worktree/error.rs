use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorktreeError {
    #[error("invalid worktree data: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to encode tree: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("negative size {size} for {path}")]
    NegativeSize { path: String, size: i64 },
    #[error("timestamp {time} out of range for {path}")]
    InvalidTimestamp { path: String, time: i64 },
}
