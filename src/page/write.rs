use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;

/// Writes `content` to `path` unless the file already holds exactly that.
///
/// Parent directories are created as needed. Returns true if the file was
/// created or changed.
pub async fn write_if_changed(path: &Path, content: &str) -> Result<bool> {
    match tokio::fs::read_to_string(path).await {
        Ok(existing) if existing == content => return Ok(false),
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
    }

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}
