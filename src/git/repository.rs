//! Repository preflight and identity

use std::path::Path;

use anyhow::{Context, Result};
use git2::Repository;

/// Fails with a clear message unless `path` is a git repository.
pub fn check_git_repository(path: &Path) -> Result<()> {
    Repository::open(path)
        .with_context(|| format!("'{}' is not a git repository", path.display()))?;
    Ok(())
}

/// Returns a display name for the repository at `path`.
///
/// Uses the working-directory folder name, falling back to the last path
/// component, then to the path itself.
pub fn repository_name(path: &Path) -> String {
    let workdir = Repository::open(path)
        .ok()
        .and_then(|repo| repo.workdir().map(Path::to_path_buf));

    let base = workdir.as_deref().unwrap_or(path);
    let canonical = base.canonicalize().ok();

    canonical
        .as_deref()
        .unwrap_or(base)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
