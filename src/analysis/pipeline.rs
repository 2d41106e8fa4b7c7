//! Single- and multi-repository analysis runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::analysis::merge::{merge_results, project_summary, ProjectIdentity, RepositoryAnalysis};
use crate::analysis::{analyze_commits, AnalysisContext};
use crate::data::AnalysisResult;
use crate::git::{parse_log, LogFilter, LogSource};

/// Analyzes raw log text for one repository.
pub fn analyze_log(raw: &str, identity: &ProjectIdentity, ctx: &AnalysisContext<'_>) -> AnalysisResult {
    let commits = parse_log(raw, ctx.classifier());
    let mut result = analyze_commits(&commits, ctx);
    result.projects = vec![project_summary(identity, &result)];
    result
}

/// Fetches and analyzes one repository.
///
/// A failed fetch is returned as an error.
pub fn analyze_repository(
    source: &dyn LogSource,
    identity: &ProjectIdentity,
    filter: &LogFilter,
    ctx: &AnalysisContext<'_>,
) -> Result<AnalysisResult> {
    let raw = source
        .fetch_log(&identity.path, filter)
        .with_context(|| format!("Failed to read history of '{}'", identity.name))?;
    Ok(analyze_log(&raw, identity, ctx))
}

/// Fetches, analyzes and merges several repositories in order.
///
/// A repository whose fetch fails is logged and left out of the merge.
pub fn analyze_repositories(
    source: &dyn LogSource,
    repos: &[PathBuf],
    filter: &LogFilter,
    ctx: &AnalysisContext<'_>,
) -> AnalysisResult {
    let mut analyses = Vec::with_capacity(repos.len());

    for repo in repos {
        let identity = ProjectIdentity::from_path(repo);
        match source.fetch_log(repo, filter) {
            Ok(raw) => {
                let result = analyze_log(&raw, &identity, ctx);
                info!(
                    repo = %identity.name,
                    commits = result.totals.commits,
                    "Analyzed repository"
                );
                analyses.push(RepositoryAnalysis { identity, result });
            }
            Err(err) => {
                warn!(repo = %repo.display(), error = %err, "Skipping repository");
            }
        }
    }

    info!(
        requested = repos.len(),
        analyzed = analyses.len(),
        "Merging repository results"
    );
    merge_results(&analyses, ctx)
}

/// Resolves the repositories to analyze: explicit paths, then configured
/// defaults, then the current directory.
pub fn resolve_repositories(explicit: &[PathBuf], configured: &[PathBuf]) -> Vec<PathBuf> {
    if !explicit.is_empty() {
        explicit.to_vec()
    } else if !configured.is_empty() {
        configured.to_vec()
    } else {
        vec![Path::new(".").to_path_buf()]
    }
}
