//! Analyze command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::info;

use crate::analysis::{
    analyze_repositories, analyze_repository, resolve_repositories, AnalysisContext,
    ProjectIdentity,
};
use crate::catalog::Catalog;
use crate::data::{render, write_report, ReportFormat};
use crate::git::{check_git_repository, GitLogRunner};
use crate::utils::Settings;

/// Analyze command options.
#[derive(Parser)]
pub struct AnalyzeCommand {
    /// Repositories to analyze; defaults to the configured list, then the current directory.
    #[arg(value_name = "REPO")]
    pub repos: Vec<PathBuf>,

    /// Only count commits after this date (any format git accepts).
    #[arg(long)]
    pub since: Option<String>,

    /// Only count commits before this date (any format git accepts).
    #[arg(long)]
    pub until: Option<String>,

    /// Author name or email to include; repeat for several identities.
    #[arg(long, value_name = "IDENTITY")]
    pub author: Vec<String>,

    /// Count merge commits.
    #[arg(long)]
    pub include_merges: bool,

    /// Rule catalogue replacing the embedded one.
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Yaml)]
    pub format: ReportFormat,

    /// Writes the report to a file instead of stdout.
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Reference date for the current streak (YYYY-MM-DD); defaults to today.
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,
}

impl AnalyzeCommand {
    /// Executes the analyze command.
    pub fn execute(self) -> Result<()> {
        let settings = Settings::load()?;

        let catalog_path = self.catalog.as_ref().or(settings.catalog.as_ref());
        let catalog = Catalog::load(catalog_path.map(PathBuf::as_path))
            .context("Failed to load rule catalogue")?;
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let ctx = AnalysisContext::new(&catalog, today);

        let filter = settings.log_filter(
            &self.author,
            self.since.clone(),
            self.until.clone(),
            self.include_merges,
        );
        let repos = resolve_repositories(&self.repos, &settings.repos);
        let runner = GitLogRunner::new();

        let result = if let [repo] = repos.as_slice() {
            check_git_repository(repo)?;
            analyze_repository(&runner, &ProjectIdentity::from_path(repo), &filter, &ctx)?
        } else {
            analyze_repositories(&runner, &repos, &filter, &ctx)
        };

        match &self.output {
            Some(path) => {
                write_report(&result, self.format, path)?;
                info!(path = %path.display(), "Report written");
            }
            None => println!("{}", render(&result, self.format)?),
        }

        Ok(())
    }
}
