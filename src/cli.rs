//! CLI interface for gitpulse.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod analyze;
pub mod catalog;

/// gitpulse: contributor activity statistics from git history.
#[derive(Parser)]
#[command(name = "gitpulse")]
#[command(
    about = "Turns git history into activity statistics, streaks, achievements and personas",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Analyzes one or more repositories.
    Analyze(analyze::AnalyzeCommand),
    /// Rule catalogue operations.
    Catalog(catalog::CatalogCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Analyze(analyze_cmd) => analyze_cmd.execute(),
            Commands::Catalog(catalog_cmd) => catalog_cmd.execute(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ReportFormat;
    use std::path::PathBuf;

    #[test]
    fn analyze_flags_parse() {
        let cli = Cli::try_parse_from([
            "gitpulse",
            "analyze",
            "repo-a",
            "repo-b",
            "--author",
            "jane@example.com",
            "--author",
            "Jane Doe",
            "--since",
            "2024-01-01",
            "--include-merges",
            "--format",
            "json",
            "--today",
            "2024-06-30",
        ])
        .unwrap();

        let Commands::Analyze(cmd) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(cmd.repos, [PathBuf::from("repo-a"), PathBuf::from("repo-b")]);
        assert_eq!(cmd.author, ["jane@example.com", "Jane Doe"]);
        assert_eq!(cmd.since.as_deref(), Some("2024-01-01"));
        assert!(cmd.include_merges);
        assert_eq!(cmd.format, ReportFormat::Json);
        assert_eq!(cmd.today.map(|d| d.to_string()).as_deref(), Some("2024-06-30"));
    }

    #[test]
    fn analyze_defaults() {
        let cli = Cli::try_parse_from(["gitpulse", "analyze"]).unwrap();
        let Commands::Analyze(cmd) = cli.command else {
            panic!("expected analyze");
        };
        assert!(cmd.repos.is_empty());
        assert_eq!(cmd.format, ReportFormat::Yaml);
        assert!(cmd.output.is_none());
    }

    #[test]
    fn invalid_today_is_rejected() {
        assert!(Cli::try_parse_from(["gitpulse", "analyze", "--today", "yesterday"]).is_err());
    }

    #[test]
    fn catalog_show_parses() {
        let cli = Cli::try_parse_from(["gitpulse", "catalog", "show"]).unwrap();
        assert!(matches!(cli.command, Commands::Catalog(_)));
    }
}
