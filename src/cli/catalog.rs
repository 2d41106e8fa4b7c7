//! Catalogue-related CLI commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::catalog::Catalog;
use crate::data::to_yaml;
use crate::utils::Settings;

/// Catalogue operations.
#[derive(Parser)]
pub struct CatalogCommand {
    /// Catalogue subcommand to execute.
    #[command(subcommand)]
    pub command: CatalogSubcommands,
}

/// Catalogue subcommands.
#[derive(Subcommand)]
pub enum CatalogSubcommands {
    /// Shows the active rule catalogue as YAML.
    Show(ShowCommand),
}

/// Show command options.
#[derive(Parser)]
pub struct ShowCommand {
    /// Catalogue file to show instead of the configured or embedded one.
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,
}

impl CatalogCommand {
    /// Executes the catalog command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            CatalogSubcommands::Show(show_cmd) => show_cmd.execute(),
        }
    }
}

impl ShowCommand {
    /// Executes the show command.
    pub fn execute(self) -> Result<()> {
        let path = match self.catalog {
            Some(path) => Some(path),
            None => Settings::load()?.catalog,
        };
        let catalog = Catalog::load(path.as_deref()).context("Failed to load rule catalogue")?;
        info!("Showing catalogue: {catalog}");
        print!("{}", to_yaml(&catalog)?);
        Ok(())
    }
}
