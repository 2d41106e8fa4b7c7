//! YAML and JSON export of analysis results

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use crate::data::AnalysisResult;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// YAML document
    #[default]
    Yaml,
    /// Pretty-printed JSON document
    Json,
}

/// Serialize data structure to a YAML string
pub fn to_yaml<T: Serialize>(data: &T) -> Result<String> {
    serde_yaml::to_string(data).context("Failed to serialize to YAML")
}

/// Serialize data structure to a pretty-printed JSON string
pub fn to_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).context("Failed to serialize to JSON")
}

/// Render a result in the requested format
pub fn render(result: &AnalysisResult, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Yaml => to_yaml(result),
        ReportFormat::Json => to_json(result),
    }
}

/// Render a result and write it to a file
pub fn write_report<P: AsRef<Path>>(
    result: &AnalysisResult,
    format: ReportFormat,
    path: P,
) -> Result<()> {
    let content = render(result, format)?;

    fs::write(&path, content)
        .with_context(|| format!("Failed to write report: {}", path.as_ref().display()))?;

    Ok(())
}
