//! Commit analytics: classification, aggregation, achievements, personas and merging.

use chrono::NaiveDate;

use crate::catalog::Catalog;

pub mod achievements;
pub mod aggregate;
pub mod classifier;
pub mod merge;
pub mod persona;
pub mod pipeline;

pub use achievements::{evaluate_rules, unlocked_achievements, MetricSnapshot};
pub use aggregate::analyze_commits;
pub use classifier::{LanguageClassifier, OTHER_LANGUAGE, UNKNOWN_LANGUAGE};
pub use merge::{merge_results, project_summary, ProjectIdentity, RepositoryAnalysis};
pub use persona::{classify_persona, PersonaInputs, PersonaKind};
pub use pipeline::{analyze_log, analyze_repositories, analyze_repository, resolve_repositories};

/// Inputs shared by every analysis run.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    /// Rule data injected into the aggregator.
    pub catalog: &'a Catalog,
    /// Reference date for the current streak.
    pub today: NaiveDate,
}

impl<'a> AnalysisContext<'a> {
    /// Creates a context.
    pub fn new(catalog: &'a Catalog, today: NaiveDate) -> Self {
        Self { catalog, today }
    }

    /// Classifier backed by the context's catalogue.
    pub fn classifier(&self) -> LanguageClassifier<'a> {
        LanguageClassifier::new(self.catalog)
    }
}
