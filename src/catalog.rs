//! Rule catalogue for analysis.
//!
//! The catalogue bundles the static lookup data the analysis depends on: the
//! extension-to-language table, the keyword stop words, the subject words
//! that mark bug-fix and refactor commits, the documentation extensions, the
//! achievement rules and the project milestones applied to merged results. The default
//! catalogue is embedded from `templates/catalog.yaml`; callers may load a
//! replacement from disk and inject it wherever analysis runs.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Embedded default catalogue.
pub const CATALOG_YAML: &str = include_str!("templates/catalog.yaml");

/// Errors raised while loading a catalogue.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalogue file could not be read.
    #[error("Failed to read catalog file {path}: {source}")]
    Read {
        /// Path that was being read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The catalogue is not valid YAML for the expected shape.
    #[error("Invalid catalog format: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Two rules share the same identifier.
    #[error("Duplicate rule id in catalog: {0}")]
    DuplicateRule(String),
}

/// Quantity a rule is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Number of commits.
    TotalCommits,
    /// Longest run of consecutive active days.
    LongestStreak,
    /// Languages touched, excluding the unmapped bucket.
    DistinctLanguages,
    /// Commits with a local hour in `0..5`.
    NightCommits,
    /// Commits on Saturday or Sunday.
    WeekendCommits,
    /// Commits with a local hour in `5..=8`.
    EarlyMorningCommits,
    /// Commits with a local hour in `0..=1`.
    MidnightCommits,
    /// Highest number of commits on a single calendar day.
    MaxDailyCommits,
    /// Commits whose subject mentions a fix or a bug.
    BugFixCommits,
    /// Commits whose subject mentions refactoring.
    RefactorCommits,
    /// Commits touching at least one Markdown file.
    MarkdownCommits,
    /// Mean of insertions plus deletions per commit.
    MeanLinesPerCommit,
    /// Insertions minus deletions.
    NetLines,
    /// Deletions divided by insertions.
    DeletionRatio,
    /// Distinct calendar days with at least one commit.
    ActiveDays,
    /// Projects included in a merged result.
    TotalProjects,
    /// Projects with at least one commit in a merged result.
    ActiveProjects,
    /// Projects on record per active project, once five or more are on record.
    ProjectsPerActive,
    /// One when exactly one project is on record and it is active.
    SingleProject,
}

impl Metric {
    /// Whether values of this metric are whole numbers.
    pub fn is_integral(self) -> bool {
        !matches!(
            self,
            Self::MeanLinesPerCommit | Self::DeletionRatio | Self::ProjectsPerActive
        )
    }
}

/// How a metric value is compared to a rule threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Unlocks when the value reaches the threshold.
    #[default]
    AtLeast,
    /// Unlocks when the value stays under the threshold.
    Below,
}

/// A single threshold rule from the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementRule {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description; `{value}` is replaced with the live metric value.
    pub description: String,
    /// Display icon.
    pub icon: String,
    /// Metric the rule reads.
    pub metric: Metric,
    /// Comparison applied against `threshold`.
    #[serde(default)]
    pub comparison: Comparison,
    /// Threshold value.
    pub threshold: f64,
}

impl AchievementRule {
    /// Returns true when `value` satisfies the rule.
    pub fn is_met(&self, value: f64) -> bool {
        match self.comparison {
            Comparison::AtLeast => value >= self.threshold,
            Comparison::Below => value < self.threshold,
        }
    }
}

/// Complete rule catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Lower-case extension (or extension-less file name) to language label.
    pub languages: BTreeMap<String, String>,
    /// Words ignored when ranking subject keywords.
    #[serde(default)]
    pub stop_words: BTreeSet<String>,
    /// Subject words marking a bug-fix commit.
    #[serde(default)]
    pub bug_fix_words: BTreeSet<String>,
    /// Subject words marking a refactor commit.
    #[serde(default)]
    pub refactor_words: BTreeSet<String>,
    /// Lookup keys counted as Markdown documentation.
    #[serde(default)]
    pub markdown_extensions: BTreeSet<String>,
    /// Rules evaluated for every analysis.
    #[serde(default)]
    pub achievements: Vec<AchievementRule>,
    /// Project-count rules evaluated for merged results only.
    #[serde(default)]
    pub milestones: Vec<AchievementRule>,
}

impl Catalog {
    /// Loads the embedded default catalogue.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_yaml(CATALOG_YAML)
    }

    /// Parses and validates a catalogue from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let mut catalog: Self = serde_yaml::from_str(yaml)?;
        catalog.languages = catalog
            .languages
            .into_iter()
            .map(|(ext, lang)| (ext.to_lowercase(), lang))
            .collect();
        for words in [
            &mut catalog.bug_fix_words,
            &mut catalog.refactor_words,
            &mut catalog.markdown_extensions,
        ] {
            *words = words.iter().map(|word| word.to_lowercase()).collect();
        }
        catalog.validate()?;
        Ok(catalog)
    }

    /// Loads a catalogue from a YAML file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Loads the catalogue at `path`, or the embedded one when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::embedded(),
        }
    }

    /// Returns the language mapped to a lower-case lookup key.
    pub fn language(&self, key: &str) -> Option<&str> {
        self.languages.get(key).map(String::as_str)
    }

    /// Returns true when `word` is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Returns true when a subject contains a bug-fix word.
    pub fn is_bug_fix_subject(&self, subject: &str) -> bool {
        contains_word(subject, &self.bug_fix_words)
    }

    /// Returns true when a subject contains a refactor word.
    pub fn is_refactor_subject(&self, subject: &str) -> bool {
        contains_word(subject, &self.refactor_words)
    }

    /// Returns true when a lookup key names a Markdown file.
    pub fn is_markdown_key(&self, key: &str) -> bool {
        self.markdown_extensions.contains(key)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for rule in self.achievements.iter().chain(&self.milestones) {
            if !seen.insert(rule.id.as_str()) {
                return Err(CatalogError::DuplicateRule(rule.id.clone()));
            }
        }
        Ok(())
    }
}

/// Case-insensitive whole-word match; words are runs of alphanumerics and `_`.
fn contains_word(text: &str, words: &BTreeSet<String>) -> bool {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|token| !token.is_empty() && words.contains(token))
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} languages, {} stop words, {} achievements, {} milestones",
            self.languages.len(),
            self.stop_words.len(),
            self.achievements.len(),
            self.milestones.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_loads() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(catalog.language("rs"), Some("Rust"));
        assert_eq!(catalog.language("md"), Some("Markdown"));
        assert!(catalog.is_stop_word("merge"));
        assert!(catalog.achievements.iter().any(|r| r.id == "bug_hunter"));
        assert!(catalog.milestones.iter().any(|r| r.id == "loyal"));
        assert!(catalog.is_markdown_key("md"));
        assert!(catalog.is_markdown_key("markdown"));
        assert!(!catalog.is_markdown_key("txt"));
    }

    #[test]
    fn subject_words() {
        let catalog = Catalog::embedded().unwrap();
        assert!(catalog.is_bug_fix_subject("Fix login redirect"));
        assert!(catalog.is_bug_fix_subject("hotfix: null deref"));
        assert!(catalog.is_bug_fix_subject("Squash two bugs"));
        assert!(!catalog.is_bug_fix_subject("Add prefix option"));
        assert!(catalog.is_refactor_subject("Refactoring the cache"));
        assert!(catalog.is_refactor_subject("refactor(cli): split args"));
        assert!(!catalog.is_refactor_subject("Add cache"));
    }

    #[test]
    fn custom_catalog_overrides_subject_words() {
        let yaml = r#"
languages: { md: Markdown, adoc: AsciiDoc }
bug_fix_words: [Repair]
refactor_words: [tidy]
markdown_extensions: [ADOC]
"#;
        let catalog = Catalog::from_yaml(yaml).unwrap();
        assert!(catalog.is_bug_fix_subject("Repair the parser"));
        assert!(!catalog.is_bug_fix_subject("Fix the parser"));
        assert!(catalog.is_refactor_subject("Tidy imports"));
        assert!(!catalog.is_refactor_subject("Refactor imports"));
        assert!(catalog.is_markdown_key("adoc"));
        assert!(!catalog.is_markdown_key("md"));
    }

    #[test]
    fn embedded_rules_have_positive_thresholds() {
        let catalog = Catalog::embedded().unwrap();
        for rule in catalog.achievements.iter().chain(&catalog.milestones) {
            assert!(rule.threshold > 0.0, "rule {} has no threshold", rule.id);
        }
    }

    #[test]
    fn extensions_are_lowercased() {
        let catalog = Catalog::from_yaml("languages:\n  RS: Rust\n").unwrap();
        assert_eq!(catalog.language("rs"), Some("Rust"));
        assert!(catalog.achievements.is_empty());
    }

    #[test]
    fn duplicate_rule_ids_rejected() {
        let yaml = r#"
languages: {}
achievements:
  - { id: a, name: A, description: "", icon: "", metric: total_commits, threshold: 1 }
milestones:
  - { id: a, name: B, description: "", icon: "", metric: total_projects, threshold: 5 }
"#;
        let err = Catalog::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateRule(id) if id == "a"));
    }

    #[test]
    fn below_comparison() {
        let rule = AchievementRule {
            id: "small".to_string(),
            name: "Small".to_string(),
            description: String::new(),
            icon: String::new(),
            metric: Metric::MeanLinesPerCommit,
            comparison: Comparison::Below,
            threshold: 50.0,
        };
        assert!(rule.is_met(49.9));
        assert!(!rule.is_met(50.0));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load_from_path(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn load_without_path_uses_embedded() {
        assert_eq!(Catalog::load(None).unwrap(), Catalog::embedded().unwrap());
    }
}
