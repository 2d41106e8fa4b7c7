//! Analysis result types and serialization.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub mod export;

pub use export::{render, to_json, to_yaml, write_report, ReportFormat};

/// Number of subject keywords kept in a result.
pub const TOP_KEYWORDS: usize = 20;

/// Complete statistics for one repository or a merged set of repositories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Commit and line totals.
    pub totals: Totals,
    /// File-level language mix keyed by language label.
    pub languages: BTreeMap<String, LanguageStat>,
    /// Hour, weekday and month frequency tables.
    pub time: TimeStats,
    /// Streak statistics.
    pub streaks: StreakStats,
    /// One summary per analyzed project.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<ProjectSummary>,
    /// Daily and monthly commit series.
    pub trends: CommitTrends,
    /// Commit counts by weekday and hour.
    pub punch_card: PunchCard,
    /// Most frequent subject keywords, most frequent first.
    pub keywords: Vec<KeywordCount>,
    /// Unlocked achievements.
    pub achievements: Vec<Achievement>,
    /// Persona derived from aggregate behaviour.
    pub persona: Persona,
    /// Derived facts for report renderers.
    pub highlights: Highlights,
    /// Aggregates retained so results can be merged exactly.
    #[serde(skip)]
    pub digest: ActivityDigest,
}

impl AnalysisResult {
    /// Number of projects on record.
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    /// Number of projects with at least one commit.
    pub fn active_project_count(&self) -> usize {
        self.projects.iter().filter(|p| p.commits > 0).count()
    }

    /// Language with the most classified files, ignoring the unmapped bucket.
    ///
    /// Ties resolve to the alphabetically first language.
    pub fn top_language(&self) -> Option<&str> {
        let mut best: Option<(&str, u64)> = None;
        for (language, stat) in &self.languages {
            if language == crate::analysis::OTHER_LANGUAGE {
                continue;
            }
            if best.map_or(true, |(_, count)| stat.count > count) {
                best = Some((language, stat.count));
            }
        }
        best.map(|(language, _)| language)
    }
}

/// Commit and line totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Number of commits.
    pub commits: u64,
    /// Lines added.
    pub insertions: u64,
    /// Lines removed.
    pub deletions: u64,
    /// Insertions minus deletions.
    pub net_lines: i64,
}

impl Totals {
    /// Deletions per insertion, zero when nothing was inserted.
    pub fn deletion_ratio(&self) -> f64 {
        if self.insertions == 0 {
            0.0
        } else {
            self.deletions as f64 / self.insertions as f64
        }
    }

    /// Mean insertions plus deletions per commit, `None` without commits.
    pub fn mean_lines_per_commit(&self) -> Option<f64> {
        if self.commits == 0 {
            None
        } else {
            Some((self.insertions + self.deletions) as f64 / self.commits as f64)
        }
    }
}

/// File count and rounded share for one language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStat {
    /// Classified files attributed to the language.
    pub count: u64,
    /// Rounded percentage of all classified files.
    pub percentage: u32,
}

/// Frequency tables keyed by local time components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeStats {
    /// Commits per hour of day (0-23).
    pub hourly: BTreeMap<u32, u64>,
    /// Commits per day of week (0 = Sunday).
    pub weekday: BTreeMap<u32, u64>,
    /// Commits per `YYYY-MM` month.
    pub monthly: BTreeMap<String, u64>,
}

impl TimeStats {
    /// Sum of hourly counts for hours in `range`.
    pub fn commits_in_hours(&self, range: impl std::ops::RangeBounds<u32>) -> u64 {
        self.hourly.range(range).map(|(_, count)| count).sum()
    }

    /// Commits on Saturday or Sunday.
    pub fn weekend_commits(&self) -> u64 {
        self.weekday.get(&0).copied().unwrap_or(0) + self.weekday.get(&6).copied().unwrap_or(0)
    }
}

/// Streak statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStats {
    /// Longest run of consecutive active days.
    pub longest: u32,
    /// Run of active days ending today, zero when today is inactive.
    pub current: u32,
    /// Distinct active days.
    pub total_active_days: u32,
}

/// Per-project summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Display name.
    pub name: String,
    /// Repository path.
    pub path: PathBuf,
    /// Number of commits.
    pub commits: u64,
    /// Lines added.
    pub insertions: u64,
    /// Lines removed.
    pub deletions: u64,
    /// Insertions minus deletions.
    pub net_lines: i64,
    /// Most used language, if any file was classified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_language: Option<String>,
}

/// A dated commit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// `YYYY-MM-DD` or `YYYY-MM` key.
    pub date: String,
    /// Commits on that key.
    pub count: u64,
}

/// Ascending commit series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitTrends {
    /// One point per active day.
    pub daily: Vec<TrendPoint>,
    /// One point per active month.
    pub monthly: Vec<TrendPoint>,
}

/// 7x24 matrix of commit counts indexed `[weekday][hour]`, Sunday first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PunchCard(pub [[u64; 24]; 7]);

impl PunchCard {
    /// Records one commit.
    pub fn record(&mut self, weekday: u32, hour: u32) {
        if let Some(cell) = self
            .0
            .get_mut(weekday as usize)
            .and_then(|row| row.get_mut(hour as usize))
        {
            *cell += 1;
        }
    }

    /// Count at `[weekday][hour]`.
    pub fn get(&self, weekday: usize, hour: usize) -> u64 {
        self.0[weekday][hour]
    }

    /// Sum of all cells.
    pub fn total(&self) -> u64 {
        self.0.iter().flatten().sum()
    }

    /// Adds every cell of `other` into this card.
    pub fn add(&mut self, other: &Self) {
        for (row, other_row) in self.0.iter_mut().zip(other.0.iter()) {
            for (cell, other_cell) in row.iter_mut().zip(other_row) {
                *cell += other_cell;
            }
        }
    }
}

/// A ranked keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    /// Lower-cased word.
    pub word: String,
    /// Occurrences across commit subjects.
    pub count: u64,
}

/// An achievement evaluated from the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Rule identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Description with live figures filled in.
    pub description: String,
    /// Display icon.
    pub icon: String,
    /// Whether the rule is satisfied.
    pub unlocked: bool,
    /// `current/target` progress for threshold rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
}

/// Persona title and narrative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Short title.
    pub title: String,
    /// One-sentence description.
    pub description: String,
}

/// Derived facts for report renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlights {
    /// Day with the most commits (earliest on ties).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busiest_day: Option<TrendPoint>,
    /// Hour with the most commits (earliest on ties).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_hour: Option<u32>,
    /// Weekday with the most commits (lowest index on ties).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_weekday: Option<u32>,
    /// Earliest commit timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_commit: Option<DateTime<FixedOffset>>,
    /// Latest commit timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit: Option<DateTime<FixedOffset>>,
}

/// Aggregates that cannot be rebuilt from the published fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityDigest {
    /// Every keyword count in first-seen order.
    pub keyword_counts: Vec<KeywordCount>,
    /// Commits whose subject mentions a fix or a bug.
    pub bug_fix_commits: u64,
    /// Commits whose subject mentions refactoring.
    pub refactor_commits: u64,
    /// Commits touching Markdown files.
    pub markdown_commits: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_ratios_are_zero_guarded() {
        let totals = Totals::default();
        assert_eq!(totals.deletion_ratio(), 0.0);
        assert_eq!(totals.mean_lines_per_commit(), None);

        let totals = Totals {
            commits: 4,
            insertions: 100,
            deletions: 60,
            net_lines: 40,
        };
        assert!((totals.deletion_ratio() - 0.6).abs() < f64::EPSILON);
        assert_eq!(totals.mean_lines_per_commit(), Some(40.0));
    }

    #[test]
    fn punch_card_ignores_out_of_range_cells() {
        let mut card = PunchCard::default();
        card.record(0, 23);
        card.record(6, 0);
        card.record(7, 0);
        card.record(0, 24);
        assert_eq!(card.total(), 2);
        assert_eq!(card.get(0, 23), 1);
    }

    #[test]
    fn top_language_skips_other_and_breaks_ties_alphabetically() {
        let mut result = AnalysisResult::default();
        for (language, count) in [("Other", 9), ("Rust", 3), ("Go", 3)] {
            result
                .languages
                .insert(language.to_string(), LanguageStat { count, percentage: 0 });
        }
        assert_eq!(result.top_language(), Some("Go"));
    }

    #[test]
    fn time_helpers() {
        let mut time = TimeStats::default();
        time.hourly.extend([(0, 2), (4, 1), (5, 7), (23, 1)]);
        time.weekday.extend([(0, 3), (3, 5), (6, 4)]);
        assert_eq!(time.commits_in_hours(0..5), 3);
        assert_eq!(time.commits_in_hours(5..=8), 7);
        assert_eq!(time.weekend_commits(), 7);
    }
}
