//! Achievement evaluation against catalogue rules.

use crate::analysis::OTHER_LANGUAGE;
use crate::catalog::{AchievementRule, Comparison, Metric};
use crate::data::{Achievement, AnalysisResult};

/// Values of every [`Metric`] for one result.
///
/// Built from published aggregates plus the activity digest, so the same
/// snapshot can be taken from a single-repository or a merged result.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricSnapshot {
    /// Number of commits.
    pub total_commits: u64,
    /// Longest streak in days.
    pub longest_streak: u64,
    /// Languages touched, excluding the unmapped bucket.
    pub distinct_languages: u64,
    /// Commits with a local hour in `0..5`.
    pub night_commits: u64,
    /// Commits on Saturday or Sunday.
    pub weekend_commits: u64,
    /// Commits with a local hour in `5..=8`.
    pub early_morning_commits: u64,
    /// Commits with a local hour in `0..=1`.
    pub midnight_commits: u64,
    /// Highest commit count on a single day.
    pub max_daily_commits: u64,
    /// Bug-fix commits.
    pub bug_fix_commits: u64,
    /// Refactoring commits.
    pub refactor_commits: u64,
    /// Commits touching Markdown.
    pub markdown_commits: u64,
    /// Mean lines per commit, absent without commits.
    pub mean_lines_per_commit: Option<f64>,
    /// Insertions minus deletions.
    pub net_lines: i64,
    /// Deletions per insertion.
    pub deletion_ratio: f64,
    /// Distinct active days.
    pub active_days: u64,
    /// Projects on record.
    pub total_projects: u64,
    /// Projects with commits.
    pub active_projects: u64,
}

/// Minimum projects on record before the focus ratio is reported.
const FOCUS_MIN_PROJECTS: u64 = 5;

impl MetricSnapshot {
    /// Takes a snapshot of `result`.
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            total_commits: result.totals.commits,
            longest_streak: u64::from(result.streaks.longest),
            distinct_languages: result
                .languages
                .keys()
                .filter(|language| *language != OTHER_LANGUAGE)
                .count() as u64,
            night_commits: result.time.commits_in_hours(0..5),
            weekend_commits: result.time.weekend_commits(),
            early_morning_commits: result.time.commits_in_hours(5..=8),
            midnight_commits: result.time.commits_in_hours(0..=1),
            max_daily_commits: result
                .trends
                .daily
                .iter()
                .map(|point| point.count)
                .max()
                .unwrap_or(0),
            bug_fix_commits: result.digest.bug_fix_commits,
            refactor_commits: result.digest.refactor_commits,
            markdown_commits: result.digest.markdown_commits,
            mean_lines_per_commit: result.totals.mean_lines_per_commit(),
            net_lines: result.totals.net_lines,
            deletion_ratio: result.totals.deletion_ratio(),
            active_days: u64::from(result.streaks.total_active_days),
            total_projects: result.project_count() as u64,
            active_projects: result.active_project_count() as u64,
        }
    }

    /// Value of `metric`, or `None` when it is undefined for this snapshot.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        let value = match metric {
            Metric::TotalCommits => self.total_commits as f64,
            Metric::LongestStreak => self.longest_streak as f64,
            Metric::DistinctLanguages => self.distinct_languages as f64,
            Metric::NightCommits => self.night_commits as f64,
            Metric::WeekendCommits => self.weekend_commits as f64,
            Metric::EarlyMorningCommits => self.early_morning_commits as f64,
            Metric::MidnightCommits => self.midnight_commits as f64,
            Metric::MaxDailyCommits => self.max_daily_commits as f64,
            Metric::BugFixCommits => self.bug_fix_commits as f64,
            Metric::RefactorCommits => self.refactor_commits as f64,
            Metric::MarkdownCommits => self.markdown_commits as f64,
            Metric::MeanLinesPerCommit => return self.mean_lines_per_commit,
            Metric::NetLines => self.net_lines as f64,
            Metric::DeletionRatio => self.deletion_ratio,
            Metric::ActiveDays => self.active_days as f64,
            Metric::TotalProjects => self.total_projects as f64,
            Metric::ActiveProjects => self.active_projects as f64,
            Metric::ProjectsPerActive => {
                if self.total_projects >= FOCUS_MIN_PROJECTS && self.active_projects > 0 {
                    self.total_projects as f64 / self.active_projects as f64
                } else {
                    0.0
                }
            }
            Metric::SingleProject => {
                if self.total_projects == 1 && self.active_projects == 1 {
                    1.0
                } else {
                    0.0
                }
            }
        };
        Some(value)
    }
}

/// Evaluates every rule, locked or not.
pub fn evaluate_rules(snapshot: &MetricSnapshot, rules: &[AchievementRule]) -> Vec<Achievement> {
    rules.iter().map(|rule| evaluate_rule(snapshot, rule)).collect()
}

/// Evaluates rules and keeps only the unlocked ones.
pub fn unlocked_achievements(
    snapshot: &MetricSnapshot,
    rules: &[AchievementRule],
) -> Vec<Achievement> {
    evaluate_rules(snapshot, rules)
        .into_iter()
        .filter(|achievement| achievement.unlocked)
        .collect()
}

fn evaluate_rule(snapshot: &MetricSnapshot, rule: &AchievementRule) -> Achievement {
    let value = snapshot.value(rule.metric);
    let unlocked = value.is_some_and(|v| rule.is_met(v));

    let shown = value.map_or_else(|| "0".to_string(), |v| format_value(rule.metric, v));
    let progress = match (rule.comparison, value) {
        (Comparison::AtLeast, Some(v)) => Some(format!(
            "{}/{}",
            format_value(rule.metric, v),
            format_value(rule.metric, rule.threshold)
        )),
        _ => None,
    };

    Achievement {
        id: rule.id.clone(),
        name: rule.name.clone(),
        description: rule.description.replace("{value}", &shown),
        icon: rule.icon.clone(),
        unlocked,
        progress,
    }
}

fn format_value(metric: Metric, value: f64) -> String {
    if metric.is_integral() {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
