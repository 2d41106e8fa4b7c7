//! Merging per-repository results into one report.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::analysis::achievements::{unlocked_achievements, MetricSnapshot};
use crate::analysis::aggregate::{
    add_keyword, classify, peak_highlights, series, streak_stats, top_keywords, with_percentages,
};
use crate::analysis::persona::PersonaKind;
use crate::analysis::AnalysisContext;
use crate::data::{
    ActivityDigest, AnalysisResult, CommitTrends, Highlights, KeywordCount, ProjectSummary,
    PunchCard, TimeStats, Totals, TrendPoint, TOP_KEYWORDS,
};
use crate::git::repository_name;

/// Project count from which the persona switches to the multi-project narrative.
const MULTIVERSE_MIN_PROJECTS: usize = 5;

/// Name and location of an analyzed repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdentity {
    /// Display name.
    pub name: String,
    /// Repository path.
    pub path: PathBuf,
}

impl ProjectIdentity {
    /// Creates an identity with an explicit name.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Creates an identity named after the repository folder.
    pub fn from_path(path: &Path) -> Self {
        Self::new(repository_name(path), path)
    }
}

/// One repository's result, tagged with its identity.
#[derive(Debug, Clone)]
pub struct RepositoryAnalysis {
    /// Which repository was analyzed.
    pub identity: ProjectIdentity,
    /// Its statistics.
    pub result: AnalysisResult,
}

/// Summarizes one repository's result.
pub fn project_summary(identity: &ProjectIdentity, result: &AnalysisResult) -> ProjectSummary {
    ProjectSummary {
        name: identity.name.clone(),
        path: identity.path.clone(),
        commits: result.totals.commits,
        insertions: result.totals.insertions,
        deletions: result.totals.deletions,
        net_lines: result.totals.net_lines,
        top_language: result.top_language().map(str::to_string),
    }
}

/// Merges repository results into a new result.
///
/// Counts, tables and series are summed; streaks are recomputed from the
/// merged daily series and achievements from the summed digests, so the
/// outcome matches analyzing all commits together. Project milestones are
/// appended after the regular achievements.
pub fn merge_results(inputs: &[RepositoryAnalysis], ctx: &AnalysisContext<'_>) -> AnalysisResult {
    let results = || inputs.iter().map(|input| &input.result);

    let mut totals = Totals::default();
    let mut time = TimeStats::default();
    let mut punch_card = PunchCard::default();
    let mut language_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut daily: BTreeMap<String, u64> = BTreeMap::new();
    let mut monthly: BTreeMap<String, u64> = BTreeMap::new();
    let mut digest = ActivityDigest::default();
    let mut keyword_index: HashMap<String, usize> = HashMap::new();

    for result in results() {
        totals.commits += result.totals.commits;
        totals.insertions += result.totals.insertions;
        totals.deletions += result.totals.deletions;
        totals.net_lines += result.totals.net_lines;

        add_counts(&mut time.hourly, &result.time.hourly);
        add_counts(&mut time.weekday, &result.time.weekday);
        add_counts(&mut time.monthly, &result.time.monthly);
        punch_card.add(&result.punch_card);

        for (language, stat) in &result.languages {
            *language_counts.entry(language.clone()).or_insert(0) += stat.count;
        }
        add_points(&mut daily, &result.trends.daily);
        add_points(&mut monthly, &result.trends.monthly);

        digest.bug_fix_commits += result.digest.bug_fix_commits;
        digest.refactor_commits += result.digest.refactor_commits;
        digest.markdown_commits += result.digest.markdown_commits;
        for KeywordCount { word, count } in &result.digest.keyword_counts {
            add_keyword(&mut digest.keyword_counts, &mut keyword_index, word, *count);
        }
    }

    let active_dates: Vec<NaiveDate> = daily
        .keys()
        .filter_map(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .collect();

    let mut merged = AnalysisResult {
        totals,
        languages: with_percentages(language_counts),
        time,
        streaks: streak_stats(active_dates, ctx.today),
        projects: inputs
            .iter()
            .map(|input| project_summary(&input.identity, &input.result))
            .collect(),
        trends: CommitTrends {
            daily: series(daily),
            monthly: series(monthly),
        },
        punch_card,
        keywords: top_keywords(&digest.keyword_counts, TOP_KEYWORDS),
        digest,
        ..AnalysisResult::default()
    };

    merged.highlights = Highlights {
        first_commit: results().filter_map(|r| r.highlights.first_commit).min(),
        last_commit: results().filter_map(|r| r.highlights.last_commit).max(),
        ..peak_highlights(&merged)
    };

    classify(&mut merged, ctx.catalog);
    let snapshot = MetricSnapshot::from_result(&merged);
    merged
        .achievements
        .extend(unlocked_achievements(&snapshot, &ctx.catalog.milestones));

    let projects = merged.project_count();
    if projects >= MULTIVERSE_MIN_PROJECTS {
        merged.persona = PersonaKind::Multiverse { projects }.persona();
    }

    merged
}

fn add_counts<K: Ord + Clone>(into: &mut BTreeMap<K, u64>, from: &BTreeMap<K, u64>) {
    for (key, count) in from {
        *into.entry(key.clone()).or_insert(0) += count;
    }
}

fn add_points(into: &mut BTreeMap<String, u64>, points: &[TrendPoint]) {
    for point in points {
        *into.entry(point.date.clone()).or_insert(0) += point.count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_commits;
    use crate::catalog::Catalog;
    use crate::git::Commit;
    use chrono::{DateTime, Duration};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    fn commits_on(start: &str, days: i64, subject: &str, path: &str) -> Vec<Commit> {
        let start = DateTime::parse_from_rfc3339(start).unwrap();
        (0..days)
            .map(|i| Commit {
                hash: format!("{i:040x}"),
                timestamp: start + Duration::days(i),
                subject: subject.to_string(),
                author_name: "Jane Doe".to_string(),
                author_email: "jane@example.com".to_string(),
                files: vec![path.to_string()],
                insertions: 4,
                deletions: 1,
                language: String::new(),
            })
            .collect()
    }

    fn analysis(
        name: &str,
        commits: &[Commit],
        ctx: &AnalysisContext<'_>,
    ) -> RepositoryAnalysis {
        RepositoryAnalysis {
            identity: ProjectIdentity::new(name, format!("/src/{name}")),
            result: analyze_commits(commits, ctx),
        }
    }

    fn ids(result: &AnalysisResult) -> Vec<&str> {
        result.achievements.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn totals_sum_and_inactive_projects_are_counted() {
        let catalog = Catalog::embedded().unwrap();
        let ctx = AnalysisContext::new(&catalog, today());
        let inputs = [
            analysis("a", &commits_on("2024-01-01T10:00:00+00:00", 10, "work", "a.rs"), &ctx),
            analysis("b", &[], &ctx),
            analysis("c", &commits_on("2024-02-01T10:00:00+00:00", 5, "work", "c.go"), &ctx),
        ];

        let merged = merge_results(&inputs, &ctx);
        assert_eq!(merged.totals.commits, 15);
        assert_eq!(merged.totals.net_lines, 45);
        assert_eq!(merged.project_count(), 3);
        assert_eq!(merged.active_project_count(), 2);
        assert_eq!(merged.punch_card.total(), 15);
        assert!(!ids(&merged).contains(&"loyal"));
        assert_eq!(merged.languages["Rust"].percentage, 67);
        assert_eq!(merged.languages["Go"].percentage, 33);
    }

    #[test]
    fn single_active_project_is_loyal() {
        let catalog = Catalog::embedded().unwrap();
        let ctx = AnalysisContext::new(&catalog, today());
        let inputs = [analysis(
            "solo",
            &commits_on("2024-01-01T10:00:00+00:00", 3, "work", "main.py"),
            &ctx,
        )];

        let merged = merge_results(&inputs, &ctx);
        assert!(ids(&merged).contains(&"loyal"));
        assert_eq!(merged.projects[0].top_language.as_deref(), Some("Python"));
    }

    #[test]
    fn streaks_span_repositories() {
        let catalog = Catalog::embedded().unwrap();
        let ctx = AnalysisContext::new(&catalog, today());
        let inputs = [
            analysis("a", &commits_on("2024-03-11T10:00:00+00:00", 5, "a", "a.rs"), &ctx),
            analysis("b", &commits_on("2024-03-16T10:00:00+00:00", 5, "b", "b.rs"), &ctx),
        ];
        assert_eq!(inputs[0].result.streaks.longest, 5);
        assert_eq!(inputs[1].result.streaks.longest, 5);

        let merged = merge_results(&inputs, &ctx);
        assert_eq!(merged.streaks.longest, 10);
        assert_eq!(merged.streaks.current, 10);
        assert_eq!(merged.streaks.total_active_days, 10);
        assert!(ids(&merged).contains(&"week_streak"));
    }

    #[test]
    fn message_patterns_are_summed() {
        let catalog = Catalog::embedded().unwrap();
        let ctx = AnalysisContext::new(&catalog, today());
        let inputs = [
            analysis("a", &commits_on("2023-01-01T10:00:00+00:00", 20, "fix crash", "a.rs"), &ctx),
            analysis("b", &commits_on("2023-06-01T10:00:00+00:00", 11, "fix leak", "b.rs"), &ctx),
        ];
        assert!(!ids(&inputs[0].result).contains(&"bug_hunter"));

        let merged = merge_results(&inputs, &ctx);
        assert_eq!(merged.digest.bug_fix_commits, 31);
        assert!(ids(&merged).contains(&"bug_hunter"));
        assert_eq!(merged.keywords[0].word, "crash");
        assert_eq!(merged.keywords[0].count, 20);
    }

    #[test]
    fn many_projects_switch_persona() {
        let catalog = Catalog::embedded().unwrap();
        let ctx = AnalysisContext::new(&catalog, today());
        let inputs: Vec<_> = (0..6)
            .map(|i| {
                let commits = if i == 0 {
                    commits_on("2024-01-01T10:00:00+00:00", 2, "work", "x.rs")
                } else {
                    Vec::new()
                };
                analysis(&format!("p{i}"), &commits, &ctx)
            })
            .collect();

        let merged = merge_results(&inputs, &ctx);
        assert_eq!(merged.persona.title, "The Multiverse Developer");
        let ids = ids(&merged);
        assert!(ids.contains(&"projects_5"));
        assert!(ids.contains(&"focused"));
        assert!(!ids.contains(&"projects_10"));
    }

    #[test]
    fn empty_merge_is_baseline() {
        let catalog = Catalog::embedded().unwrap();
        let ctx = AnalysisContext::new(&catalog, today());
        let merged = merge_results(&[], &ctx);
        assert_eq!(merged.totals, Totals::default());
        assert!(merged.languages.is_empty());
        assert_eq!(merged.persona.title, "The Newcomer");
        assert!(merged.achievements.is_empty());
    }
}
