//! Aggregation of parsed commits into an [`AnalysisResult`].

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::analysis::achievements::{unlocked_achievements, MetricSnapshot};
use crate::analysis::persona::{classify_persona, PersonaInputs};
use crate::analysis::{AnalysisContext, LanguageClassifier};
use crate::catalog::Catalog;
use crate::data::{
    ActivityDigest, AnalysisResult, CommitTrends, Highlights, KeywordCount, LanguageStat,
    PunchCard, StreakStats, TimeStats, Totals, TrendPoint, TOP_KEYWORDS,
};
use crate::git::Commit;

/// Characters removed from subjects before keyword tokenization.
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Computes every statistic for a commit sequence.
///
/// An empty sequence yields zeroed totals, empty maps and series, and the
/// baseline persona; it never fails.
pub fn analyze_commits(commits: &[Commit], ctx: &AnalysisContext<'_>) -> AnalysisResult {
    let classifier = ctx.classifier();
    let keyword_counts = count_keywords(commits.iter().map(|c| c.subject.as_str()), ctx.catalog);

    let mut result = AnalysisResult {
        totals: totals(commits),
        languages: language_stats(commits, classifier),
        time: time_stats(commits),
        streaks: streak_stats(commits.iter().map(Commit::date), ctx.today),
        projects: Vec::new(),
        trends: commit_trends(commits),
        punch_card: punch_card(commits),
        keywords: top_keywords(&keyword_counts, TOP_KEYWORDS),
        digest: ActivityDigest {
            keyword_counts,
            bug_fix_commits: count_matching(commits, |c| {
                ctx.catalog.is_bug_fix_subject(&c.subject)
            }),
            refactor_commits: count_matching(commits, |c| {
                ctx.catalog.is_refactor_subject(&c.subject)
            }),
            markdown_commits: count_matching(commits, |c| touches_markdown(c, ctx.catalog)),
        },
        ..AnalysisResult::default()
    };

    result.highlights = Highlights {
        first_commit: commits.iter().map(|c| c.timestamp).min(),
        last_commit: commits.iter().map(|c| c.timestamp).max(),
        ..peak_highlights(&result)
    };
    classify(&mut result, ctx.catalog);
    result
}

/// Evaluates achievements and persona from a result's aggregates.
pub(crate) fn classify(result: &mut AnalysisResult, catalog: &Catalog) {
    let snapshot = MetricSnapshot::from_result(result);
    result.achievements = unlocked_achievements(&snapshot, &catalog.achievements);
    result.persona = classify_persona(&PersonaInputs::from_result(result)).persona();
}

fn totals(commits: &[Commit]) -> Totals {
    let insertions: u64 = commits.iter().map(|c| c.insertions).sum();
    let deletions: u64 = commits.iter().map(|c| c.deletions).sum();
    Totals {
        commits: commits.len() as u64,
        insertions,
        deletions,
        net_lines: insertions as i64 - deletions as i64,
    }
}

fn language_stats(
    commits: &[Commit],
    classifier: LanguageClassifier<'_>,
) -> BTreeMap<String, LanguageStat> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for file in commits.iter().flat_map(|c| &c.files) {
        *counts
            .entry(classifier.language_of(file).to_string())
            .or_insert(0) += 1;
    }
    with_percentages(counts)
}

/// Converts per-language file counts into counts with rounded percentages.
///
/// Returns an empty map when no file was classified.
pub(crate) fn with_percentages(counts: BTreeMap<String, u64>) -> BTreeMap<String, LanguageStat> {
    let total: u64 = counts.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }

    counts
        .into_iter()
        .map(|(language, count)| {
            let percentage = (count as f64 / total as f64 * 100.0).round() as u32;
            (language, LanguageStat { count, percentage })
        })
        .collect()
}

fn time_stats(commits: &[Commit]) -> TimeStats {
    let mut time = TimeStats::default();
    for commit in commits {
        *time.hourly.entry(commit.hour()).or_insert(0) += 1;
        *time.weekday.entry(commit.weekday()).or_insert(0) += 1;
        *time.monthly.entry(commit.month_key()).or_insert(0) += 1;
    }
    time
}

/// Computes streaks from active dates.
///
/// The longest streak is the longest run of dates one day apart. The current
/// streak walks backward from `today` and is zero when `today` is inactive.
pub fn streak_stats<I>(dates: I, today: NaiveDate) -> StreakStats
where
    I: IntoIterator<Item = NaiveDate>,
{
    let active: BTreeSet<NaiveDate> = dates.into_iter().collect();
    if active.is_empty() {
        return StreakStats::default();
    }

    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for &date in &active {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(date) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }

    let mut current = 0;
    let mut day = Some(today);
    while let Some(d) = day.filter(|d| active.contains(d)) {
        current += 1;
        day = d.pred_opt();
    }

    StreakStats {
        longest,
        current,
        total_active_days: active.len() as u32,
    }
}

fn commit_trends(commits: &[Commit]) -> CommitTrends {
    let mut daily: BTreeMap<String, u64> = BTreeMap::new();
    let mut monthly: BTreeMap<String, u64> = BTreeMap::new();
    for commit in commits {
        *daily
            .entry(commit.date().format("%Y-%m-%d").to_string())
            .or_insert(0) += 1;
        *monthly.entry(commit.month_key()).or_insert(0) += 1;
    }
    CommitTrends {
        daily: series(daily),
        monthly: series(monthly),
    }
}

/// Turns keyed counts into an ascending series.
pub(crate) fn series(counts: BTreeMap<String, u64>) -> Vec<TrendPoint> {
    counts
        .into_iter()
        .map(|(date, count)| TrendPoint { date, count })
        .collect()
}

fn punch_card(commits: &[Commit]) -> PunchCard {
    let mut card = PunchCard::default();
    for commit in commits {
        card.record(commit.weekday(), commit.hour());
    }
    card
}

/// Counts subject keywords in first-seen order.
///
/// Subjects are lower-cased and stripped of punctuation; tokens of two
/// characters or fewer and catalogue stop words are dropped.
pub fn count_keywords<'s, I>(subjects: I, catalog: &Catalog) -> Vec<KeywordCount>
where
    I: IntoIterator<Item = &'s str>,
{
    let mut counts: Vec<KeywordCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for subject in subjects {
        let lowered = subject.to_lowercase();
        let cleaned = PUNCTUATION.replace_all(&lowered, "");
        for word in cleaned.split_whitespace() {
            if word.chars().count() <= 2 || catalog.is_stop_word(word) {
                continue;
            }
            add_keyword(&mut counts, &mut index, word, 1);
        }
    }

    counts
}

/// Adds `count` occurrences of `word`, appending it when first seen.
pub(crate) fn add_keyword(
    counts: &mut Vec<KeywordCount>,
    index: &mut HashMap<String, usize>,
    word: &str,
    count: u64,
) {
    match index.get(word) {
        Some(&i) => counts[i].count += count,
        None => {
            index.insert(word.to_string(), counts.len());
            counts.push(KeywordCount {
                word: word.to_string(),
                count,
            });
        }
    }
}

/// Ranks keywords by count, keeping first-seen order among equals.
pub fn top_keywords(counts: &[KeywordCount], limit: usize) -> Vec<KeywordCount> {
    let mut ranked = counts.to_vec();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

fn touches_markdown(commit: &Commit, catalog: &Catalog) -> bool {
    commit.files.iter().any(|file| {
        LanguageClassifier::lookup_key(file).is_some_and(|key| catalog.is_markdown_key(&key))
    })
}

fn count_matching(commits: &[Commit], predicate: impl Fn(&Commit) -> bool) -> u64 {
    commits.iter().filter(|&c| predicate(c)).count() as u64
}

/// Busiest day, peak hour and peak weekday from a result's tables.
pub(crate) fn peak_highlights(result: &AnalysisResult) -> Highlights {
    let mut busiest_day: Option<&TrendPoint> = None;
    for point in &result.trends.daily {
        if busiest_day.map_or(true, |best| point.count > best.count) {
            busiest_day = Some(point);
        }
    }

    Highlights {
        busiest_day: busiest_day.cloned(),
        peak_hour: peak_key(&result.time.hourly),
        peak_weekday: peak_key(&result.time.weekday),
        ..Highlights::default()
    }
}

fn peak_key(counts: &BTreeMap<u32, u64>) -> Option<u32> {
    let mut best: Option<(u32, u64)> = None;
    for (&key, &count) in counts {
        if count > 0 && best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((key, count));
        }
    }
    best.map(|(key, _)| key)
}
