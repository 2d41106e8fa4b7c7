//! Parsed commit records

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

/// One commit reconstructed from `git log --numstat` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Full object id of the commit
    pub hash: String,
    /// Author date with the author's own UTC offset
    pub timestamp: DateTime<FixedOffset>,
    /// First line of the commit message
    pub subject: String,
    /// Author name
    pub author_name: String,
    /// Author email address
    pub author_email: String,
    /// Changed file paths in the order git listed them
    pub files: Vec<String>,
    /// Lines added across all files (binary files count as zero)
    pub insertions: u64,
    /// Lines removed across all files (binary files count as zero)
    pub deletions: u64,
    /// Dominant language inferred from the changed files
    pub language: String,
}

impl Commit {
    /// Insertions minus deletions.
    pub fn net_lines(&self) -> i64 {
        self.insertions as i64 - self.deletions as i64
    }

    /// Insertions plus deletions.
    pub fn lines_changed(&self) -> u64 {
        self.insertions + self.deletions
    }

    /// Calendar date in the author's timezone.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Hour of day (0-23) in the author's timezone.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Day of week with Sunday as 0.
    pub fn weekday(&self) -> u32 {
        self.timestamp.weekday().num_days_from_sunday()
    }

    /// Month key in `YYYY-MM` form.
    pub fn month_key(&self) -> String {
        self.timestamp.format("%Y-%m").to_string()
    }
}
