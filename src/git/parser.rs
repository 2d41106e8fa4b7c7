//! Reconstructs commits from `git log --numstat` text.
//!
//! The stream carries no explicit record separator. Each record is a
//! five-line header ([`HEADER_LINES`]) followed by optional blank lines and
//! tab-separated `insertions\tdeletions\tpath` stat lines. A new record starts
//! when a stat-section line looks like a bare object id; that sniff lives in
//! [`is_record_boundary`] so it can be replaced independently.
//!
//! [`LogParser`] is an explicit two-state machine over a pending record:
//!
//! - [`ParseState::Meta`] collects header lines and moves to `Stats` after
//!   the fifth. Blank lines before the object id are skipped; after it every
//!   line is positional, so an empty subject stays an empty subject.
//! - [`ParseState::Stats`] accumulates stat lines, ignores blank and
//!   malformed lines, and on a boundary line finalizes the pending record and
//!   restarts `Meta` on that same line.
//!
//! Malformed input never aborts parsing. A trailing header with fewer than
//! five lines is discarded, and a record whose date is not RFC 3339 is
//! dropped and counted in [`LogParser::dropped_commits`].
//!
//! Stat paths are normalized by [`parse_numstat_line`]: C-quoted paths are
//! unquoted and `{old => new}` rename notation resolves to the new path.

use chrono::DateTime;
use tracing::{debug, warn};

use crate::analysis::LanguageClassifier;
use crate::git::{Commit, COMMIT_ID_LENGTHS, HEADER_LINES};

/// Parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Reading the five header lines of a record.
    Meta,
    /// Reading stat lines of the current record.
    Stats,
}

/// One `insertions\tdeletions\tpath` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumstatLine {
    /// Lines added; zero for binary files.
    pub insertions: u64,
    /// Lines removed; zero for binary files.
    pub deletions: u64,
    /// Destination path, unquoted.
    pub path: String,
}

#[derive(Debug, Default)]
struct PendingCommit {
    header: Vec<String>,
    files: Vec<String>,
    insertions: u64,
    deletions: u64,
}

/// Streaming parser for `git log --numstat` output.
#[derive(Debug)]
pub struct LogParser<'a> {
    classifier: LanguageClassifier<'a>,
    state: ParseState,
    pending: PendingCommit,
    commits: Vec<Commit>,
    dropped: usize,
}

impl<'a> LogParser<'a> {
    /// Creates a parser in the `Meta` state with nothing pending.
    pub fn new(classifier: LanguageClassifier<'a>) -> Self {
        Self {
            classifier,
            state: ParseState::Meta,
            pending: PendingCommit::default(),
            commits: Vec::new(),
            dropped: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Header lines collected for the pending record.
    pub fn pending_header_len(&self) -> usize {
        self.pending.header.len()
    }

    /// Commits finalized so far.
    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    /// Complete records dropped because their date did not parse.
    pub fn dropped_commits(&self) -> usize {
        self.dropped
    }

    /// Feeds one line (without its terminator).
    pub fn feed_line(&mut self, line: &str) {
        match self.state {
            ParseState::Meta => self.feed_meta(line),
            ParseState::Stats => self.feed_stats(line),
        }
    }

    /// Finalizes any pending record and returns all commits in input order.
    pub fn finish(mut self) -> Vec<Commit> {
        match self.state {
            ParseState::Stats => self.finalize_pending(),
            ParseState::Meta if !self.pending.header.is_empty() => {
                debug!(
                    lines = self.pending.header.len(),
                    "Discarding truncated commit header"
                );
            }
            ParseState::Meta => {}
        }
        if self.dropped > 0 {
            warn!(dropped = self.dropped, "Commits dropped for unparseable dates");
        }
        self.commits
    }

    fn feed_meta(&mut self, line: &str) {
        if self.pending.header.is_empty() && line.trim().is_empty() {
            return;
        }

        self.pending.header.push(line.trim_end().to_string());
        if self.pending.header.len() == HEADER_LINES {
            self.state = ParseState::Stats;
        }
    }

    fn feed_stats(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }

        if is_record_boundary(line) {
            self.finalize_pending();
            self.state = ParseState::Meta;
            self.feed_meta(line);
            return;
        }

        match parse_numstat_line(line) {
            Some(stat) => {
                self.pending.insertions += stat.insertions;
                self.pending.deletions += stat.deletions;
                self.pending.files.push(stat.path);
            }
            None => debug!(line, "Skipping malformed stat line"),
        }
    }

    fn finalize_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let mut header = pending.header.into_iter();
        let (Some(hash), Some(date), Some(subject), Some(author_name), Some(author_email)) = (
            header.next(),
            header.next(),
            header.next(),
            header.next(),
            header.next(),
        ) else {
            return;
        };

        let timestamp = match DateTime::parse_from_rfc3339(date.trim()) {
            Ok(timestamp) => timestamp,
            Err(e) => {
                warn!(hash = %hash, date = %date, "Dropping commit with unparseable date: {e}");
                self.dropped += 1;
                return;
            }
        };

        let language = self.classifier.dominant_language(&pending.files);
        self.commits.push(Commit {
            hash: hash.trim().to_string(),
            timestamp,
            subject,
            author_name,
            author_email,
            files: pending.files,
            insertions: pending.insertions,
            deletions: pending.deletions,
            language,
        });
    }
}

/// Parses complete log text into commits, preserving input order.
pub fn parse_log(raw: &str, classifier: LanguageClassifier<'_>) -> Vec<Commit> {
    let mut parser = LogParser::new(classifier);
    for line in raw.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

/// Returns true when a stat-section line starts a new record.
///
/// Heuristic: a tab-free token made only of hex digits with the length of a
/// full object id.
pub fn is_record_boundary(line: &str) -> bool {
    if line.contains('\t') {
        return false;
    }
    let token = line.trim();
    COMMIT_ID_LENGTHS.contains(&token.len()) && token.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parses an `insertions\tdeletions\tpath` line.
///
/// Non-numeric counts (`-` for binary files) become zero. Lines without
/// exactly three fields or with an empty path yield `None`. The path is
/// unquoted and renames resolve to their destination.
pub fn parse_numstat_line(line: &str) -> Option<NumstatLine> {
    let mut fields = line.splitn(3, '\t');
    let insertions = fields.next()?;
    let deletions = fields.next()?;
    let path = fields.next()?.trim();
    if path.is_empty() {
        return None;
    }

    Some(NumstatLine {
        insertions: insertions.trim().parse().unwrap_or(0),
        deletions: deletions.trim().parse().unwrap_or(0),
        path: rename_destination(&unquote_path(path)),
    })
}

/// Resolves `dir/{old => new}/file` and `old => new` to the new path.
pub fn rename_destination(path: &str) -> String {
    if let (Some(open), Some(close)) = (path.find('{'), path.rfind('}')) {
        if open < close {
            if let Some((_, new)) = path[open + 1..close].split_once(" => ") {
                let joined = format!("{}{}{}", &path[..open], new, &path[close + 1..]);
                return joined.replace("//", "/");
            }
        }
    }

    match path.split_once(" => ") {
        Some((_, new)) => new.to_string(),
        None => path.to_string(),
    }
}

/// Undoes git's C-style quoting of paths with special or non-ASCII bytes.
///
/// Unquoted input is returned unchanged. Octal escapes are collected as raw
/// bytes and decoded as UTF-8 together.
pub fn unquote_path(path: &str) -> String {
    let Some(inner) = path
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return path.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('a') => bytes.push(0x07),
            Some('b') => bytes.push(0x08),
            Some('f') => bytes.push(0x0c),
            Some('n') => bytes.push(b'\n'),
            Some('r') => bytes.push(b'\r'),
            Some('t') => bytes.push(b'\t'),
            Some('v') => bytes.push(0x0b),
            Some(d @ '0'..='7') => {
                let mut value = d as u32 - '0' as u32;
                for _ in 0..2 {
                    match chars.peek() {
                        Some(&o @ '0'..='7') => {
                            value = value * 8 + (o as u32 - '0' as u32);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                bytes.push((value & 0xff) as u8);
            }
            Some(other) => {
                let mut buf = [0; 4];
                bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
            None => bytes.push(b'\\'),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
