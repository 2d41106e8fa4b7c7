//! # gitpulse
//!
//! Turns raw `git log --numstat` history into contributor activity
//! statistics: totals, language mix, time patterns, streaks, trends, punch
//! card, subject keywords, achievements and a persona.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use gitpulse::analysis::{analyze_commits, AnalysisContext, LanguageClassifier};
//! use gitpulse::catalog::Catalog;
//! use gitpulse::git::parse_log;
//!
//! let catalog = Catalog::embedded().unwrap();
//! let raw = "0123456789abcdef0123456789abcdef01234567\n\
//!            2024-03-01T10:00:00+00:00\n\
//!            Add parser\n\
//!            Jane Doe\n\
//!            jane@example.com\n\
//!            \n\
//!            3\t1\tsrc/main.rs\n";
//!
//! let commits = parse_log(raw, LanguageClassifier::new(&catalog));
//! let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let result = analyze_commits(&commits, &AnalysisContext::new(&catalog, today));
//! assert_eq!(result.totals.commits, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod catalog;
pub mod cli;
pub mod data;
pub mod git;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of gitpulse.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
