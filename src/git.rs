//! Git log collection and parsing.

pub mod commit;
pub mod error;
pub mod log;
pub mod parser;
pub mod repository;

pub use commit::Commit;
pub use error::LogFetchError;
pub use log::{GitLogRunner, LogFilter, LogSource};
pub use parser::{is_record_boundary, parse_log, LogParser, ParseState};
pub use repository::{check_git_repository, repository_name};

/// Hex lengths of object ids treated as record boundaries (SHA-1 and SHA-256).
pub const COMMIT_ID_LENGTHS: [usize; 2] = [40, 64];

/// Number of header lines emitted per commit by [`log::LOG_FORMAT`].
pub const HEADER_LINES: usize = 5;
