//! Library error type.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors; anything recoverable is a [`Warning`](crate::Warning) instead.
#[derive(Error, Debug)]
pub enum Error {
    /// A non-blank line has fewer tab-separated columns than required
    #[error("Malformed record on line {line}: found {found} fields, expected at least {expected}")]
    MalformedRecord {
        /// 1-based line number
        line: usize,
        /// Columns present
        found: usize,
        /// Columns required
        expected: usize,
    },

    /// An event cannot be written as valid ICS
    #[error("ICS serialization failed: {0}")]
    Serialization(String),

    /// Reading the input or writing the output failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A JSON table could not be read
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A date in a table could not be parsed
    #[error("Date/time parsing failed: {0}")]
    DateTime(#[from] chrono::ParseError),

    /// The semester table has no window for the requested term
    #[error("No semester window for {year} term {term} (known terms: {known})")]
    SemesterNotFound {
        /// Requested academic year
        year: i32,
        /// Requested term
        term: u32,
        /// Terms the table does cover, e.g. `2019-1, 2019-2`
        known: String,
    },

    /// A local class time has no single UTC instant
    #[error("Local time {0} does not exist or is ambiguous in the campus time zone")]
    Timezone(String),

    /// A table entry is invalid
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for this crate
pub type Result<T> = std::result::Result<T, Error>;
