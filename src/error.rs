//! Error types for locatable-xsv

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for locatable-xsv operations
pub type Result<T> = std::result::Result<T, XsvError>;

/// Error types that can occur while configuring against or decoding an XSV table
///
/// A file that simply is not an XSV locatable table (no sidecar, unreadable data
/// file) is not an error: the resolver reports it as "not decodable" instead.
/// Every variant here is terminal for the current decode session.
#[derive(Debug, Error)]
pub enum XsvError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Sidecar configuration text could not be read as key/value pairs
    #[error("Malformed configuration file {path} at line {line}: {msg}")]
    ConfigSyntax {
        /// Configuration file path
        path: PathBuf,
        /// Line number where the problem occurred
        line: usize,
        /// Error message
        msg: String,
    },

    /// A required configuration key is absent
    #[error("Configuration file {path} is missing required key '{key}'")]
    MissingConfigKey {
        /// Configuration file path
        path: PathBuf,
        /// Missing key
        key: &'static str,
    },

    /// A configuration key holds an unusable value
    #[error("Configuration file {path} has invalid value '{value}' for key '{key}': {reason}")]
    InvalidConfigValue {
        /// Configuration file path
        path: PathBuf,
        /// Offending key
        key: &'static str,
        /// Raw value
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// A layout was built with an empty delimiter
    #[error("Delimiter must be a non-empty string")]
    EmptyDelimiter,

    /// A delimiter that does not compile as a split pattern
    #[error("Delimiter '{delimiter}' is not a valid pattern: {reason}")]
    InvalidDelimiter {
        /// Delimiter text
        delimiter: String,
        /// Compilation failure
        reason: String,
    },

    /// The line source ran out before a non-comment header line was found
    #[error("Given file is malformed - does not contain a header (read {line} lines)")]
    MissingHeader {
        /// Number of lines consumed before exhaustion
        line: u64,
    },

    /// A data line split into zero fields
    #[error("XSV file has a line with no delimiter at line number: {line}")]
    NoFields {
        /// Line number where error occurred
        line: u64,
    },

    /// Field count disagrees with the header under the strict policy
    #[error("Line {line} has {actual} fields but the header has {expected}")]
    FieldCount {
        /// Header length
        expected: usize,
        /// Fields found on the line
        actual: usize,
        /// Line number where error occurred
        line: u64,
    },

    /// A coordinate column index does not address a header column
    #[error("Column index {index} for '{key}' is out of range for a header of {width} columns")]
    ColumnOutOfRange {
        /// Layout key (`contig`, `start` or `end`)
        key: &'static str,
        /// Configured column index
        index: usize,
        /// Header width
        width: usize,
    },

    /// A coordinate field does not hold a valid position
    #[error("Invalid {key} coordinate in column '{column}' at line {line}: '{value}' ({reason})")]
    InvalidCoordinate {
        /// Layout key (`start` or `end`)
        key: &'static str,
        /// Header name of the column
        column: String,
        /// Raw field value
        value: String,
        /// Line number of the record
        line: u64,
        /// Parse failure
        reason: String,
    },

    /// Start lies after end
    #[error("Invalid locus: start {start} > end {end}")]
    InvalidLocus {
        /// Start position
        start: u64,
        /// End position
        end: u64,
    },

    /// Named field lookup on a column absent from the header
    #[error("No such field in header: '{0}'")]
    NoSuchField(String),

    /// Session operation called out of order
    #[error("Invalid decoder state: {0}")]
    InvalidState(String),
}
