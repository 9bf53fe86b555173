//! Header capture for XSV tables.
//!
//! A table opens with any number of `#` comment lines followed by exactly one
//! header line naming the columns. Capture is tracked by [`HeaderState`]:
//!
//! ```text
//! SkippingLeadingComments --content--> HeaderCaptured --any--> DecodingData
//!          |  ^                                                  |  ^
//!          +--+ comment                                          +--+ any
//! ```
//!
//! Comments after the header are allowed and are skipped by the decoder.

use crate::formats::primitives::fields::{is_comment, split_fields};
use regex::Regex;
use std::collections::HashMap;

/// What a raw line is, as far as header capture cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Line starting with `#`
    Comment,
    /// Any other line
    Content,
}

impl LineKind {
    /// Classifies a raw line.
    #[inline]
    pub fn of(line: &str) -> Self {
        if is_comment(line) {
            LineKind::Comment
        } else {
            LineKind::Content
        }
    }
}

/// Progress through the start of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderState {
    /// Reading leading comment lines; no header yet.
    #[default]
    SkippingLeadingComments,
    /// The header line has been consumed; no data line yet.
    HeaderCaptured,
    /// At least one line after the header has been consumed.
    DecodingData,
}

impl HeaderState {
    /// Next state after consuming a line of `kind`.
    ///
    /// # Examples
    ///
    /// ```
    /// use locatable_xsv::formats::xsv::{HeaderState, LineKind};
    ///
    /// let state = HeaderState::SkippingLeadingComments;
    /// assert_eq!(state.advance(LineKind::Comment), HeaderState::SkippingLeadingComments);
    /// assert_eq!(state.advance(LineKind::Content), HeaderState::HeaderCaptured);
    /// ```
    pub fn advance(self, kind: LineKind) -> Self {
        match (self, kind) {
            (HeaderState::SkippingLeadingComments, LineKind::Comment) => {
                HeaderState::SkippingLeadingComments
            }
            (HeaderState::SkippingLeadingComments, LineKind::Content) => {
                HeaderState::HeaderCaptured
            }
            (HeaderState::HeaderCaptured, _) | (HeaderState::DecodingData, _) => {
                HeaderState::DecodingData
            }
        }
    }

    /// Returns `true` once the header is known.
    pub fn has_header(self) -> bool {
        !matches!(self, HeaderState::SkippingLeadingComments)
    }
}

/// Ordered column names of a table.
///
/// Names are not required to be unique; lookup by name returns the first
/// column carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Header {
    /// Creates a header from column names.
    pub fn new(columns: Vec<String>) -> Self {
        let mut positions = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            positions.entry(name.clone()).or_insert(i);
        }
        Header { columns, positions }
    }

    /// Splits a header line on the delimiter `pattern`.
    pub fn from_line(line: &str, pattern: &Regex) -> Self {
        Self::new(split_fields(line, pattern))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the header has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Name of the column at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }

    /// Position of the first column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Iterates over column names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }
}
