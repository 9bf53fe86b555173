//! Field splitting shared by header and data lines.
//!
//! The delimiter is a regular expression, compiled once when the layout is
//! bound. Splitting follows the conventions of the tables this crate reads:
//! - No quoting: every match of the pattern separates two fields
//! - Trailing empty fields are discarded
//! - A zero-width match at the start of the line does not produce a leading empty field
//! - A line with no match at all (including an empty line) is a single field
//!
//! The second rule means a line made only of delimiters yields no fields at
//! all, which the decoder reports as a degenerate line.
//!
//! # Examples
//!
//! ```
//! use locatable_xsv::formats::primitives::fields::split_fields;
//! use regex::Regex;
//!
//! let tab = Regex::new("\t")?;
//! assert_eq!(split_fields("chr1\t100\t200", &tab), vec!["chr1", "100", "200"]);
//! assert_eq!(split_fields("chr1\t100\t200\t\t", &tab), vec!["chr1", "100", "200"]);
//! assert_eq!(split_fields("\t\t", &tab), Vec::<String>::new());
//!
//! let blanks = Regex::new(r"\s+")?;
//! assert_eq!(split_fields("chr1   100  200", &blanks), vec!["chr1", "100", "200"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use regex::Regex;

/// Prefix marking a comment line.
pub const COMMENT_PREFIX: &str = "#";

/// Returns `true` if `line` is a comment line.
#[inline]
pub fn is_comment(line: &str) -> bool {
    line.starts_with(COMMENT_PREFIX)
}

/// Splits `line` on every match of `pattern`.
///
/// Trailing empty fields are removed. A line without any match produces one
/// field holding the whole line.
pub fn split_fields(line: &str, pattern: &Regex) -> Vec<String> {
    let mut fields = Vec::new();
    let mut index = 0;
    let mut matched = false;

    for m in pattern.find_iter(line) {
        // No leading empty field for a zero-width match at the start
        if m.start() == 0 && m.end() == 0 {
            continue;
        }
        fields.push(line[index..m.start()].to_string());
        index = m.end();
        matched = true;
    }

    if !matched {
        return vec![line.to_string()];
    }

    fields.push(line[index..].to_string());
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}
