//! Sidecar configuration for XSV locatable tables.
//!
//! A data file `sample.tsv` is decodable only when a sibling `sample.config`
//! exists next to it. The sidecar is a properties file declaring how to split
//! the data and which columns hold the locus:
//!
//! ```text
//! # sample.config
//! contig = 0
//! start = 1
//! end = 2
//! delimiter = \t
//! ```
//!
//! Separators may be `=`, `:` or whitespace. Lines whose first non-blank
//! character is `#` or `!` are comments, a trailing backslash continues a
//! value on the next line, and the escapes `\t`, `\n`, `\r`, `\f`, `\\` and
//! `\uXXXX` are recognised. When a key repeats, the last value wins.
//!
//! # Resolution outcomes
//!
//! - `Ok(None)`: not an XSV locatable table (no sidecar, unreadable, directory)
//! - `Ok(Some(layout))`: layout bound
//! - `Err(..)`: the sidecar exists but is malformed

use crate::error::{Result, XsvError};
use log::{debug, warn};
use regex::Regex;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Extension of the sidecar configuration file.
pub const CONFIG_FILE_EXTENSION: &str = "config";

/// Configuration key for the contig column.
pub const CONTIG_KEY: &str = "contig";
/// Configuration key for the start column.
pub const START_KEY: &str = "start";
/// Configuration key for the end column.
pub const END_KEY: &str = "end";
/// Configuration key for the field delimiter.
pub const DELIMITER_KEY: &str = "delimiter";

/// How to split a data file and where its locus lives.
///
/// The delimiter is a regular expression, compiled when the layout is bound.
/// Column indices are 0-based. `start_column` and `end_column` may be the
/// same column for single-base loci. Once bound a layout never changes.
///
/// Two layouts are equal when their delimiter text and columns are equal.
///
/// # Examples
///
/// ```
/// use locatable_xsv::formats::xsv::LocatableLayout;
/// use std::path::Path;
///
/// let layout = LocatableLayout::parse(
///     "contig=0\nstart=1\nend=1\ndelimiter=,\n",
///     Path::new("variants.config"),
/// )?;
/// assert_eq!(layout.delimiter(), ",");
/// assert_eq!(layout.start_column(), layout.end_column());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct LocatableLayout {
    delimiter: String,
    pattern: Regex,
    contig_column: usize,
    start_column: usize,
    end_column: usize,
}

impl LocatableLayout {
    /// Creates a layout directly from its parts.
    ///
    /// # Errors
    ///
    /// - [`XsvError::EmptyDelimiter`] if `delimiter` is empty
    /// - [`XsvError::InvalidDelimiter`] if `delimiter` is not a valid pattern
    pub fn new(
        delimiter: impl Into<String>,
        contig_column: usize,
        start_column: usize,
        end_column: usize,
    ) -> Result<Self> {
        let delimiter = delimiter.into();
        let pattern = compile_delimiter(&delimiter)?;

        if contig_column == start_column || contig_column == end_column {
            warn!(
                "Contig column {} is also used as a coordinate column (start {}, end {})",
                contig_column, start_column, end_column
            );
        }

        Ok(LocatableLayout {
            delimiter,
            pattern,
            contig_column,
            start_column,
            end_column,
        })
    }

    /// Reads and binds the layout declared in a sidecar file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::parse(&text, path)
    }

    /// Binds a layout from sidecar text. `origin` is only used in error messages.
    ///
    /// # Errors
    ///
    /// - [`XsvError::ConfigSyntax`] for a malformed `\u` escape
    /// - [`XsvError::MissingConfigKey`] when a required key is absent
    /// - [`XsvError::InvalidConfigValue`] for a non-numeric index, or a
    ///   delimiter that is empty or does not compile as a pattern
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let properties = parse_properties(text, origin)?;

        let contig_column = column_index(&properties, CONTIG_KEY, origin)?;
        let start_column = column_index(&properties, START_KEY, origin)?;
        let end_column = column_index(&properties, END_KEY, origin)?;

        let delimiter = required(&properties, DELIMITER_KEY, origin)?;
        Self::new(delimiter.as_str(), contig_column, start_column, end_column).map_err(|e| {
            match e {
                XsvError::EmptyDelimiter | XsvError::InvalidDelimiter { .. } => {
                    XsvError::InvalidConfigValue {
                        path: origin.to_path_buf(),
                        key: DELIMITER_KEY,
                        value: delimiter.clone(),
                        reason: e.to_string(),
                    }
                }
                other => other,
            }
        })
    }

    /// Field delimiter, as written in the configuration.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Compiled delimiter pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Column holding the contig name.
    pub fn contig_column(&self) -> usize {
        self.contig_column
    }

    /// Column holding the start coordinate.
    pub fn start_column(&self) -> usize {
        self.start_column
    }

    /// Column holding the end coordinate.
    pub fn end_column(&self) -> usize {
        self.end_column
    }

    /// Checks every coordinate column against a header of `width` columns.
    ///
    /// # Errors
    ///
    /// Returns [`XsvError::ColumnOutOfRange`] for the first column past the end.
    pub fn check_width(&self, width: usize) -> Result<()> {
        for (key, index) in [
            (CONTIG_KEY, self.contig_column),
            (START_KEY, self.start_column),
            (END_KEY, self.end_column),
        ] {
            if index >= width {
                return Err(XsvError::ColumnOutOfRange { key, index, width });
            }
        }
        Ok(())
    }
}

impl PartialEq for LocatableLayout {
    fn eq(&self, other: &Self) -> bool {
        self.delimiter == other.delimiter
            && self.contig_column == other.contig_column
            && self.start_column == other.start_column
            && self.end_column == other.end_column
    }
}

impl Eq for LocatableLayout {}

fn compile_delimiter(delimiter: &str) -> Result<Regex> {
    if delimiter.is_empty() {
        return Err(XsvError::EmptyDelimiter);
    }
    Regex::new(delimiter).map_err(|e| XsvError::InvalidDelimiter {
        delimiter: delimiter.to_string(),
        reason: e.to_string(),
    })
}

/// Path of the sidecar configuration for `data_path`.
///
/// The last extension is replaced (`a.tsv.gz` → `a.tsv.config`); a path with
/// no extension gains one.
pub fn config_path_for(data_path: impl AsRef<Path>) -> PathBuf {
    data_path.as_ref().with_extension(CONFIG_FILE_EXTENSION)
}

/// Resolves the layout for a data file.
///
/// Validation short-circuits in order: data file, sidecar file, sidecar
/// content. Only the last step can fail with an error.
///
/// # Errors
///
/// Returns an error if the sidecar exists but cannot be bound.
pub fn resolve_layout(data_path: impl AsRef<Path>) -> Result<Option<LocatableLayout>> {
    let data_path = data_path.as_ref();

    if !is_readable_file(data_path) {
        debug!("{} is not a readable file", data_path.display());
        return Ok(None);
    }

    let config_path = config_path_for(data_path);
    if !is_config_path(&config_path) || !is_readable_file(&config_path) {
        debug!(
            "No readable configuration {} for {}",
            config_path.display(),
            data_path.display()
        );
        return Ok(None);
    }

    let layout = LocatableLayout::from_config_file(&config_path)?;
    debug!("Bound layout from {}: {:?}", config_path.display(), layout);
    Ok(Some(layout))
}

/// Returns `true` if `path` exists, is not a directory and can be opened.
pub fn is_readable_file(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) if !meta.is_dir() => File::open(path).is_ok(),
        _ => false,
    }
}

/// Returns `true` if `path` is named like a sidecar configuration file.
pub fn is_config_path(path: &Path) -> bool {
    path.file_stem().is_some()
        && path.extension().and_then(|e| e.to_str()) == Some(CONFIG_FILE_EXTENSION)
}

fn required<'a>(
    properties: &'a HashMap<String, String>,
    key: &'static str,
    origin: &Path,
) -> Result<&'a String> {
    properties.get(key).ok_or_else(|| XsvError::MissingConfigKey {
        path: origin.to_path_buf(),
        key,
    })
}

fn column_index(
    properties: &HashMap<String, String>,
    key: &'static str,
    origin: &Path,
) -> Result<usize> {
    let raw = required(properties, key, origin)?;
    raw.trim()
        .parse::<usize>()
        .map_err(|e| XsvError::InvalidConfigValue {
            path: origin.to_path_buf(),
            key,
            value: raw.clone(),
            reason: format!("expected a non-negative column index ({})", e),
        })
}

/// Parses properties text into a key/value map.
///
/// # Errors
///
/// Returns [`XsvError::ConfigSyntax`] for a malformed `\uXXXX` escape.
pub fn parse_properties(text: &str, origin: &Path) -> Result<HashMap<String, String>> {
    let mut properties = HashMap::new();
    let mut lines = text.lines().enumerate();

    while let Some((index, line)) = lines.next() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let line_number = index + 1;
        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_key_value(&logical);
        let key = unescape(key, origin, line_number)?;
        let value = unescape(value, origin, line_number)?;
        properties.insert(key, value);
    }

    Ok(properties)
}

/// Odd number of trailing backslashes.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || c.is_whitespace() {
            key_end = i;
            break;
        }
    }

    let rest = line[key_end..].trim_start();
    let rest = rest
        .strip_prefix(|c: char| c == '=' || c == ':')
        .unwrap_or(rest)
        .trim_start();
    (&line[..key_end], rest)
}

fn unescape(raw: &str, origin: &Path, line: usize) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{0c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = if hex.len() == 4 {
                    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
                } else {
                    None
                };
                match decoded {
                    Some(ch) => out.push(ch),
                    None => {
                        return Err(XsvError::ConfigSyntax {
                            path: origin.to_path_buf(),
                            line,
                            msg: format!("malformed \\uxxxx escape: \\u{}", hex),
                        })
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn origin() -> &'static Path {
        Path::new("test.config")
    }

    #[test]
    fn test_properties_separators() {
        let props = parse_properties("a=1\nb: 2\nc 3\nd   =   4\n", origin()).unwrap();
        assert_eq!(props["a"], "1");
        assert_eq!(props["b"], "2");
        assert_eq!(props["c"], "3");
        assert_eq!(props["d"], "4");
    }

    #[test]
    fn test_properties_comments_and_blanks() {
        let props = parse_properties("# comment\n! bang\n\n   \nkey=value\n", origin()).unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props["key"], "value");
    }

    #[test]
    fn test_properties_escapes() {
        let props =
            parse_properties("tab=\\t\nspace=\\ \nuni=\\u002C\nslash=a\\\\b\n", origin()).unwrap();
        assert_eq!(props["tab"], "\t");
        assert_eq!(props["space"], " ");
        assert_eq!(props["uni"], ",");
        assert_eq!(props["slash"], "a\\b");
    }

    #[test]
    fn test_properties_escaped_key_separator() {
        let props = parse_properties("a\\=b=c\n", origin()).unwrap();
        assert_eq!(props["a=b"], "c");
    }

    #[test]
    fn test_properties_continuation() {
        let props = parse_properties("key=one\\\n    two\nnext=3\n", origin()).unwrap();
        assert_eq!(props["key"], "onetwo");
        assert_eq!(props["next"], "3");
    }

    #[test]
    fn test_properties_last_duplicate_wins() {
        let props = parse_properties("k=1\nk=2\n", origin()).unwrap();
        assert_eq!(props["k"], "2");
    }

    #[test]
    fn test_properties_empty_value() {
        let props = parse_properties("k=\nj\n", origin()).unwrap();
        assert_eq!(props["k"], "");
        assert_eq!(props["j"], "");
    }

    #[test]
    fn test_properties_bad_unicode_escape() {
        let result = parse_properties("\n\nk=\\u12\n", origin());
        match result {
            Err(XsvError::ConfigSyntax { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_layout_parse_tab() {
        let layout =
            LocatableLayout::parse("contig=0\nstart=1\nend=2\ndelimiter=\\t\n", origin()).unwrap();
        assert_eq!(layout.delimiter(), "\t");
        assert_eq!(layout.contig_column(), 0);
        assert_eq!(layout.start_column(), 1);
        assert_eq!(layout.end_column(), 2);
    }

    #[test]
    fn test_layout_parse_trims_indices() {
        let layout =
            LocatableLayout::parse("contig = 3 \nstart=4\nend=4\ndelimiter=,\n", origin()).unwrap();
        assert_eq!(layout.contig_column(), 3);
        assert_eq!(layout.start_column(), 4);
        assert_eq!(layout.end_column(), 4);
    }

    #[test]
    fn test_layout_missing_key() {
        let result = LocatableLayout::parse("contig=0\nstart=1\ndelimiter=,\n", origin());
        assert!(matches!(
            result,
            Err(XsvError::MissingConfigKey { key: "end", .. })
        ));
    }

    #[test]
    fn test_layout_negative_index() {
        let result = LocatableLayout::parse("contig=0\nstart=-1\nend=2\ndelimiter=,\n", origin());
        match result {
            Err(XsvError::InvalidConfigValue { key, value, .. }) => {
                assert_eq!(key, "start");
                assert_eq!(value, "-1");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_layout_non_numeric_index() {
        let result = LocatableLayout::parse("contig=chr\nstart=1\nend=2\ndelimiter=,\n", origin());
        assert!(matches!(
            result,
            Err(XsvError::InvalidConfigValue { key: "contig", .. })
        ));
    }

    #[test]
    fn test_layout_empty_delimiter() {
        let result = LocatableLayout::parse("contig=0\nstart=1\nend=2\ndelimiter=\n", origin());
        assert!(matches!(
            result,
            Err(XsvError::InvalidConfigValue { key: "delimiter", .. })
        ));
    }

    #[test]
    fn test_layout_whitespace_pattern() {
        // Properties text `\\s+` unescapes to the pattern `\s+`
        let layout =
            LocatableLayout::parse("contig=0\nstart=1\nend=2\ndelimiter=\\\\s+\n", origin())
                .unwrap();
        assert_eq!(layout.delimiter(), r"\s+");
        assert!(layout.pattern().is_match(" \t "));
    }

    #[test]
    fn test_layout_invalid_pattern() {
        let result = LocatableLayout::parse("contig=0\nstart=1\nend=2\ndelimiter=[\n", origin());
        match result {
            Err(XsvError::InvalidConfigValue { key, value, path, .. }) => {
                assert_eq!(key, "delimiter");
                assert_eq!(value, "[");
                assert_eq!(path, PathBuf::from("test.config"));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(matches!(
            LocatableLayout::new("(", 0, 1, 2),
            Err(XsvError::InvalidDelimiter { .. })
        ));
    }

    #[test]
    fn test_layout_equality_by_text_and_columns() {
        let a = LocatableLayout::new(",", 0, 1, 2).unwrap();
        assert_eq!(a, LocatableLayout::new(",", 0, 1, 2).unwrap());
        assert_ne!(a, LocatableLayout::new(";", 0, 1, 2).unwrap());
        assert_ne!(a, LocatableLayout::new(",", 0, 1, 1).unwrap());
    }

    #[test]
    fn test_layout_new_rejects_empty_delimiter() {
        assert!(matches!(
            LocatableLayout::new("", 0, 1, 2),
            Err(XsvError::EmptyDelimiter)
        ));
    }

    #[test]
    fn test_layout_check_width() {
        let layout = LocatableLayout::new("\t", 0, 1, 5).unwrap();
        assert!(layout.check_width(6).is_ok());
        assert!(matches!(
            layout.check_width(5),
            Err(XsvError::ColumnOutOfRange { key: "end", index: 5, width: 5 })
        ));
    }

    #[test]
    fn test_config_path_for() {
        assert_eq!(
            config_path_for("/data/sample.tsv"),
            PathBuf::from("/data/sample.config")
        );
        assert_eq!(
            config_path_for("/data/sample.tsv.gz"),
            PathBuf::from("/data/sample.tsv.config")
        );
        assert_eq!(
            config_path_for("/data/sample"),
            PathBuf::from("/data/sample.config")
        );
    }

    #[test]
    fn test_is_config_path() {
        assert!(is_config_path(Path::new("/a/b.config")));
        assert!(!is_config_path(Path::new("/a/b.cfg")));
        assert!(!is_config_path(Path::new("/a/config")));
    }

    #[test]
    fn test_resolve_layout_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("table.csv");

        // No data file
        assert!(resolve_layout(&data).unwrap().is_none());

        // Data file without sidecar
        fs::write(&data, "chr,start,end\n").unwrap();
        assert!(resolve_layout(&data).unwrap().is_none());

        // Malformed sidecar
        let mut config = File::create(dir.path().join("table.config")).unwrap();
        writeln!(config, "contig=0").unwrap();
        drop(config);
        assert!(resolve_layout(&data).is_err());

        // Valid sidecar
        fs::write(
            dir.path().join("table.config"),
            "contig=0\nstart=1\nend=2\ndelimiter=,\n",
        )
        .unwrap();
        let layout = resolve_layout(&data).unwrap().unwrap();
        assert_eq!(layout.delimiter(), ",");
    }

    #[test]
    fn test_resolve_layout_directories() {
        let dir = tempfile::tempdir().unwrap();

        // Data path is a directory
        let data_dir = dir.path().join("table.tsv");
        fs::create_dir(&data_dir).unwrap();
        assert!(resolve_layout(&data_dir).unwrap().is_none());

        // Sidecar path is a directory
        let data = dir.path().join("other.tsv");
        fs::write(&data, "a\tb\tc\n").unwrap();
        fs::create_dir(dir.path().join("other.config")).unwrap();
        assert!(resolve_layout(&data).unwrap().is_none());
    }
}
