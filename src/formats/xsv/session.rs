//! Per-file decoding state.
//!
//! A [`DecoderSession`] owns everything needed to decode one table: the bound
//! [`LocatableLayout`], the captured [`Header`], the line counter and the
//! reconciliation statistics. Sessions share nothing, so decoding several
//! files concurrently only requires one session per file.
//!
//! # Reconciliation
//!
//! A data line whose field count differs from the header is either coerced
//! ([`ReconciliationPolicy::Lenient`], the default) or rejected
//! ([`ReconciliationPolicy::Strict`]):
//!
//! | Fields vs header | Lenient | Strict |
//! |------------------|---------|--------|
//! | zero fields | error | error |
//! | fewer | pad with `""`, warn | error |
//! | more | truncate from end, warn | error |
//! | equal | unchanged | unchanged |
//!
//! # Examples
//!
//! ```
//! use locatable_xsv::formats::primitives::LineSource;
//! use locatable_xsv::formats::xsv::{DecoderOptions, DecoderSession, LocatableLayout};
//!
//! let data = "# source: test\nchr\tpos1\tpos2\tgene\nchr1\t100\t200\tBRCA1\n";
//! let mut lines = LineSource::new(data.as_bytes());
//!
//! let layout = LocatableLayout::new("\t", 0, 1, 2)?;
//! let mut session = DecoderSession::new(layout, DecoderOptions::default());
//!
//! let header = session.read_header(&mut lines)?;
//! assert_eq!(header.len(), 4);
//!
//! let line = lines.next().unwrap()?;
//! let feature = session.decode(&line)?.unwrap();
//! assert_eq!(feature.contig()?, "chr1");
//! assert_eq!(feature.line_number(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::{Result, XsvError};
use crate::formats::primitives::fields::split_fields;
use crate::formats::xsv::config::LocatableLayout;
use crate::formats::xsv::feature::LocatableFeature;
use crate::formats::xsv::header::{Header, HeaderState, LineKind};
use log::warn;
use std::cmp::Ordering;
use std::sync::Arc;

/// What to do with a data line whose field count differs from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconciliationPolicy {
    /// Pad short lines and truncate long ones, logging a warning.
    #[default]
    Lenient,
    /// Fail with [`XsvError::FieldCount`]. Out-of-range coordinate columns
    /// are also rejected when the header is read.
    Strict,
}

/// Per-session decoding options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderOptions {
    /// Field-count reconciliation policy
    pub policy: ReconciliationPolicy,
}

impl DecoderOptions {
    /// Options with [`ReconciliationPolicy::Strict`].
    pub fn strict() -> Self {
        Self::default().with_policy(ReconciliationPolicy::Strict)
    }

    /// Sets the reconciliation policy.
    pub fn with_policy(mut self, policy: ReconciliationPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Counters for what a session has seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeStats {
    /// Lines consumed, comments included
    pub lines: u64,
    /// Records produced
    pub records: u64,
    /// Comment lines skipped, before and after the header
    pub comments: u64,
    /// Lines padded to the header width
    pub padded: u64,
    /// Lines truncated to the header width
    pub truncated: u64,
}

/// Decoding state for a single XSV table.
///
/// Not meant to be shared: one session decodes one file, in order.
#[derive(Debug)]
pub struct DecoderSession {
    layout: LocatableLayout,
    options: DecoderOptions,
    header: Option<Arc<Header>>,
    state: HeaderState,
    current_line: u64,
    stats: DecodeStats,
}

impl DecoderSession {
    /// Creates a session for a bound layout. No lines have been read yet.
    pub fn new(layout: LocatableLayout, options: DecoderOptions) -> Self {
        DecoderSession {
            layout,
            options,
            header: None,
            state: HeaderState::default(),
            current_line: 0,
            stats: DecodeStats::default(),
        }
    }

    /// Bound layout.
    pub fn layout(&self) -> &LocatableLayout {
        &self.layout
    }

    /// Session options.
    pub fn options(&self) -> DecoderOptions {
        self.options
    }

    /// Captured header, once [`read_header`](Self::read_header) has succeeded.
    pub fn header(&self) -> Option<&Arc<Header>> {
        self.header.as_ref()
    }

    /// Header capture progress.
    pub fn state(&self) -> HeaderState {
        self.state
    }

    /// Number of lines consumed so far (1-based position of the last line).
    pub fn current_line(&self) -> u64 {
        self.current_line
    }

    /// Counters for consumed, skipped, padded and truncated lines.
    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    /// Consumes leading comment lines and the header line from `lines`.
    ///
    /// Pass `&mut source` to keep the rest of the sequence for [`decode`](Self::decode).
    ///
    /// # Errors
    ///
    /// - [`XsvError::MissingHeader`] if `lines` ends before a non-comment line
    /// - [`XsvError::InvalidState`] if the header was already read
    /// - [`XsvError::ColumnOutOfRange`] under the strict policy; the header
    ///   line stays consumed and the session cannot decode
    /// - Any error yielded by `lines`
    pub fn read_header<I, S>(&mut self, lines: I) -> Result<Arc<Header>>
    where
        I: IntoIterator<Item = Result<S>>,
        S: AsRef<str>,
    {
        if self.state.has_header() {
            return Err(XsvError::InvalidState(
                "header has already been read for this session".to_string(),
            ));
        }

        for line in lines {
            let line = line?;
            let line = line.as_ref();
            self.current_line += 1;
            self.stats.lines += 1;

            let kind = LineKind::of(line);
            self.state = self.state.advance(kind);
            if kind == LineKind::Comment {
                self.stats.comments += 1;
                continue;
            }

            // The header line is consumed even when the layout rejects it
            let header = Header::from_line(line, self.layout.pattern());
            self.check_layout(&header)?;

            let header = Arc::new(header);
            self.header = Some(Arc::clone(&header));
            return Ok(header);
        }

        Err(XsvError::MissingHeader {
            line: self.current_line,
        })
    }

    /// Decodes one line following the header.
    ///
    /// Returns `Ok(None)` for comment lines. Every call advances the line
    /// counter, whatever the outcome.
    ///
    /// # Errors
    ///
    /// - [`XsvError::InvalidState`] if the header has not been read
    /// - [`XsvError::NoFields`] if the line splits into zero fields
    /// - [`XsvError::FieldCount`] on a count mismatch under the strict policy
    pub fn decode(&mut self, line: &str) -> Result<Option<LocatableFeature>> {
        let header = match &self.header {
            Some(header) => Arc::clone(header),
            None => {
                return Err(XsvError::InvalidState(
                    "decode called before the header was read".to_string(),
                ))
            }
        };

        self.current_line += 1;
        self.stats.lines += 1;

        let kind = LineKind::of(line);
        self.state = self.state.advance(kind);
        if kind == LineKind::Comment {
            self.stats.comments += 1;
            return Ok(None);
        }

        let fields = split_fields(line, self.layout.pattern());
        let fields = self.reconcile(fields, header.len())?;

        let feature = LocatableFeature::new(header, &self.layout, fields, self.current_line)?;
        self.stats.records += 1;
        Ok(Some(feature))
    }

    fn reconcile(&mut self, mut fields: Vec<String>, width: usize) -> Result<Vec<String>> {
        let line = self.current_line;
        let actual = fields.len();

        if actual == 0 {
            return Err(XsvError::NoFields { line });
        }

        let strict = self.options.policy == ReconciliationPolicy::Strict;
        match actual.cmp(&width) {
            Ordering::Equal => {}
            _ if strict => {
                return Err(XsvError::FieldCount {
                    expected: width,
                    actual,
                    line,
                });
            }
            Ordering::Less => {
                warn!(
                    "Line {} does not have the same number of fields as header ({} < {})! Padding with empty fields to end...",
                    line, actual, width
                );
                fields.resize(width, String::new());
                self.stats.padded += 1;
            }
            Ordering::Greater => {
                warn!(
                    "Line {} does not have the same number of fields as header ({} > {})! Truncating fields from end...",
                    line, actual, width
                );
                fields.truncate(width);
                self.stats.truncated += 1;
            }
        }

        Ok(fields)
    }

    fn check_layout(&self, header: &Header) -> Result<()> {
        match self.layout.check_width(header.len()) {
            Ok(()) => Ok(()),
            Err(e) if self.options.policy == ReconciliationPolicy::Strict => Err(e),
            Err(e) => {
                warn!("{}; coordinate access will fail for every row", e);
                Ok(())
            }
        }
    }
}
