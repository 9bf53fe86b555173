//! Genomic locus type.
//!
//! [`Locus`] is the (contig, start, end) triple a decoded row is located by.
//!
//! # Coordinate System
//!
//! Loci are **closed** intervals `[start, end]`: XSV annotation tables store
//! both bounds inclusively, and single-base loci have `start == end`. No
//! particular basis (0- or 1-based) is assumed; positions are carried as
//! written in the table.
//!
//! # Examples
//!
//! ```
//! use locatable_xsv::formats::primitives::Locus;
//!
//! let a = Locus::new("chr1", 100, 200)?;
//! let b = Locus::new("chr1", 200, 250)?;
//!
//! assert_eq!(a.length(), 101);
//! assert!(a.overlaps(&b)); // shared base 200
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::{Result, XsvError};
use std::fmt;

/// A genomic locus with contig and inclusive coordinates.
///
/// # Invariants
///
/// - `start <= end` (enforced by constructor)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locus {
    /// Contig or chromosome name.
    pub contig: String,

    /// Start position (inclusive).
    pub start: u64,

    /// End position (inclusive).
    pub end: u64,
}

impl Locus {
    /// Creates a new locus.
    ///
    /// # Errors
    ///
    /// Returns [`XsvError::InvalidLocus`] if `start > end`.
    pub fn new(contig: impl Into<String>, start: u64, end: u64) -> Result<Self> {
        if start > end {
            return Err(XsvError::InvalidLocus { start, end });
        }

        Ok(Locus {
            contig: contig.into(),
            start,
            end,
        })
    }

    /// Number of bases covered (`end - start + 1`), saturating at `u64::MAX`.
    #[inline]
    pub fn length(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    /// Checks if this locus shares at least one base with another.
    ///
    /// Different contigs never overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.contig == other.contig && self.start <= other.end && other.start <= self.end
    }

    /// Checks if this locus completely contains another.
    pub fn contains(&self, other: &Self) -> bool {
        self.contig == other.contig && self.start <= other.start && self.end >= other.end
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start, self.end)
    }
}
