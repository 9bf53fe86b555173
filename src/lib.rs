//! locatable-xsv: streaming decoder for delimiter-separated genomic interval tables
//!
//! # Overview
//!
//! Annotation data sources are often plain CSV/TSV tables with a contig, a
//! start and an end column somewhere among arbitrary extra columns. This crate
//! reads such tables when they come with a sibling `.config` file declaring
//! the delimiter and the locus columns, and yields one position-aware record
//! per data line.
//!
//! ## Key Features
//!
//! - **Format detection**: a missing sidecar is "not decodable", never an error
//! - **Streaming**: one line at a time, plain or gzip-compressed
//! - **Tolerant**: ragged rows are padded or truncated to the header width, with a warning
//! - **Strict mode**: opt-in failure on ragged rows instead
//!
//! ## Quick Start
//!
//! ```no_run
//! use locatable_xsv::{DecoderOptions, XsvTableReader};
//!
//! # fn main() -> locatable_xsv::Result<()> {
//! // genes.tsv is described by genes.config in the same directory
//! let reader = XsvTableReader::from_path("genes.tsv", DecoderOptions::default())?
//!     .expect("genes.config should sit next to genes.tsv");
//!
//! for feature in reader {
//!     let feature = feature?;
//!     println!("{}:{}-{}", feature.contig()?, feature.start()?, feature.end()?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Padding and truncation are reported through the [`log`] facade at `warn`
//! level; sidecar resolution is logged at `debug`. Install any `log`
//! implementation to see them.
//!
//! ## Module Organization
//!
//! - [`error`]: Error type and `Result` alias
//! - [`formats`]: Line sources, field splitting and the XSV decoder

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod formats;

// Re-export commonly used types
pub use error::{Result, XsvError};
pub use formats::primitives::{LineSource, Locus};
pub use formats::xsv::{
    DecodeStats, DecoderOptions, DecoderSession, Header, LocatableFeature, LocatableLayout,
    ReconciliationPolicy, XsvLocatableTableCodec, XsvTableReader,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
