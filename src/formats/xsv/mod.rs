//! XSV locatable tables.
//!
//! An XSV locatable table is any delimiter-separated text table (CSV, TSV, ...)
//! whose rows carry a genomic locus in three of their columns. Each data file
//! has a sibling `.config` sidecar declaring the delimiter and which columns
//! hold the contig, start and end:
//!
//! ```text
//! genes.tsv                         genes.config
//! # built 2024-01-01                contig=0
//! chr    pos1   pos2   gene         start=1
//! chr1   100    200    BRCA1        end=2
//! chr2   5      10                  delimiter=\t
//! ```
//!
//! # Decoding pipeline
//!
//! 1. [`XsvLocatableTableCodec`] resolves the sidecar and binds a
//!    [`DecoderSession`] (or reports the file as not decodable)
//! 2. [`DecoderSession::read_header`] skips leading comments and captures the
//!    header line
//! 3. [`DecoderSession::decode`] turns each following line into a
//!    [`LocatableFeature`], skipping comments and reconciling field counts
//!
//! [`XsvTableReader`] runs all three over a file.
//!
//! # Example
//!
//! ```no_run
//! use locatable_xsv::formats::xsv::{DecoderOptions, XsvTableReader};
//!
//! # fn main() -> locatable_xsv::Result<()> {
//! if let Some(reader) = XsvTableReader::from_path("genes.tsv", DecoderOptions::default())? {
//!     for feature in reader {
//!         let feature = feature?;
//!         println!("{} {}", feature.locus()?, feature.get("gene")?);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod feature;
pub mod header;
pub mod reader;
pub mod session;

pub use codec::XsvLocatableTableCodec;
pub use config::{config_path_for, resolve_layout, LocatableLayout, CONFIG_FILE_EXTENSION};
pub use feature::LocatableFeature;
pub use header::{Header, HeaderState, LineKind};
pub use reader::XsvTableReader;
pub use session::{DecodeStats, DecoderOptions, DecoderSession, ReconciliationPolicy};
