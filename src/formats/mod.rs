//! Delimiter-separated genomic table formats.
//!
//! All readers here are:
//! - **Streaming**: one line in, at most one record out, constant memory
//! - **Pull-based**: the caller drives decoding by asking for the next record
//! - **Fallible, not panicking**: every operation returns `Result`
//!
//! # Module Organization
//!
//! - [`primitives`]: Line access, field splitting, genomic loci
//! - [`xsv`]: XSV locatable tables configured by a `.config` sidecar

pub mod primitives;
pub mod xsv;

// Re-export commonly used types
pub use primitives::{LineSource, Locus};
pub use xsv::{
    DecoderOptions, DecoderSession, Header, LocatableFeature, LocatableLayout,
    XsvLocatableTableCodec, XsvTableReader,
};
