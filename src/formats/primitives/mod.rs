//! Shared primitives for delimiter-separated formats.
//!
//! This module provides the pieces every XSV table needs before any
//! format-specific interpretation:
//! - Streaming line access ([`LineSource`])
//! - Delimiter splitting and comment detection ([`fields`])
//! - Genomic loci ([`Locus`])

pub mod fields;
pub mod genomic;
pub mod lines;

// Re-exports
pub use fields::{is_comment, split_fields, COMMENT_PREFIX};
pub use genomic::Locus;
pub use lines::LineSource;
