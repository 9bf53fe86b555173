//! Format detection and session binding.

use crate::error::Result;
use crate::formats::xsv::config::resolve_layout;
use crate::formats::xsv::session::{DecoderOptions, DecoderSession};
use std::path::Path;

/// Entry point for XSV locatable tables.
///
/// The codec holds no state. Each successful [`open_session`](Self::open_session)
/// returns a fresh [`DecoderSession`] bound to one file's layout.
///
/// # Examples
///
/// ```no_run
/// use locatable_xsv::formats::xsv::{DecoderOptions, XsvLocatableTableCodec};
///
/// # fn main() -> locatable_xsv::Result<()> {
/// if XsvLocatableTableCodec::can_decode("annotations.tsv")? {
///     let session = XsvLocatableTableCodec::open_session("annotations.tsv", DecoderOptions::default())?;
///     assert!(session.is_some());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct XsvLocatableTableCodec;

impl XsvLocatableTableCodec {
    /// Returns `true` if `path` is a readable data file with a valid sidecar.
    ///
    /// A missing or unreadable file or sidecar gives `Ok(false)`, so several
    /// codecs can be tried in turn. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns an error if the sidecar exists but is malformed.
    pub fn can_decode(path: impl AsRef<Path>) -> Result<bool> {
        Ok(resolve_layout(path)?.is_some())
    }

    /// Resolves the sidecar for `path` and binds a new session.
    ///
    /// Returns `Ok(None)` when `path` is not decodable.
    ///
    /// # Errors
    ///
    /// Returns an error if the sidecar exists but is malformed.
    pub fn open_session(
        path: impl AsRef<Path>,
        options: DecoderOptions,
    ) -> Result<Option<DecoderSession>> {
        Ok(resolve_layout(path)?.map(|layout| DecoderSession::new(layout, options)))
    }
}
