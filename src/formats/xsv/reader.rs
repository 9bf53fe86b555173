//! Streaming reader over a whole XSV table.

use crate::error::Result;
use crate::formats::primitives::LineSource;
use crate::formats::xsv::codec::XsvLocatableTableCodec;
use crate::formats::xsv::feature::LocatableFeature;
use crate::formats::xsv::header::Header;
use crate::formats::xsv::session::{DecodeStats, DecoderOptions, DecoderSession};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Pulls lines from a [`LineSource`] and yields decoded records.
///
/// The header is captured on construction. Iteration skips comment lines and
/// stops after the first error.
///
/// # Examples
///
/// ```no_run
/// use locatable_xsv::formats::xsv::{DecoderOptions, XsvTableReader};
///
/// # fn main() -> locatable_xsv::Result<()> {
/// let Some(reader) = XsvTableReader::from_path("annotations.tsv.gz", DecoderOptions::default())? else {
///     return Ok(()); // not an XSV locatable table
/// };
///
/// for feature in reader {
///     let feature = feature?;
///     println!("{}:{}-{}", feature.contig()?, feature.start()?, feature.end()?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct XsvTableReader<R: Read> {
    lines: LineSource<R>,
    session: DecoderSession,
    header: Arc<Header>,
    done: bool,
}

impl<R: Read> XsvTableReader<R> {
    /// Reads the header from `lines` and returns a reader positioned on the data.
    ///
    /// # Errors
    ///
    /// Returns an error if no header can be read.
    pub fn new(mut lines: LineSource<R>, mut session: DecoderSession) -> Result<Self> {
        let header = session.read_header(&mut lines)?;
        Ok(XsvTableReader {
            lines,
            session,
            header,
            done: false,
        })
    }

    /// Column names.
    pub fn header(&self) -> &Arc<Header> {
        &self.header
    }

    /// Underlying session.
    pub fn session(&self) -> &DecoderSession {
        &self.session
    }

    /// Counters for skipped, padded and truncated lines.
    pub fn stats(&self) -> DecodeStats {
        self.session.stats()
    }
}

impl XsvTableReader<Box<dyn Read + Send>> {
    /// Opens a data file, resolving its sidecar and reading its header.
    ///
    /// Files ending in `.gz` are decompressed. Returns `Ok(None)` when the
    /// file is not decodable.
    ///
    /// # Errors
    ///
    /// Returns an error if the sidecar is malformed or the header is missing.
    pub fn from_path(path: impl AsRef<Path>, options: DecoderOptions) -> Result<Option<Self>> {
        let path = path.as_ref();
        match XsvLocatableTableCodec::open_session(path, options)? {
            Some(session) => Self::new(LineSource::open(path)?, session).map(Some),
            None => Ok(None),
        }
    }
}

impl<R: Read> Iterator for XsvTableReader<R> {
    type Item = Result<LocatableFeature>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            match self.session.decode(&line) {
                Ok(Some(feature)) => return Some(Ok(feature)),
                Ok(None) => continue, // comment
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XsvError;
    use crate::formats::xsv::config::LocatableLayout;

    fn reader(data: &'static str) -> XsvTableReader<&'static [u8]> {
        let layout = LocatableLayout::new(",", 0, 1, 2).unwrap();
        let session = DecoderSession::new(layout, DecoderOptions::default());
        XsvTableReader::new(LineSource::new(data.as_bytes()), session).unwrap()
    }

    #[test]
    fn test_reader_skips_comments() {
        let data = "#meta\nchr,start,end\nchr1,1,2\n#note\nchr2,3,4\n";
        let records: Vec<_> = reader(data).collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].contig().unwrap(), "chr1");
        assert_eq!(records[1].contig().unwrap(), "chr2");
        assert_eq!(records[1].line_number(), 5);
    }

    #[test]
    fn test_reader_stops_after_error() {
        let data = "chr,start,end\nchr1,1,2\n,,\nchr2,3,4\n";
        let mut r = reader(data);
        assert!(r.next().unwrap().is_ok());
        assert!(matches!(r.next(), Some(Err(XsvError::NoFields { line: 3 }))));
        assert!(r.next().is_none());
    }

    #[test]
    fn test_reader_missing_header() {
        let layout = LocatableLayout::new(",", 0, 1, 2).unwrap();
        let session = DecoderSession::new(layout, DecoderOptions::default());
        let result = XsvTableReader::new(LineSource::new("#only\n".as_bytes()), session);
        assert!(matches!(result, Err(XsvError::MissingHeader { line: 1 })));
    }

    #[test]
    fn test_reader_stats() {
        let data = "chr,start,end,name\nchr1,1,2\nchr1,1,2,a,b\nchr1,1,2,c\n";
        let mut r = reader(data);
        assert_eq!(r.by_ref().count(), 3);
        let stats = r.stats();
        assert_eq!(stats.records, 3);
        assert_eq!(stats.padded, 1);
        assert_eq!(stats.truncated, 1);
    }
}
