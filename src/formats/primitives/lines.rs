//! Streaming line source for delimiter-separated tables.
//!
//! [`LineSource`] is a forward-only, lazily-produced sequence of text lines
//! over any reader. It performs no interpretation of the lines: comment
//! detection, header capture and splitting all belong to the decoder.
//!
//! Only the line terminator (`\n` or `\r\n`) is stripped. Trailing delimiters
//! and whitespace are data and are left in place.
//!
//! # Examples
//!
//! ```
//! use locatable_xsv::formats::primitives::LineSource;
//!
//! let data = "#comment\nchr\tstart\tend\r\nchr1\t1\t2\t\n";
//! let lines: Vec<String> = LineSource::new(data.as_bytes())
//!     .collect::<locatable_xsv::Result<_>>()?;
//!
//! assert_eq!(lines, vec!["#comment", "chr\tstart\tend", "chr1\t1\t2\t"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::Result;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Buffered, line-at-a-time reader.
///
/// # Type Parameters
///
/// - `R`: The underlying reader (anything implementing `Read`)
pub struct LineSource<R: Read> {
    reader: BufReader<R>,
    line_buf: String,
    lines_read: u64,
}

impl<R: Read> LineSource<R> {
    /// Creates a new line source from a reader.
    pub fn new(reader: R) -> Self {
        LineSource {
            reader: BufReader::new(reader),
            line_buf: String::with_capacity(1024),
            lines_read: 0,
        }
    }

    /// Returns the number of lines handed out so far.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}

impl LineSource<Box<dyn Read + Send>> {
    /// Opens `path`, decompressing transparently when it ends in `.gz`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader: Box<dyn Read + Send> = if is_gzip_path(path) {
            Box::new(MultiGzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(Self::new(reader))
    }
}

/// Returns `true` if `path` has a `.gz` or `.bgz` extension.
pub fn is_gzip_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("gz") | Some("bgz")
    )
}

impl<R: Read> Iterator for LineSource<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.line_buf.clear();

        match self.reader.read_line(&mut self.line_buf) {
            Ok(0) => None, // EOF
            Ok(_) => {
                self.lines_read += 1;

                if self.line_buf.ends_with('\n') {
                    self.line_buf.pop();
                    if self.line_buf.ends_with('\r') {
                        self.line_buf.pop();
                    }
                }

                Some(Ok(self.line_buf.clone()))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}
