//! Decoded XSV rows.

use crate::error::{Result, XsvError};
use crate::formats::primitives::Locus;
use crate::formats::xsv::config::{LocatableLayout, CONTIG_KEY, END_KEY, START_KEY};
use crate::formats::xsv::header::Header;
use std::sync::Arc;

/// One decoded data row, located by its contig, start and end columns.
///
/// The row always has exactly as many fields as the header has columns.
/// Coordinates are parsed on access, so a row with a malformed position
/// can still be inspected by name.
///
/// Two features are equal when their fields and coordinate columns are equal;
/// the header and source line are not compared.
///
/// # Examples
///
/// ```
/// use locatable_xsv::formats::xsv::{Header, LocatableFeature, LocatableLayout};
/// use std::sync::Arc;
///
/// let layout = LocatableLayout::new("\t", 0, 1, 2)?;
/// let header = Arc::new(Header::from_line("chr\tpos1\tpos2\tgene", layout.pattern()));
/// let fields = vec!["chr1", "100", "200", "BRCA1"].into_iter().map(String::from).collect();
///
/// let feature = LocatableFeature::new(header, &layout, fields, 2)?;
/// assert_eq!(feature.contig()?, "chr1");
/// assert_eq!(feature.start()?, 100);
/// assert_eq!(feature.end()?, 200);
/// assert_eq!(feature.get("gene")?, "BRCA1");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct LocatableFeature {
    header: Arc<Header>,
    contig_column: usize,
    start_column: usize,
    end_column: usize,
    fields: Vec<String>,
    line: u64,
}

impl LocatableFeature {
    /// Creates a feature from already reconciled fields.
    ///
    /// # Errors
    ///
    /// Returns [`XsvError::FieldCount`] if `fields` and `header` differ in length.
    pub fn new(
        header: Arc<Header>,
        layout: &LocatableLayout,
        fields: Vec<String>,
        line: u64,
    ) -> Result<Self> {
        if fields.len() != header.len() {
            return Err(XsvError::FieldCount {
                expected: header.len(),
                actual: fields.len(),
                line,
            });
        }

        Ok(LocatableFeature {
            header,
            contig_column: layout.contig_column(),
            start_column: layout.start_column(),
            end_column: layout.end_column(),
            fields,
            line,
        })
    }

    /// Contig name.
    ///
    /// # Errors
    ///
    /// Returns [`XsvError::ColumnOutOfRange`] if the contig column is past the header.
    pub fn contig(&self) -> Result<&str> {
        self.column(CONTIG_KEY, self.contig_column)
    }

    /// Start coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`XsvError::InvalidCoordinate`] if the field is not a position.
    pub fn start(&self) -> Result<u64> {
        self.coordinate(START_KEY, self.start_column)
    }

    /// End coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`XsvError::InvalidCoordinate`] if the field is not a position.
    pub fn end(&self) -> Result<u64> {
        self.coordinate(END_KEY, self.end_column)
    }

    /// Contig, start and end as a [`Locus`].
    ///
    /// # Errors
    ///
    /// Fails as [`contig`](Self::contig), [`start`](Self::start) and
    /// [`end`](Self::end) do, or with [`XsvError::InvalidLocus`] if start > end.
    pub fn locus(&self) -> Result<Locus> {
        Locus::new(self.contig()?, self.start()?, self.end()?)
    }

    /// Field under the header column `name`.
    ///
    /// # Errors
    ///
    /// Returns [`XsvError::NoSuchField`] if the header has no such column.
    pub fn get(&self, name: &str) -> Result<&str> {
        self.header
            .position(name)
            .map(|i| self.fields[i].as_str())
            .ok_or_else(|| XsvError::NoSuchField(name.to_string()))
    }

    /// Field at `index`.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// All fields in column order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Consumes the feature, returning its fields.
    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }

    /// Header shared with every row of the same table.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Line of the source file this row was decoded from.
    pub fn line_number(&self) -> u64 {
        self.line
    }

    /// Iterates over `(column name, field)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.header.iter().zip(self.fields.iter().map(String::as_str))
    }

    fn column(&self, key: &'static str, index: usize) -> Result<&str> {
        self.field(index).ok_or(XsvError::ColumnOutOfRange {
            key,
            index,
            width: self.fields.len(),
        })
    }

    fn coordinate(&self, key: &'static str, index: usize) -> Result<u64> {
        let raw = self.column(key, index)?;
        raw.parse::<u64>().map_err(|e| XsvError::InvalidCoordinate {
            key,
            column: self.header.name(index).unwrap_or_default().to_string(),
            value: raw.to_string(),
            line: self.line,
            reason: e.to_string(),
        })
    }
}

impl PartialEq for LocatableFeature {
    fn eq(&self, other: &Self) -> bool {
        self.contig_column == other.contig_column
            && self.start_column == other.start_column
            && self.end_column == other.end_column
            && self.fields == other.fields
    }
}

impl Eq for LocatableFeature {}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Arc<Header> {
        let tab = regex::Regex::new("\t").unwrap();
        Arc::new(Header::from_line("chr\tpos1\tpos2\tgene", &tab))
    }

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn feature(values: &[&str]) -> LocatableFeature {
        let layout = LocatableLayout::new("\t", 0, 1, 2).unwrap();
        LocatableFeature::new(header(), &layout, fields(values), 7).unwrap()
    }

    #[test]
    fn test_feature_accessors() {
        let f = feature(&["chr1", "100", "200", "BRCA1"]);
        assert_eq!(f.contig().unwrap(), "chr1");
        assert_eq!(f.start().unwrap(), 100);
        assert_eq!(f.end().unwrap(), 200);
        assert_eq!(f.get("gene").unwrap(), "BRCA1");
        assert_eq!(f.field(3), Some("BRCA1"));
        assert_eq!(f.field(4), None);
        assert_eq!(f.line_number(), 7);
    }

    #[test]
    fn test_feature_locus() {
        let f = feature(&["chr1", "100", "200", ""]);
        assert_eq!(f.locus().unwrap(), Locus::new("chr1", 100, 200).unwrap());

        let reversed = feature(&["chr1", "200", "100", ""]);
        assert!(matches!(reversed.locus(), Err(XsvError::InvalidLocus { .. })));
    }

    #[test]
    fn test_feature_bad_coordinate_names_column() {
        let f = feature(&["chr1", "abc", "200", ""]);
        match f.start() {
            Err(XsvError::InvalidCoordinate {
                key,
                column,
                value,
                line,
                ..
            }) => {
                assert_eq!(key, "start");
                assert_eq!(column, "pos1");
                assert_eq!(value, "abc");
                assert_eq!(line, 7);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        // The rest of the row stays readable
        assert_eq!(f.end().unwrap(), 200);
    }

    #[test]
    fn test_feature_negative_or_empty_coordinate() {
        assert!(feature(&["chr1", "-5", "1", ""]).start().is_err());
        assert!(feature(&["chr1", "1", "", ""]).end().is_err());
    }

    #[test]
    fn test_feature_no_such_field() {
        let f = feature(&["chr1", "1", "2", "g"]);
        assert!(matches!(f.get("strand"), Err(XsvError::NoSuchField(name)) if name == "strand"));
    }

    #[test]
    fn test_feature_out_of_range_column() {
        let layout = LocatableLayout::new("\t", 9, 1, 2).unwrap();
        let f = LocatableFeature::new(header(), &layout, fields(&["a", "1", "2", "g"]), 1).unwrap();
        assert!(matches!(
            f.contig(),
            Err(XsvError::ColumnOutOfRange { key: "contig", index: 9, width: 4 })
        ));
    }

    #[test]
    fn test_feature_requires_header_width() {
        let layout = LocatableLayout::new("\t", 0, 1, 2).unwrap();
        let result = LocatableFeature::new(header(), &layout, fields(&["chr1", "1", "2"]), 3);
        assert!(matches!(
            result,
            Err(XsvError::FieldCount { expected: 4, actual: 3, line: 3 })
        ));
    }

    #[test]
    fn test_feature_iter_pairs() {
        let f = feature(&["chr1", "1", "2", "g"]);
        let pairs: Vec<_> = f.iter().collect();
        assert_eq!(
            pairs,
            vec![("chr", "chr1"), ("pos1", "1"), ("pos2", "2"), ("gene", "g")]
        );
    }

    #[test]
    fn test_feature_equality_ignores_line_and_header() {
        let layout = LocatableLayout::new("\t", 0, 1, 2).unwrap();
        let other_header = Arc::new(Header::from_line("a\tb\tc\td", layout.pattern()));

        let a = LocatableFeature::new(header(), &layout, fields(&["chr1", "1", "2", "g"]), 1).unwrap();
        let b = LocatableFeature::new(other_header, &layout, fields(&["chr1", "1", "2", "g"]), 9)
            .unwrap();
        assert_eq!(a, b);

        let shifted = LocatableLayout::new("\t", 0, 2, 2).unwrap();
        let c = LocatableFeature::new(header(), &shifted, fields(&["chr1", "1", "2", "g"]), 1).unwrap();
        assert_ne!(a, c);
    }
}
