//! Bounded preview parsing for delimited text.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Maximum number of data rows included in a preview.
pub const PREVIEW_ROW_LIMIT: usize = 5;

/// One preview row: header token mapped to trimmed cell text, in header order.
pub type PreviewRow = IndexMap<String, String>;

/// A bounded, insertion-ordered glimpse of a delimited document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewTable {
    /// Up to [`PREVIEW_ROW_LIMIT`] rows in document order.
    pub rows: Vec<PreviewRow>,
}

impl PreviewTable {
    /// Number of preview rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the preview holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header tokens in order, taken from the first row's key set.
    pub fn headers(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Parse the first lines of a delimited document into a bounded preview.
///
/// Splits on line boundaries (`\r\n` tolerated), trims each line, and
/// discards blank lines wherever they appear. The first surviving line
/// provides the header tokens by splitting on commas; up to
/// [`PREVIEW_ROW_LIMIT`] following lines become rows, zipped positionally
/// against the headers. Every token and cell is trimmed. Rows shorter than
/// the header are padded with empty strings; extra trailing fields are
/// dropped.
///
/// Two deliberate limitations, shared with the conversion UI this feeds:
///
/// - Quoting is not understood. A quoted field containing a comma or an
///   embedded newline will split. The preview is a best-effort glance at
///   the first records, never the canonical parse; the inference service
///   receives the verbatim text.
/// - Duplicate header tokens are not deduplicated: later fields overwrite
///   earlier ones under the same key, keeping the first occurrence's
///   position.
///
/// Fewer than two non-blank lines yields an empty table. A header-only or
/// blank document has nothing to preview but is not malformed, so this
/// function currently never returns an error; the `Result` is part of the
/// contract for callers.
pub fn parse_preview(text: &str) -> Result<PreviewTable> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        return Ok(PreviewTable::default());
    }

    let headers: Vec<String> = lines[0]
        .split(',')
        .map(|token| token.trim().to_string())
        .collect();

    let rows = lines[1..]
        .iter()
        .take(PREVIEW_ROW_LIMIT)
        .map(|line| {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = fields.get(i).copied().unwrap_or("");
                    (header.clone(), value.to_string())
                })
                .collect::<PreviewRow>()
        })
        .collect();

    Ok(PreviewTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell<'a>(table: &'a PreviewTable, row: usize, key: &str) -> &'a str {
        table.rows[row].get(key).map(String::as_str).unwrap()
    }

    #[test]
    fn test_two_data_rows() {
        let table = parse_preview("a,b\n1,true\nfoo,2").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.headers(), vec!["a", "b"]);
        assert_eq!(cell(&table, 0, "a"), "1");
        assert_eq!(cell(&table, 0, "b"), "true");
        assert_eq!(cell(&table, 1, "a"), "foo");
        assert_eq!(cell(&table, 1, "b"), "2");
    }

    #[test]
    fn test_header_only_is_empty_not_an_error() {
        let table = parse_preview("a,b,c").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert!(parse_preview("").unwrap().is_empty());
        assert!(parse_preview("\n\n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_row_limit_applies() {
        let text = "n\n1\n2\n3\n4\n5\n6\n7";
        let table = parse_preview(text).unwrap();
        assert_eq!(table.len(), PREVIEW_ROW_LIMIT);
        assert_eq!(cell(&table, 4, "n"), "5");
    }

    #[test]
    fn test_cells_and_headers_are_trimmed() {
        let table = parse_preview("  name , age \n  alice ,  30 ").unwrap();
        assert_eq!(table.headers(), vec!["name", "age"]);
        assert_eq!(cell(&table, 0, "name"), "alice");
        assert_eq!(cell(&table, 0, "age"), "30");
    }

    #[test]
    fn test_crlf_line_endings() {
        let table = parse_preview("a,b\r\n1,2\r\n3,4\r\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(cell(&table, 1, "b"), "4");
    }

    #[test]
    fn test_interior_blank_lines_are_discarded() {
        let table = parse_preview("a,b\n\n1,2\n   \n3,4").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(cell(&table, 1, "a"), "3");
    }

    #[test]
    fn test_short_row_pads_with_empty_strings() {
        let table = parse_preview("a,b,c\n1,2").unwrap();
        assert_eq!(cell(&table, 0, "a"), "1");
        assert_eq!(cell(&table, 0, "b"), "2");
        assert_eq!(cell(&table, 0, "c"), "");
    }

    #[test]
    fn test_long_row_drops_extra_fields() {
        let table = parse_preview("a,b\n1,2,3,4").unwrap();
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(cell(&table, 0, "b"), "2");
    }

    #[test]
    fn test_duplicate_headers_overwrite_keeping_first_position() {
        let table = parse_preview("id,id,name\n1,2,alice").unwrap();
        let row = &table.rows[0];
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("id").unwrap(), "2");
        let keys: Vec<&String> = row.keys().collect();
        assert_eq!(keys, vec!["id", "name"]);
    }

    #[test]
    fn test_quotes_are_not_interpreted() {
        let table = parse_preview("a,b\n\"x,y\",z").unwrap();
        assert_eq!(cell(&table, 0, "a"), "\"x");
        assert_eq!(cell(&table, 0, "b"), "y\"");
    }

    #[test]
    fn test_key_order_follows_header_order() {
        let table = parse_preview("zebra,apple,mango\n1,2,3").unwrap();
        assert_eq!(table.headers(), vec!["zebra", "apple", "mango"]);
    }
}
