//! Raw CSV tables: header row plus ordered data rows.

use std::fmt;

use serde::Serialize;

use crate::error::ReconError;

/// Which inventory a table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// NMS export (the "source").
    Source,
    /// UDM export (the "target" / reference).
    Target,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Source => "NMS",
            Self::Target => "UDM",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A parsed CSV document. Row 0 is the header.
///
/// Rows may be shorter than the header; [`RawTable::cell`] treats missing
/// trailing cells as empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn headers(&self) -> &[String] {
        &self.rows[0]
    }

    /// Data rows, header excluded.
    pub fn data_rows(&self) -> &[Vec<String>] {
        &self.rows[1..]
    }

    /// Total row count including the header.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.len() < 2
    }

    /// Cell value of `row` at `col`, or `""` for a short row.
    pub fn cell<'a>(row: &'a [String], col: usize) -> &'a str {
        row.get(col).map(String::as_str).unwrap_or("")
    }
}

/// Parse comma-separated text.
pub fn parse_table(side: Side, text: &str) -> Result<RawTable, ReconError> {
    parse_table_with_delimiter(side, text, b',')
}

/// Parse delimited text with standard CSV quoting.
///
/// Fails when the document has fewer than two rows.
pub fn parse_table_with_delimiter(
    side: Side,
    text: &str,
    delimiter: u8,
) -> Result<RawTable, ReconError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| ReconError::Parse {
            side,
            message: format!("row {}: {e}", idx + 1),
        })?;
        rows.push(record.iter().map(|field| field.to_string()).collect::<Vec<_>>());
    }

    if rows.len() < 2 {
        return Err(ReconError::Parse {
            side,
            message: "file is empty (expected a header row and at least one data row)".into(),
        });
    }

    log::debug!("{side}: parsed {} data row(s), {} column(s)", rows.len() - 1, rows[0].len());
    Ok(RawTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_fields() {
        let text = "PLA_ID,SITE NAME\nS1,\"Alpha, North\"\nS2,\"say \"\"hi\"\"\"\n";
        let table = parse_table(Side::Source, text).unwrap();
        assert_eq!(table.headers(), &["PLA_ID".to_string(), "SITE NAME".to_string()]);
        assert_eq!(table.data_rows().len(), 2);
        assert_eq!(table.data_rows()[0][1], "Alpha, North");
        assert_eq!(table.data_rows()[1][1], "say \"hi\"");
    }

    #[test]
    fn short_rows_read_as_empty() {
        let table = parse_table(Side::Source, "A,B,C\n1\n").unwrap();
        let row = &table.data_rows()[0];
        assert_eq!(RawTable::cell(row, 0), "1");
        assert_eq!(RawTable::cell(row, 1), "");
        assert_eq!(RawTable::cell(row, 2), "");
    }

    #[test]
    fn header_only_is_parse_error() {
        let err = parse_table(Side::Target, "PLA_ID,SITE NAME\n").unwrap_err();
        assert!(matches!(err, ReconError::Parse { side: Side::Target, .. }));
    }

    #[test]
    fn empty_text_is_parse_error() {
        assert!(parse_table(Side::Source, "").is_err());
    }

    #[test]
    fn bom_is_stripped() {
        let table = parse_table(Side::Source, "\u{feff}PLA_ID\nS1\n").unwrap();
        assert_eq!(table.headers()[0], "PLA_ID");
    }

    #[test]
    fn semicolon_delimiter() {
        let table = parse_table_with_delimiter(Side::Source, "PLA_ID;NAME\nS1;Alpha\n", b';').unwrap();
        assert_eq!(table.data_rows()[0], vec!["S1".to_string(), "Alpha".to_string()]);
    }
}
