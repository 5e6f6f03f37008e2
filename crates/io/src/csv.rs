// CSV import: decoding, delimiter sniffing, table parsing

use std::io::Read;
use std::path::Path;

use netsite_recon::table::{parse_table_with_delimiter, RawTable, Side};
use netsite_recon::ReconError;

/// Sniff the delimiter of already-decoded text and parse it as one side of a
/// comparison.
pub fn import_table(side: Side, content: &str) -> Result<RawTable, ReconError> {
    let delimiter = sniff_delimiter(content);
    log::debug!("{side}: using delimiter {:?}", delimiter as char);
    parse_table_with_delimiter(side, content, delimiter)
}

/// Candidates in tie-break order.
const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Records sampled per candidate.
const SNIFF_RECORDS: usize = 10;

/// Pick the delimiter whose first records agree best with the header's width.
/// Falls back to comma when no candidate splits the header.
pub fn sniff_delimiter(content: &str) -> u8 {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut best: Option<(u8, u64)> = None;
    for delim in DELIMITERS {
        if let Some(score) = delimiter_score(content, delim) {
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((delim, score));
            }
        }
    }
    best.map_or(b',', |(delim, _)| delim)
}

/// Sampled records matching the header width, weighted by that width.
/// Records are read whole, so quoted names spanning lines count once.
fn delimiter_score(content: &str, delim: u8) -> Option<u64> {
    let widths: Vec<usize> = csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes())
        .records()
        .take(SNIFF_RECORDS)
        .map_while(Result::ok)
        .map(|record| record.len())
        .collect();

    let header = *widths.first()?;
    if header <= 1 {
        return None;
    }
    let consistent = widths.iter().filter(|&&w| w == header).count() as u64;
    Some(consistent * header as u64)
}

/// Read file and convert to UTF-8 if needed (Excel exports are often Windows-1252).
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file =
        std::fs::File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(decode_bytes(bytes))
}

/// Read all of `reader` (stdin) with the same decoding rules as files.
pub fn read_reader_as_utf8<R: Read>(mut reader: R) -> Result<String, String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|e| e.to_string())?;
    Ok(decode_bytes(bytes))
}

fn decode_bytes(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            log::debug!("input is not UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_sniff_semicolon_delimiter() {
        let content = "PLA_ID;SITE NAME;VENDOR\nP1;PANABODDN1L;Huawei\nP2;TAGUM1K;Nokia\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_comma_delimiter() {
        let content = "PLA_ID,SITE NAME\nP1,PANABODDN1L\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_tab_delimiter() {
        let content = "PLA_ID\tSITE NAME\nP1\tPANABODDN1L\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn test_sniff_pipe_delimiter() {
        let content = "PLA_ID|SITE NAME\nP1|PANABODDN1L\n";
        assert_eq!(sniff_delimiter(content), b'|');
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_values() {
        let content = "PLA_ID;SITE NAME;NOTE\nP1;\"Alpha, North\";\"moved, twice\"\nP2;Beta;x\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_quoted_name_spanning_lines() {
        let content = "PLA_ID;SITE NAME\nP1;\"PANABO\nDDN2ID\"\nP2;TAGUM1K\n";
        assert_eq!(sniff_delimiter(content), b';');
        let table = import_table(Side::Source, content).unwrap();
        assert_eq!(table.data_rows().len(), 2);
        assert_eq!(table.data_rows()[0][1], "PANABO\nDDN2ID");
    }

    #[test]
    fn test_sniff_prefers_comma_on_tie() {
        assert_eq!(sniff_delimiter("PLA_ID,A;B\nP1,x;y\n"), b',');
    }

    #[test]
    fn test_single_column_defaults_to_comma() {
        assert_eq!(sniff_delimiter("PLA_ID\nP1\n"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn test_import_semicolon_table() {
        let table = import_table(Side::Source, "PLA_ID;SITE NAME\nP1;Alpha\n").unwrap();
        assert_eq!(table.headers(), &["PLA_ID".to_string(), "SITE NAME".to_string()]);
        assert_eq!(table.data_rows()[0][1], "Alpha");
    }

    #[test]
    fn test_windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nms.csv");
        // 0xF1 is 'ñ' in Windows-1252 and invalid as a lone UTF-8 byte
        fs::write(&path, b"PLA_ID,SITE NAME\nP1,PE\xF1A\n").unwrap();
        let text = read_file_as_utf8(&path).unwrap();
        assert!(text.contains("PE\u{f1}A"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_file_as_utf8(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(err.contains("here.csv"));
    }

    #[test]
    fn test_bom_is_ignored() {
        let table = import_table(Side::Target, "\u{feff}PLA_ID;SITE NAME\nP1;Alpha\n").unwrap();
        assert_eq!(table.headers()[0], "PLA_ID");
    }
}
