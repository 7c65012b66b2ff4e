//! CSV ingestion with encoding and delimiter auto-detection.
//!
//! Source spreadsheets arrive as exports with no fixed convention: UTF-8 or
//! Latin-1/Windows-1252 (Portuguese accents), semicolon or comma delimited.
//! This module detects both and parses the content into a [`RawTable`] of
//! typed cells. No business rules here; classification happens in
//! [`crate::etl`].

use crate::error::{LoadError, LoadResult};
use crate::models::CellValue;
use std::path::Path;

/// A wide table straight out of the source file: one row per contract/site,
/// one column per training type (plus the identity columns).
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Column headers, in file order.
    pub headers: Vec<String>,
    /// Cell values, one inner `Vec` per source row, aligned to `headers`.
    pub rows: Vec<Vec<CellValue>>,
}

/// Result of parsing with detection metadata.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The parsed wide table.
    pub table: RawTable,
    /// Detected or used encoding.
    pub encoding: String,
    /// Detected or used delimiter.
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> LoadResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => Ok(String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string())),
        "iso-8859-1" | "latin-1" | "latin1" => {
            Ok(encoding_rs::ISO_8859_15.decode(bytes).0.to_string())
        }
        "windows-1252" | "cp1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.to_string()),
        _ => {
            // Fallback: UTF-8 with lossy conversion
            Ok(String::from_utf8_lossy(bytes).to_string())
        }
    }
}

/// Detect the delimiter by counting occurrences in the first line.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ';';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse decoded CSV content with an explicit delimiter.
pub fn parse_content(content: &str, delimiter: char) -> LoadResult<RawTable> {
    if content.trim().is_empty() {
        return Err(LoadError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_matches('"').trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::NoHeaders);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        // Short rows pad with Empty, extra fields are ignored
        let row: Vec<CellValue> = (0..headers.len())
            .map(|i| CellValue::from_field(record.get(i).unwrap_or("")))
            .collect();
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> LoadResult<ParseResult> {
    if bytes.is_empty() {
        return Err(LoadError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);
    let table = parse_content(&content, delimiter)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
    })
}

/// Parse a CSV file with auto-detection of encoding and delimiter.
///
/// An absent or unreadable file is a [`LoadError::FileNotReadable`]; the
/// caller gets no partial table.
pub fn parse_file_auto<P: AsRef<Path>>(path: P) -> LoadResult<ParseResult> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| LoadError::FileNotReadable(format!("{}: {}", path.display(), e)))?;
    parse_bytes_auto(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let csv = "CONTRATANTE;OBRAS\nAcme;Obra Sul\nBeta;Obra Norte";
        let table = parse_content(csv, ';').unwrap();

        assert_eq!(table.headers, vec!["CONTRATANTE", "OBRAS"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], CellValue::Text("Acme".into()));
        assert_eq!(table.rows[1][1], CellValue::Text("Obra Norte".into()));
    }

    #[test]
    fn test_cells_are_typed() {
        let csv = "A;B;C\n1200;R$ 1.234,56;\n";
        let table = parse_content(csv, ';').unwrap();

        assert_eq!(table.rows[0][0], CellValue::Number(1200.0));
        assert_eq!(table.rows[0][1], CellValue::Text("R$ 1.234,56".into()));
        assert_eq!(table.rows[0][2], CellValue::Empty);
    }

    #[test]
    fn test_short_rows_pad_with_empty() {
        let csv = "A;B;C\nx;y";
        let table = parse_content(csv, ';').unwrap();

        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[0][2], CellValue::Empty);
    }

    #[test]
    fn test_blank_rows_skipped() {
        let csv = "A;B\n1;2\n;\n3;4\n";
        let table = parse_content(csv, ';').unwrap();
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_empty_content_error() {
        assert!(matches!(parse_content("", ';'), Err(LoadError::EmptyFile)));
        assert!(matches!(
            parse_bytes_auto(b""),
            Err(LoadError::EmptyFile)
        ));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc"), '\t');
        assert_eq!(detect_delimiter("a|b|c"), '|');
    }

    #[test]
    fn test_latin1_decoding() {
        // "GERÊNCIA" in ISO-8859-1
        let bytes: &[u8] = &[0x47, 0x45, 0x52, 0xCA, 0x4E, 0x43, 0x49, 0x41];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "GERÊNCIA");
    }

    #[test]
    fn test_auto_parse_detects_semicolon() {
        let csv = "CONTRATANTE;OBRAS\nAcme;Obra Sul";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.delimiter, ';');
        assert_eq!(result.encoding, "utf-8");
        assert_eq!(result.table.rows.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = parse_file_auto("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoadError::FileNotReadable(_)));
    }
}
