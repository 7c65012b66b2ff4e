//! High-level load pipeline: file → cleaned record set.
//!
//! This replaces the hidden "parse once at startup and cache globally"
//! pattern with an explicit load call. The surrounding application invokes
//! [`load_file`] once per run and passes the resulting [`Dataset`] to the
//! filter and metrics layers; re-loading is always a fresh call, there is
//! no process-wide cache.
//!
//! ```text
//! ┌──────────┐    ┌────────────┐    ┌───────────┐    ┌──────────┐
//! │ CSV file │───▶│ Normalizer │───▶│ Classifier│───▶│ Records  │
//! │ (BR/ISO) │    │ (melt)     │    │ + builder │    │ (clean)  │
//! └──────────┘    └────────────┘    └───────────┘    └──────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

use crate::api::logs::{log_info, log_success, log_warning};
use crate::error::LoadResult;
use crate::etl::builder::build;
use crate::etl::normalize::normalize;
use crate::models::Record;
use crate::parser::{parse_bytes_auto, parse_file_auto, ParseResult};

/// Metadata about one completed load.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadInfo {
    /// Detected source encoding.
    pub encoding: String,
    /// Detected delimiter.
    pub delimiter: char,
    /// Source rows before melting.
    pub source_rows: usize,
    /// Source columns, identity included.
    pub source_columns: usize,
    /// Training-type columns that survived normalization.
    pub training_columns: Vec<String>,
    /// Pre-aggregated columns that were dropped.
    pub dropped_columns: Vec<String>,
    /// Records after classification and exclusion.
    pub record_count: usize,
    /// When this load completed.
    pub loaded_at: DateTime<Utc>,
}

/// One loaded dataset: the cleaned, immutable record set plus load metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub records: Vec<Record>,
    pub info: LoadInfo,
}

/// Load and clean a data file.
///
/// Load-fatal errors ([`crate::error::LoadError`]) abort here; per-cell
/// anomalies have already degraded to excluded rows by the time this
/// returns.
pub fn load_file<P: AsRef<Path>>(path: P) -> LoadResult<Dataset> {
    log_info(format!("Reading data file: {}", path.as_ref().display()));
    let parsed = parse_file_auto(path)?;
    build_dataset(parsed)
}

/// Load and clean raw CSV bytes.
pub fn load_bytes(bytes: &[u8]) -> LoadResult<Dataset> {
    let parsed = parse_bytes_auto(bytes)?;
    build_dataset(parsed)
}

fn build_dataset(parsed: ParseResult) -> LoadResult<Dataset> {
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!("Detected delimiter: '{}'", parsed.delimiter));
    log_success(format!(
        "Read {} rows, {} columns",
        parsed.table.rows.len(),
        parsed.table.headers.len()
    ));

    let source_rows = parsed.table.rows.len();
    let source_columns = parsed.table.headers.len();

    let matrix = normalize(&parsed.table)?;
    if !matrix.dropped_columns.is_empty() {
        log_warning(format!(
            "Dropped pre-aggregated column(s): {}",
            matrix.dropped_columns.join(", ")
        ));
    }
    log_info(format!(
        "Melted into {} long-form rows across {} training types",
        matrix.rows.len(),
        matrix.training_columns.len()
    ));

    let long_count = matrix.rows.len();
    let records = build(matrix.rows);
    let excluded = long_count - records.len();
    log_success(format!(
        "{} records classified ({} cells excluded)",
        records.len(),
        excluded
    ));

    let info = LoadInfo {
        encoding: parsed.encoding,
        delimiter: parsed.delimiter,
        source_rows,
        source_columns,
        training_columns: matrix.training_columns,
        dropped_columns: matrix.dropped_columns,
        record_count: records.len(),
        loaded_at: Utc::now(),
    };

    Ok(Dataset { records, info })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::models::Category;
    use std::io::Write;

    const FIXTURE: &str = "\
CONTRATANTE;OBRAS;COORDENADOR;GERENCIA EXECUTIVA;NR - 10;NR - 35;TOTAL GERAL
Acme;Obra Sul;Carlos;GE Norte;R$ 1.234,56;INTERNO;9999
Beta;Obra Leste;Ana;GE Sul;N/A;R$ 350,00;9999
Gama;Obra Oeste;Carlos;GE Norte;-;Sem Realização;9999
";

    #[test]
    fn test_load_bytes_end_to_end() {
        let ds = load_bytes(FIXTURE.as_bytes()).unwrap();

        // 3 source rows × 2 training columns, minus 3 excluded cells
        assert_eq!(ds.records.len(), 3);
        assert_eq!(ds.info.source_rows, 3);
        assert_eq!(ds.info.record_count, 3);
        assert_eq!(ds.info.training_columns, vec!["NR - 10", "NR - 35"]);
        assert_eq!(ds.info.dropped_columns, vec!["TOTAL GERAL"]);

        let externals: Vec<_> = ds
            .records
            .iter()
            .filter(|r| r.category == Category::ExternalCost)
            .collect();
        assert_eq!(externals.len(), 2);
        assert_eq!(externals[0].cost, 1234.56);
        assert_eq!(externals[1].cost, 350.0);

        let internal = ds
            .records
            .iter()
            .find(|r| r.category == Category::InternalSubstitute)
            .unwrap();
        assert_eq!(internal.training_type, "NR 35");
        assert_eq!(internal.cost, 0.0);
    }

    #[test]
    fn test_load_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records.len(), 3);
        assert_eq!(ds.info.delimiter, ';');
    }

    #[test]
    fn test_missing_file_is_distinguishable() {
        let err = load_file("/no/such/file.csv").unwrap_err();
        assert!(matches!(err, LoadError::FileNotReadable(_)));
    }

    #[test]
    fn test_missing_column_aborts_load() {
        let csv = "CONTRATANTE;COORDENADOR;GERENCIA EXECUTIVA;NR - 10\nAcme;Carlos;GE;100\n";
        let err = load_bytes(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(name) if name == "OBRAS"));
    }
}
