//! Matrix normalizer: wide training matrix → long-form rows.
//!
//! The source spreadsheet is a wide matrix (one row per contract/site, one
//! column per training type). Before classification it must be:
//!
//! 1. stripped of pre-aggregated "TOTAL"/"SOMA" columns, which would
//!    double-count once every remaining column is treated as a training type,
//! 2. checked for the four identity columns (load-fatal if one is missing),
//! 3. melted into one [`LongRow`] per (source row × training column).

use crate::error::{LoadError, LoadResult};
use crate::models::{CellValue, LongRow};
use crate::parser::RawTable;

/// Identity columns required by exact name, in source order.
pub const IDENTITY_COLUMNS: [&str; 4] =
    ["CONTRATANTE", "OBRAS", "COORDENADOR", "GERENCIA EXECUTIVA"];

/// Column-name fragments that mark a pre-aggregated column.
const AGGREGATE_FRAGMENTS: [&str; 2] = ["TOTAL", "SOMA"];

/// Result of normalizing a wide table.
#[derive(Debug, Clone)]
pub struct NormalizedMatrix {
    /// Long-form rows, one per (source row × training column), in source order.
    pub rows: Vec<LongRow>,
    /// Training-type column names that survived, in source order.
    pub training_columns: Vec<String>,
    /// Aggregate columns that were dropped.
    pub dropped_columns: Vec<String>,
}

/// Normalize a wide table into long-form rows.
///
/// Fails with [`LoadError::MissingColumn`] when an identity column is
/// absent; that is fatal for the whole load, not per-row.
pub fn normalize(table: &RawTable) -> LoadResult<NormalizedMatrix> {
    let dropped_columns: Vec<String> = table
        .headers
        .iter()
        .filter(|h| is_aggregate_column(h))
        .cloned()
        .collect();

    let mut identity_idx = [0usize; 4];
    for (slot, name) in identity_idx.iter_mut().zip(IDENTITY_COLUMNS) {
        *slot = table
            .headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))?;
    }

    // Everything that is neither identity nor aggregate is a training type
    let training: Vec<(usize, &String)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(i, h)| !identity_idx.contains(i) && !is_aggregate_column(h))
        .collect();

    let mut rows = Vec::with_capacity(table.rows.len() * training.len());
    for source_row in &table.rows {
        let contracting_party = cell_text(source_row.get(identity_idx[0]));
        let site = cell_text(source_row.get(identity_idx[1]));
        let coordinator = cell_text(source_row.get(identity_idx[2]));
        let executive_unit = cell_text(source_row.get(identity_idx[3]));

        for &(col, name) in &training {
            rows.push(LongRow {
                contracting_party: contracting_party.clone(),
                site: site.clone(),
                coordinator: coordinator.clone(),
                executive_unit: executive_unit.clone(),
                training_type: name.clone(),
                value: source_row.get(col).cloned().unwrap_or(CellValue::Empty),
            });
        }
    }

    Ok(NormalizedMatrix {
        rows,
        training_columns: training.into_iter().map(|(_, h)| h.clone()).collect(),
        dropped_columns,
    })
}

fn is_aggregate_column(header: &str) -> bool {
    let upper = header.to_uppercase();
    AGGREGATE_FRAGMENTS.iter().any(|f| upper.contains(f))
}

/// Render an identity cell as text (identity columns occasionally hold
/// numeric codes).
fn cell_text(cell: Option<&CellValue>) -> String {
    match cell {
        Some(CellValue::Text(s)) => s.clone(),
        Some(CellValue::Number(n)) => format!("{}", n),
        Some(CellValue::Empty) | None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_content;

    fn table(csv: &str) -> RawTable {
        parse_content(csv, ';').unwrap()
    }

    #[test]
    fn test_melt_shape() {
        let t = table(
            "CONTRATANTE;OBRAS;COORDENADOR;GERENCIA EXECUTIVA;NR - 10;NR - 35\n\
             Acme;Obra Sul;Carlos;GE Norte;R$ 100,00;INTERNO\n\
             Beta;Obra Leste;Ana;GE Sul;N/A;R$ 350,00",
        );
        let m = normalize(&t).unwrap();

        // 2 rows × 2 training columns
        assert_eq!(m.rows.len(), 4);
        assert_eq!(m.training_columns, vec!["NR - 10", "NR - 35"]);
        assert!(m.dropped_columns.is_empty());

        let first = &m.rows[0];
        assert_eq!(first.contracting_party, "Acme");
        assert_eq!(first.site, "Obra Sul");
        assert_eq!(first.coordinator, "Carlos");
        assert_eq!(first.executive_unit, "GE Norte");
        assert_eq!(first.training_type, "NR - 10");
    }

    #[test]
    fn test_total_and_soma_columns_dropped() {
        let t = table(
            "CONTRATANTE;OBRAS;COORDENADOR;GERENCIA EXECUTIVA;NR - 10;TOTAL GERAL;Soma Anual\n\
             Acme;Obra Sul;Carlos;GE Norte;100;9999;9999",
        );
        let m = normalize(&t).unwrap();

        assert_eq!(m.training_columns, vec!["NR - 10"]);
        assert_eq!(m.dropped_columns, vec!["TOTAL GERAL", "Soma Anual"]);
        assert_eq!(m.rows.len(), 1);
    }

    #[test]
    fn test_missing_identity_column_is_fatal() {
        let t = table(
            "CONTRATANTE;COORDENADOR;GERENCIA EXECUTIVA;NR - 10\n\
             Acme;Carlos;GE Norte;100",
        );
        let err = normalize(&t).unwrap_err();
        match err {
            LoadError::MissingColumn(name) => assert_eq!(name, "OBRAS"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_numeric_identity_cells_become_text() {
        let t = table(
            "CONTRATANTE;OBRAS;COORDENADOR;GERENCIA EXECUTIVA;NR - 10\n\
             4512;Obra Sul;Carlos;GE Norte;100",
        );
        let m = normalize(&t).unwrap();
        assert_eq!(m.rows[0].contracting_party, "4512");
    }
}
