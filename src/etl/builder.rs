//! Record builder: classify long-form rows and materialize clean records.
//!
//! Every long row is classified; excluded rows are dropped before a
//! [`Record`] ever exists, so downstream code never needs to re-check.
//! Training-type labels are normalized here ("NR - 10" and "NR 10" are the
//! same training) and the per-record search key is derived.

use crate::etl::classify::classify;
use crate::models::{LongRow, Record};

/// Build the clean record set from long-form rows.
///
/// Output order is stable with respect to input order; no sorting happens
/// at this stage.
pub fn build(rows: Vec<LongRow>) -> Vec<Record> {
    rows.into_iter().filter_map(build_one).collect()
}

fn build_one(row: LongRow) -> Option<Record> {
    let (cost, category) = classify(&row.value).into_parts()?;

    let training_type = normalize_training_label(&row.training_type);
    let search_key = format!(
        "{} {} {} {} {}",
        training_type, row.site, row.coordinator, row.executive_unit, row.contracting_party
    )
    .to_uppercase();

    Some(Record {
        contracting_party: row.contracting_party,
        site: row.site,
        coordinator: row.coordinator,
        executive_unit: row.executive_unit,
        training_type,
        cost,
        category,
        search_key,
    })
}

/// Collapse inconsistent source labels of the same training type.
///
/// The source writes both "NR - 10" and "NR 10" for the same training;
/// everything converges on the latter.
pub fn normalize_training_label(label: &str) -> String {
    label.replace("NR - ", "NR ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CellValue};

    fn long_row(training: &str, value: CellValue) -> LongRow {
        LongRow {
            contracting_party: "Acme".into(),
            site: "Obra Sul".into(),
            coordinator: "Carlos".into(),
            executive_unit: "GE Norte".into(),
            training_type: training.into(),
            value,
        }
    }

    #[test]
    fn test_excluded_rows_dropped() {
        let rows = vec![
            long_row("NR - 10", CellValue::Text("R$ 100,00".into())),
            long_row("NR - 10", CellValue::Text("N/A".into())),
            long_row("NR - 35", CellValue::Empty),
            long_row("NR - 35", CellValue::Text("INTERNO".into())),
        ];
        let records = build(rows);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, Category::ExternalCost);
        assert_eq!(records[0].cost, 100.0);
        assert_eq!(records[1].category, Category::InternalSubstitute);
        assert_eq!(records[1].cost, 0.0);
    }

    #[test]
    fn test_training_label_normalized() {
        assert_eq!(normalize_training_label("NR - 10"), "NR 10");
        assert_eq!(normalize_training_label("  NR 35 "), "NR 35");
        assert_eq!(normalize_training_label("CIPA"), "CIPA");

        let records = build(vec![long_row("NR - 10", CellValue::Number(50.0))]);
        assert_eq!(records[0].training_type, "NR 10");
    }

    #[test]
    fn test_search_key_fields_and_case() {
        let records = build(vec![long_row("NR - 10", CellValue::Number(50.0))]);
        let key = &records[0].search_key;

        assert_eq!(key, "NR 10 OBRA SUL CARLOS GE NORTE ACME");
        // Substring search works for any field
        assert!(key.contains("CARLOS"));
        assert!(key.contains("ACME"));
    }

    #[test]
    fn test_input_order_preserved() {
        let rows = vec![
            long_row("NR - 35", CellValue::Number(10.0)),
            long_row("NR - 10", CellValue::Number(20.0)),
        ];
        let records = build(rows);
        assert_eq!(records[0].training_type, "NR 35");
        assert_eq!(records[1].training_type, "NR 10");
    }
}
