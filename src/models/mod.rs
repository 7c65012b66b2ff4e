//! Domain models for the QSSMA cost pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`CellValue`] - raw spreadsheet cell at the classifier boundary
//! - [`Category`] - classification outcome kept on a record
//! - [`Classification`] - per-cell classification result
//! - [`LongRow`] - one melted (identity, training type, value) row
//! - [`Record`] - one cleaned, classified record, the unit of all
//!   downstream filtering and aggregation

use serde::{Deserialize, Serialize};

// =============================================================================
// Raw Cell Value
// =============================================================================

/// A raw spreadsheet cell value.
///
/// Source cells are loosely typed: numeric cells, free text ("INTERNO",
/// "R$ 1.200,00", "N/A") or nothing at all. Modelling the three shapes
/// explicitly lets the classifier match them exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// A native numeric cell.
    Number(f64),
    /// A textual cell (may still hold a locale-formatted number).
    Text(String),
    /// An empty or missing cell.
    Empty,
}

impl CellValue {
    /// Type a CSV field the way a spreadsheet engine would.
    ///
    /// A field that parses as a plain float is a numeric cell; a blank
    /// field is empty; everything else stays text. Locale-formatted
    /// amounts like "1.234,56" fail the plain parse and remain text,
    /// which is what the classifier's string branch expects.
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::Text(trimmed.to_string()),
        }
    }
}

// =============================================================================
// Category
// =============================================================================

/// Classification category carried by every record.
///
/// Serialized with the dashboard's display labels so API payloads match
/// what the frontend shows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    /// Training paid to an outside provider; its cost counts toward budget.
    #[serde(rename = "Externo (Custo)")]
    ExternalCost,
    /// Training delivered by the internal safety team; counts as a saving.
    #[serde(rename = "Interno (SESMT)")]
    InternalSubstitute,
}

impl Category {
    /// Display label used by the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExternalCost => "Externo (Custo)",
            Self::InternalSubstitute => "Interno (SESMT)",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Result of classifying one raw cell.
///
/// The variants encode the invariants directly: an external outcome always
/// carries a positive cost, an internal outcome is always a zero-cost
/// saving, and an excluded cell carries nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Not applicable / unparseable; the cell produces no record.
    Excluded,
    /// External training cost (always > 0).
    External { cost: f64 },
    /// Internal substitute (cost 0, counted as a saving).
    Internal,
}

impl Classification {
    /// Derived cost, if the cell was not excluded.
    pub fn cost(&self) -> Option<f64> {
        match self {
            Self::Excluded => None,
            Self::External { cost } => Some(*cost),
            Self::Internal => Some(0.0),
        }
    }

    /// Derived category, if the cell was not excluded.
    pub fn category(&self) -> Option<Category> {
        match self {
            Self::Excluded => None,
            Self::External { .. } => Some(Category::ExternalCost),
            Self::Internal => Some(Category::InternalSubstitute),
        }
    }

    /// Whether the cell was dropped.
    pub fn is_excluded(&self) -> bool {
        matches!(self, Self::Excluded)
    }

    /// Split into `(cost, category)`, or `None` when excluded.
    pub fn into_parts(self) -> Option<(f64, Category)> {
        match self {
            Self::Excluded => None,
            Self::External { cost } => Some((cost, Category::ExternalCost)),
            Self::Internal => Some((0.0, Category::InternalSubstitute)),
        }
    }
}

// =============================================================================
// Long-Form Row
// =============================================================================

/// One melted row: the identity columns of a source row paired with a
/// single training-type column and its raw value.
///
/// Produced by the normalizer, consumed by the record builder. Rows whose
/// value classifies as excluded never become a [`Record`].
#[derive(Debug, Clone)]
pub struct LongRow {
    pub contracting_party: String,
    pub site: String,
    pub coordinator: String,
    pub executive_unit: String,
    pub training_type: String,
    pub value: CellValue,
}

// =============================================================================
// Record
// =============================================================================

/// One cleaned record: identity, training type, and classified outcome.
///
/// Immutable after construction. A record set never contains excluded
/// rows; exclusion happens before a record is materialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Contracting party (`CONTRATANTE`).
    pub contracting_party: String,
    /// Site / works (`OBRAS`).
    pub site: String,
    /// Coordinator (`COORDENADOR`).
    pub coordinator: String,
    /// Executive management unit (`GERENCIA EXECUTIVA`).
    pub executive_unit: String,
    /// Normalized training-type label (e.g. "NR 10").
    pub training_type: String,
    /// Derived cost (0 for internal substitutes).
    pub cost: f64,
    /// Derived category.
    pub category: Category,
    /// Uppercased concatenation of all textual fields, for substring search.
    pub search_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_typing() {
        assert_eq!(CellValue::from_field("1200"), CellValue::Number(1200.0));
        assert_eq!(CellValue::from_field("  1200.50 "), CellValue::Number(1200.5));
        assert_eq!(CellValue::from_field(""), CellValue::Empty);
        assert_eq!(CellValue::from_field("   "), CellValue::Empty);
        assert_eq!(
            CellValue::from_field("R$ 1.234,56"),
            CellValue::Text("R$ 1.234,56".to_string())
        );
        // Locale-formatted amounts must stay textual
        assert_eq!(
            CellValue::from_field("1.234,56"),
            CellValue::Text("1.234,56".to_string())
        );
    }

    #[test]
    fn test_classification_parts() {
        assert_eq!(Classification::Excluded.into_parts(), None);
        assert_eq!(
            Classification::External { cost: 350.0 }.into_parts(),
            Some((350.0, Category::ExternalCost))
        );
        assert_eq!(
            Classification::Internal.into_parts(),
            Some((0.0, Category::InternalSubstitute))
        );
    }

    #[test]
    fn test_classification_accessors_agree() {
        // cost and category are both None or both Some, never mixed
        for c in [
            Classification::Excluded,
            Classification::External { cost: 1.0 },
            Classification::Internal,
        ] {
            assert_eq!(c.cost().is_some(), c.category().is_some());
        }
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::ExternalCost.label(), "Externo (Custo)");
        assert_eq!(Category::InternalSubstitute.label(), "Interno (SESMT)");
    }

    #[test]
    fn test_category_serde_labels() {
        let json = serde_json::to_string(&Category::InternalSubstitute).unwrap();
        assert_eq!(json, "\"Interno (SESMT)\"");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::InternalSubstitute);
    }
}
