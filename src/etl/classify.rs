//! The value classifier: one raw cell in, one classification out.
//!
//! This is the heart of the ETL. Every cell of the training matrix is one of
//! three things:
//!
//! - an external cost (a positive amount, numeric or "R$ 1.200,00" text),
//! - an internal substitute (the SESMT team delivered the training; text
//!   marked "INTERNO" or the company name),
//! - noise (empty, "N/A", zero, or unparseable) - excluded from everything.
//!
//! No error ever escapes [`classify`]: a failed parse is just the excluded
//! branch, never an exception path.

use crate::models::{CellValue, Classification};

/// Placeholder tokens that mean "no value" (case-sensitive, pre-trim).
const PLACEHOLDER_TOKENS: [&str; 3] = ["-", "nan", "None"];

/// Uppercased markers that mean "not applicable".
const NOT_APPLICABLE_TOKENS: [&str; 4] = ["N/A", "NA", "N.A", "SEM REALIZAÇÃO"];

/// Substrings that mark a training as internally delivered.
///
/// Deliberately a substring match on the whole uppercased cell: the source
/// data writes anything from "Interno" to "PRUMO ENGENHARIA - equipe
/// própria", and a marker beats any number also present in the text.
const INTERNAL_MARKERS: [&str; 2] = ["INTERNO", "PRUMO"];

/// Classify one raw cell value.
///
/// Rules apply in precedence order; the first match wins:
///
/// 1. empty / placeholder tokens → excluded
/// 2. not-applicable markers (uppercased, trimmed) → excluded
/// 3. internal markers anywhere in the text → internal substitute
/// 4. native number: positive → external cost, otherwise excluded
/// 5. Brazilian-locale numeric text: positive parse → external cost,
///    anything else → excluded
pub fn classify(value: &CellValue) -> Classification {
    let text = match value {
        CellValue::Empty => return Classification::Excluded,
        CellValue::Number(n) => {
            if n.is_nan() || *n <= 0.0 {
                return Classification::Excluded;
            }
            return Classification::External { cost: *n };
        }
        CellValue::Text(s) => s.trim(),
    };

    if text.is_empty() || PLACEHOLDER_TOKENS.contains(&text) {
        return Classification::Excluded;
    }

    let upper = text.to_uppercase();

    if NOT_APPLICABLE_TOKENS.contains(&upper.as_str()) {
        return Classification::Excluded;
    }

    // Text markers take precedence over any embedded number
    if INTERNAL_MARKERS.iter().any(|m| upper.contains(m)) {
        return Classification::Internal;
    }

    match parse_brl_amount(&upper) {
        Some(cost) if cost > 0.0 => Classification::External { cost },
        _ => Classification::Excluded,
    }
}

/// Parse a Brazilian-locale amount out of an uppercased cell.
///
/// Strips the `R$` prefix and all whitespace. A comma marks Brazilian
/// decimal notation: `.` is a thousands separator and `,` the decimal
/// point, so "1.234,56" becomes 1234.56. Returns `None` when the remainder
/// is not a number.
fn parse_brl_amount(upper: &str) -> Option<f64> {
    let stripped: String = upper
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let normalized = if stripped.contains(',') {
        stripped.replace('.', "").replace(',', ".")
    } else {
        stripped
    };

    normalized.parse::<f64>().ok()
}
