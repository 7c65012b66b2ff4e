//! Brazilian-locale currency formatting.
//!
//! The presentation layer displays every amount through this one rule, so
//! it must stay exact: thousands grouped with `.`, decimal `,`, two places,
//! `R$ ` prefix. Zero and missing amounts render as `R$ 0,00`.

/// Format an amount as Brazilian currency (`R$ 1.234,56`).
pub fn format_brl(value: f64) -> String {
    if value.is_nan() || value == 0.0 {
        return "R$ 0,00".to_string();
    }

    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("R$ {sign}{grouped},{fraction:02}")
}
