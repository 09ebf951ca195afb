//! Lenient cell coercion.
//!
//! Recipe sheets are hand-edited, so numbers arrive as numbers, as text, or as placeholders like
//! `X`. These helpers never fail: anything unusable is "absent" and the caller picks the default.

use calamine::Data;

use crate::ingestion::cell_display;

/// Text values that mean "no value entered" (compared case-insensitively).
pub const PLACEHOLDERS: [&str; 2] = ["x", "undefined"];

/// Parse text as an integer via float, truncating toward zero.
///
/// Empty text, placeholders, non-numeric text and non-finite values yield `None`.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() || PLACEHOLDERS.iter().any(|p| p.eq_ignore_ascii_case(s)) {
        return None;
    }
    s.parse::<f64>().ok().and_then(float_to_int)
}

fn float_to_int(f: f64) -> Option<i64> {
    let t = f.trunc();
    if t.is_finite() && t >= i64::MIN as f64 && t <= i64::MAX as f64 {
        Some(t as i64)
    } else {
        None
    }
}

/// Integer value of a cell, if it holds a usable number.
pub fn cell_to_int(cell: Option<&Data>) -> Option<i64> {
    match cell? {
        Data::Int(i) => Some(*i),
        Data::Float(f) => float_to_int(*f),
        Data::String(s) => parse_int(s),
        _ => None,
    }
}

/// Integer value of a cell, or `default` when absent.
pub fn cell_to_int_or(cell: Option<&Data>, default: i64) -> i64 {
    cell_to_int(cell).unwrap_or(default)
}

/// Trimmed text of a cell; `None` when the cell is missing, empty or blank.
pub fn cell_to_text(cell: Option<&Data>) -> Option<String> {
    let c = cell?;
    if matches!(c, Data::Empty | Data::Error(_)) {
        return None;
    }
    let text = cell_display(c);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Trimmed text of a cell, or `default` when absent.
pub fn cell_to_text_or(cell: Option<&Data>, default: &str) -> String {
    cell_to_text(cell).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_int_accepts_integer_and_float_text() {
        assert_eq!(parse_int("250"), Some(250));
        assert_eq!(parse_int(" 250 "), Some(250));
        assert_eq!(parse_int("312.7"), Some(312));
        assert_eq!(parse_int("-4.9"), Some(-4));
    }

    #[test]
    fn parse_int_treats_placeholders_and_garbage_as_absent() {
        assert_eq!(parse_int("X"), None);
        assert_eq!(parse_int("x"), None);
        assert_eq!(parse_int("undefined"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("   "), None);
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int("NaN"), None);
        assert_eq!(parse_int("inf"), None);
    }

    #[test]
    fn cell_to_int_handles_each_cell_kind() {
        assert_eq!(cell_to_int(Some(&Data::Int(7))), Some(7));
        assert_eq!(cell_to_int(Some(&Data::Float(350.0))), Some(350));
        assert_eq!(cell_to_int(Some(&Data::String("250".into()))), Some(250));
        assert_eq!(cell_to_int(Some(&Data::Bool(true))), None);
        assert_eq!(cell_to_int(Some(&Data::Empty)), None);
        assert_eq!(cell_to_int(None), None);
    }

    #[test]
    fn cell_to_int_or_falls_back_to_default() {
        assert_eq!(cell_to_int_or(Some(&Data::String("X".into())), 0), 0);
        assert_eq!(cell_to_int_or(Some(&Data::String("".into())), 0), 0);
        assert_eq!(cell_to_int_or(Some(&Data::String("abc".into())), 9), 9);
        assert_eq!(cell_to_int_or(Some(&Data::String("250".into())), 0), 250);
    }

    #[test]
    fn cell_to_text_trims_and_defaults() {
        assert_eq!(cell_to_text(Some(&Data::String("  20 min ".into()))), Some("20 min".to_string()));
        assert_eq!(cell_to_text(Some(&Data::String("   ".into()))), None);
        assert_eq!(cell_to_text(Some(&Data::Float(4.0))), Some("4".to_string()));
        assert_eq!(cell_to_text_or(None, "Classic"), "Classic");
        assert_eq!(cell_to_text_or(Some(&Data::Empty), "no"), "no");
    }
}
