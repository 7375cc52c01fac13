use crate::fields::{FieldValue, Unit};
use serde::Serialize;

/// Shown wherever an optional attribute is absent.
pub const MISSING: &str = "—";

/// Badges shown per table cell before collapsing the rest into "+N".
pub const TABLE_BADGE_LIMIT: usize = 2;
/// Tags shown per card before collapsing the rest into "+N".
pub const CARD_TAG_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Cell {
    Text { value: String },
    Badges { shown: Vec<String>, overflow: usize },
    Link { href: String },
    Missing,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text { value: value.into() }
    }

    /// Plain-text rendering, e.g. for terminals and exports.
    pub fn display(&self) -> String {
        match self {
            Cell::Text { value } => value.clone(),
            Cell::Link { href } => href.clone(),
            Cell::Badges { shown, overflow } => {
                let mut s = shown.join(", ");
                if *overflow > 0 {
                    s.push_str(&format!(" +{overflow}"));
                }
                s
            }
            Cell::Missing => MISSING.to_string(),
        }
    }
}

/// First `limit` values as badges, the remainder counted in `overflow`.
pub fn badges(values: &[String], limit: usize) -> Cell {
    let shown: Vec<String> = values.iter().take(limit).cloned().collect();
    let overflow = values.len().saturating_sub(limit);
    Cell::Badges { shown, overflow }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Fixed number of fraction digits, thousands separators on the integer part.
pub fn format_fixed(n: f64, decimals: usize) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let abs = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = abs.split_once('.').unwrap_or((abs.as_str(), ""));
    let mut out = group_thousands(int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    if n < 0.0 && out.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.insert(0, '-');
    }
    out
}

/// Locale-style number: thousands separators, up to three fraction digits,
/// trailing zeros dropped.
pub fn format_number(n: f64) -> String {
    let fixed = format_fixed(n, 3);
    match fixed.split_once('.') {
        Some((int_part, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                int_part.to_string()
            } else {
                format!("{int_part}.{frac}")
            }
        }
        None => fixed,
    }
}

/// Render a present value according to its unit.
pub fn format_value(value: &FieldValue, unit: Unit) -> String {
    match (value, unit) {
        (FieldValue::Number(n), Unit::Percent) => format!("{}%", format_fixed(*n, 1)),
        (FieldValue::Number(n), Unit::Fraction) => format!("{}%", format_fixed(n * 100.0, 2)),
        (FieldValue::Number(n), Unit::Days) => format!("{} days", format_number(*n)),
        (FieldValue::Number(n), Unit::Currency) => format!("${}", format_fixed(*n, 2)),
        (FieldValue::Number(n), Unit::Stars) => format!("{} / 5", format_fixed(*n, 1)),
        (FieldValue::Number(n), Unit::Year) => format!("{}", *n as i64),
        (FieldValue::Number(n), _) => format_number(*n),
        (FieldValue::Text(s), _) => s.clone(),
        (FieldValue::List(items), _) => items.join(", "),
    }
}

/// Default cell: numbers with separators, lists as badges, absence as [`Cell::Missing`].
pub fn default_cell(value: Option<&FieldValue>) -> Cell {
    match value {
        None => Cell::Missing,
        Some(FieldValue::Number(n)) => Cell::text(format_number(*n)),
        Some(FieldValue::Text(s)) => Cell::text(s.clone()),
        Some(FieldValue::List(items)) => badges(items, TABLE_BADGE_LIMIT),
    }
}
