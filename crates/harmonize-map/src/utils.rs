//! Text normalization and polars cell helpers.

use std::collections::{BTreeSet, HashSet};

use polars::prelude::*;

/// Normalizes text for comparison by lowercasing and replacing separators with spaces.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Key used when matching categorical values: trimmed and lower-cased.
pub fn normalize_value(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Splits a column name into lower-case tokens, breaking on separators and
/// camelCase boundaries. Digit-only tokens are dropped.
pub fn token_set(raw: &str) -> BTreeSet<String> {
    let mut normalized = String::new();
    let mut prev_lower = false;
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if prev_lower && ch.is_uppercase() {
                normalized.push(' ');
            }
            normalized.push(ch);
            prev_lower = ch.is_lowercase();
        } else {
            normalized.push(' ');
            prev_lower = false;
        }
    }
    normalized
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|token| !token.chars().all(|ch| ch.is_ascii_digit()))
        .filter(|token| !is_stopword(token))
        .collect()
}

fn is_stopword(token: &str) -> bool {
    matches!(
        token,
        "of" | "and" | "the" | "to" | "for" | "in" | "on" | "at" | "with" | "by" | "from"
    )
}

/// Converts a Polars AnyValue to a String representation.
/// Returns empty string for Null, formats floats without trailing zeros.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Cell values of a column as optional strings; nulls stay `None`.
pub fn column_values(column: &Column) -> Vec<Option<String>> {
    (0..column.len())
        .map(|idx| match column.get(idx) {
            Ok(AnyValue::Null) | Err(_) => None,
            Ok(value) => Some(any_to_string(value)),
        })
        .collect()
}

/// Distinct non-null values of a column in first-appearance order.
///
/// With `trim`, values are trimmed before deduplication.
pub fn distinct_values(column: &Column, trim: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in column_values(column).into_iter().flatten() {
        let value = if trim {
            value.trim().to_string()
        } else {
            value
        };
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}
