//! Record types for everything the BFF returns.
//!
//! Payloads are validated at the boundary: optional fields default instead of failing the whole
//! response. Records whose fields go by several names across BFF versions deserialize through a
//! raw struct holding every variant, and the first variant that yields a usable value wins, so a
//! payload carrying two names for one field never fails.

pub mod analysis;
pub mod app;
pub mod auth;
pub mod backlog;
pub mod jira;
pub mod review;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Treats an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Non-negative integer counts; negatives, garbage and null all become `0`.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_count(&Value::deserialize(deserializer)?).unwrap_or(0))
}

/// Walks `candidates` in precedence order and returns the first one `convert` accepts.
pub(crate) fn first_of<T>(
    candidates: &[&Option<Value>],
    convert: fn(&Value) -> Option<T>,
) -> Option<T> {
    candidates
        .iter()
        .filter_map(|candidate| candidate.as_ref())
        .find_map(convert)
}

/// Strings that are not blank.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Identifiers arrive as strings or bare numbers.
pub(crate) fn as_id(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        other => as_text(other),
    }
}

pub(crate) fn as_string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(as_text).collect()),
        _ => None,
    }
}

/// Ratings, scores and percentages: numbers or strings such as "4.5", "4,5" or "55%".
pub(crate) fn as_decimal(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_localized(s, NumberKind::Decimal),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Counts: numbers or strings such as "1,000,000+" or "10.000.000+". Negatives are rejected.
pub(crate) fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_localized(s, NumberKind::Count),
        _ => None,
    }
    .filter(|n| n.is_finite() && *n >= 0.0)
    .map(|n| n.round() as u64)
}

/// RFC 3339 timestamps, plain `YYYY-MM-DD` dates, or epoch milliseconds.
pub(crate) fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberKind {
    Decimal,
    Count,
}

/// Parses numbers written with either `.` or `,` as the decimal mark.
///
/// A lone separator followed by exactly three digits is a thousands group, except a lone `.` in
/// a decimal field ("4.125"). Anything that does not resolve to one reading is `None`.
fn parse_localized(raw: &str, kind: NumberKind) -> Option<f64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let trimmed = compact.trim_end_matches(&['+', '%'][..]);
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }

    let normalized = match (digits.contains(','), digits.contains('.')) {
        (false, false) => digits.to_string(),
        (true, false) => resolve_separator(digits, ',', kind)?,
        (false, true) => resolve_separator(digits, '.', kind)?,
        (true, true) => {
            // the rightmost mark is the decimal one
            let (mark, grouping) = if digits.rfind(',') > digits.rfind('.') {
                (',', '.')
            } else {
                ('.', ',')
            };
            let (whole, fraction) = digits.rsplit_once(mark)?;
            if whole.contains(mark) || fraction.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            if !is_grouped(whole, grouping) {
                return None;
            }
            format!("{}.{}", whole.replace(grouping, ""), fraction)
        }
    };

    let value: f64 = normalized.parse().ok()?;
    Some(if negative { -value } else { value })
}

fn resolve_separator(digits: &str, separator: char, kind: NumberKind) -> Option<String> {
    if digits.matches(separator).count() > 1 {
        return is_grouped(digits, separator).then(|| digits.replace(separator, ""));
    }

    let (whole, fraction) = digits.split_once(separator)?;
    if whole.is_empty() || fraction.is_empty() {
        return None;
    }
    let grouping = fraction.len() == 3
        && whole.len() <= 3
        && (separator == ',' || kind == NumberKind::Count);
    if grouping {
        Some(format!("{whole}{fraction}"))
    } else {
        Some(format!("{whole}.{fraction}"))
    }
}

/// `1,234,567`-style grouping: a 1-3 digit lead, then groups of exactly three.
fn is_grouped(digits: &str, separator: char) -> bool {
    let mut groups = digits.split(separator);
    let lead_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()) && g.chars().all(|c| c.is_ascii_digit()));
    lead_ok && groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}
