//! Reference evaluator for filter trees.
//!
//! This is the predicate contract a query-translation layer must honor when
//! wiring trees to the backend; it also runs as-is for client-side checks
//! over already-loaded rows. Evaluation is total: unresolvable fields,
//! non-numeric values where numbers are expected, and unparsable dates fail
//! the base predicate rather than erroring. Negated operators are the
//! logical negation of their base predicate.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::borrow::Cow;
use std::cmp::Ordering;

use crate::engine::types::{
    FieldPath, Filter, FilterGroup, FilterNode, FilterOperator, GroupOperator, RecordValue,
    ValueType,
};

/// Resolve a dotted field path against a record.
pub fn resolve_field_value<'a>(
    root: Option<&'a RecordValue>,
    path: &FieldPath,
) -> Option<&'a RecordValue> {
    let mut current = root;
    for part in &path.0 {
        match current {
            Some(RecordValue::Object(map)) => {
                current = map.get(part);
            }
            _ => return None,
        }
    }
    current
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Textual form of a scalar record value, for membership and substring
/// tests. Numbers render without a trailing ".0" so they match the string
/// values the UI stores.
fn value_as_text(value: &RecordValue) -> Option<Cow<'_, str>> {
    match value {
        RecordValue::Str(s) => Some(Cow::Borrowed(s.as_str())),
        RecordValue::Number(n) => Some(Cow::Owned(format_number(*n))),
        RecordValue::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

fn value_as_number(value: &RecordValue) -> Option<f64> {
    match value {
        RecordValue::Number(n) => Some(*n),
        RecordValue::Str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse().ok()
}

/// Dates arrive as strings: RFC 3339 timestamps from the backend, bare
/// `YYYY-MM-DD` from date pickers.
fn parse_date(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()
}

fn value_as_date(value: &RecordValue) -> Option<NaiveDateTime> {
    parse_date(value.as_str()?)
}

fn is_member(value: &RecordValue, values: &[smol_str::SmolStr]) -> bool {
    value_as_text(value)
        .map(|text| values.iter().any(|v| v.as_str() == text.as_ref()))
        .unwrap_or(false)
}

/// `is` / `equals`: equality for single-value fields, membership for
/// multiselect. An array-valued record field matches when any element is a
/// member.
fn matches_equality(filter: &Filter, value: Option<&RecordValue>) -> bool {
    let Some(value) = value else { return false };
    match filter.value_type {
        ValueType::Number => match (
            value_as_number(value),
            filter.values.first().and_then(|v| parse_number(v)),
        ) {
            (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
            _ => false,
        },
        ValueType::Date => match (
            value_as_date(value),
            filter.values.first().and_then(|v| parse_date(v)),
        ) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        _ => {
            if let RecordValue::Array(items) = value {
                items.iter().any(|item| is_member(item, &filter.values))
            } else {
                is_member(value, &filter.values)
            }
        }
    }
}

/// `contains`: case-insensitive substring on the record value's text form.
fn matches_substring(filter: &Filter, value: Option<&RecordValue>) -> bool {
    let (Some(value), Some(needle)) = (value, filter.values.first()) else {
        return false;
    };
    let Some(text) = value_as_text(value) else {
        return false;
    };
    text.to_lowercase().contains(&needle.to_lowercase())
}

/// Ordering of the record value against the first filter value, under the
/// filter's value type. None when either side does not coerce.
fn compare_to_bound(filter: &Filter, value: Option<&RecordValue>) -> Option<Ordering> {
    let value = value?;
    let bound = filter.values.first()?;
    match filter.value_type {
        ValueType::Number => value_as_number(value)?.partial_cmp(&parse_number(bound)?),
        ValueType::Date => Some(value_as_date(value)?.cmp(&parse_date(bound)?)),
        _ => None,
    }
}

/// `between`: inclusive on both ends; reversed bounds are swapped before
/// evaluating.
fn matches_between(filter: &Filter, value: Option<&RecordValue>) -> bool {
    let (Some(value), Some(first), Some(second)) =
        (value, filter.values.first(), filter.values.get(1))
    else {
        return false;
    };
    match filter.value_type {
        ValueType::Number => {
            let (Some(v), Some(a), Some(b)) = (
                value_as_number(value),
                parse_number(first),
                parse_number(second),
            ) else {
                return false;
            };
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            lo <= v && v <= hi
        }
        ValueType::Date => {
            let (Some(v), Some(a), Some(b)) =
                (value_as_date(value), parse_date(first), parse_date(second))
            else {
                return false;
            };
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            lo <= v && v <= hi
        }
        _ => false,
    }
}

/// Evaluate a single leaf condition against a record.
pub fn evaluate_filter(filter: &Filter, record: &RecordValue) -> bool {
    let path = FieldPath::new(&filter.field_id);
    let value = resolve_field_value(Some(record), &path);

    match filter.operator {
        FilterOperator::Is | FilterOperator::Equals => matches_equality(filter, value),
        FilterOperator::IsNot | FilterOperator::NotEquals => !matches_equality(filter, value),
        FilterOperator::Contains => matches_substring(filter, value),
        FilterOperator::NotContains => !matches_substring(filter, value),
        FilterOperator::GreaterThan | FilterOperator::After => {
            compare_to_bound(filter, value) == Some(Ordering::Greater)
        }
        FilterOperator::LessThan | FilterOperator::Before => {
            compare_to_bound(filter, value) == Some(Ordering::Less)
        }
        FilterOperator::Between => matches_between(filter, value),
    }
}

pub fn evaluate_node(node: &FilterNode, record: &RecordValue) -> bool {
    match node {
        FilterNode::Filter(f) => evaluate_filter(f, record),
        FilterNode::Group(g) => evaluate_group(g, record),
    }
}

/// Evaluate a group against a record. An empty group means "no constraint"
/// and is true for both combinators; `not` negates after combining.
pub fn evaluate_group(group: &FilterGroup, record: &RecordValue) -> bool {
    let combined = if group.children.is_empty() {
        true
    } else {
        match group.operator {
            GroupOperator::And => group
                .children
                .iter()
                .all(|child| evaluate_node(child, record)),
            GroupOperator::Or => group
                .children
                .iter()
                .any(|child| evaluate_node(child, record)),
        }
    };
    if group.not {
        !combined
    } else {
        combined
    }
}

/// Evaluate a tree over a slice of records, in parallel where available.
pub fn evaluate_batch(group: &FilterGroup, records: &[RecordValue]) -> Vec<bool> {
    #[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
    {
        use rayon::prelude::*;
        records
            .par_iter()
            .map(|record| evaluate_group(group, record))
            .collect()
    }

    #[cfg(any(target_arch = "wasm32", not(feature = "parallel")))]
    {
        records
            .iter()
            .map(|record| evaluate_group(group, record))
            .collect()
    }
}

/// Indices of the records a tree matches.
pub fn matching_indices(group: &FilterGroup, records: &[RecordValue]) -> Vec<usize> {
    evaluate_batch(group, records)
        .into_iter()
        .enumerate()
        .filter_map(|(idx, hit)| hit.then_some(idx))
        .collect()
}
