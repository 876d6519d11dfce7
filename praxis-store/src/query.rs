//! Store-level query predicates
//!
//! A [`Filter`] is a conjunction of per-field conditions evaluated against
//! JSON documents; an empty filter matches everything. Backends either
//! evaluate these directly (the in-memory engine) or translate them into
//! their native query language.

use chrono::DateTime;
use serde_json::Value;
use std::cmp::Ordering;

/// A single comparison against one top-level document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// Exact value equality.
    Eq(Value),
    /// Case-insensitive substring match against a string field.
    ContainsCi(String),
    /// Inclusive lower bound.
    Gte(Value),
    /// Inclusive upper bound.
    Lte(Value),
}

/// One field condition of a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub comparison: Comparison,
}

/// Conjunction of conditions; empty means match-all.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            comparison: Comparison::Eq(value.into()),
        });
        self
    }

    pub fn contains_ci(mut self, field: impl Into<String>, needle: impl Into<String>) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            comparison: Comparison::ContainsCi(needle.into()),
        });
        self
    }

    pub fn gte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            comparison: Comparison::Gte(value.into()),
        });
        self
    }

    pub fn lte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            comparison: Comparison::Lte(value.into()),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// The equality value for `field`, when this filter pins it exactly.
    /// Used by upserting backends to carry key fields into inserts.
    pub fn eq_value(&self, field: &str) -> Option<&Value> {
        self.conditions.iter().find_map(|c| match &c.comparison {
            Comparison::Eq(v) if c.field == field => Some(v),
            _ => None,
        })
    }

    /// Evaluate this filter against a JSON document.
    pub fn matches(&self, document: &Value) -> bool {
        self.conditions.iter().all(|condition| {
            let field = document.get(&condition.field);
            match &condition.comparison {
                Comparison::Eq(expected) => field == Some(expected),
                Comparison::ContainsCi(needle) => field
                    .and_then(Value::as_str)
                    .map(|s| s.to_lowercase().contains(&needle.to_lowercase()))
                    .unwrap_or(false),
                Comparison::Gte(bound) => field
                    .and_then(|v| partial_compare(v, bound))
                    .map(|ord| ord != Ordering::Less)
                    .unwrap_or(false),
                Comparison::Lte(bound) => field
                    .and_then(|v| partial_compare(v, bound))
                    .map(|ord| ord != Ordering::Greater)
                    .unwrap_or(false),
            }
        })
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// Single-field sort specification. Documents that compare equal keep
/// their insertion order (backends must sort stably).
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: String,
    pub order: Order,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: Order::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: Order::Desc,
        }
    }

    /// Compare two documents under this sort.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let ordering = match (a.get(&self.field), b.get(&self.field)) {
            (Some(a), Some(b)) => partial_compare(a, b).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        match self.order {
            Order::Asc => ordering,
            Order::Desc => ordering.reverse(),
        }
    }
}

/// Compare two JSON values of like kind. Strings that both parse as
/// RFC 3339 timestamps compare as instants, so mixed subsecond precision
/// still orders correctly. Unlike kinds are incomparable.
pub fn partial_compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => {
            match (
                DateTime::parse_from_rfc3339(a),
                DateTime::parse_from_rfc3339(b),
            ) {
                (Ok(a), Ok(b)) => Some(a.cmp(&b)),
                _ => Some(a.cmp(b)),
            }
        }
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = Filter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&json!({"anything": 1})));
    }

    #[test]
    fn test_eq_condition() {
        let filter = Filter::new().eq("status", "in_progress");
        assert!(filter.matches(&json!({"status": "in_progress"})));
        assert!(!filter.matches(&json!({"status": "completed"})));
        assert!(!filter.matches(&json!({})));
    }

    #[test]
    fn test_contains_ci_condition() {
        let filter = Filter::new().contains_ci("name", "TUT");
        assert!(filter.matches(&json!({"name": "Rust Tutor"})));
        assert!(filter.matches(&json!({"name": "tutorial"})));
        assert!(!filter.matches(&json!({"name": "mentor"})));
        assert!(!filter.matches(&json!({"name": 7})));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let filter = Filter::new().gte("n", 2).lte("n", 4);
        assert!(!filter.matches(&json!({"n": 1})));
        assert!(filter.matches(&json!({"n": 2})));
        assert!(filter.matches(&json!({"n": 3})));
        assert!(filter.matches(&json!({"n": 4})));
        assert!(!filter.matches(&json!({"n": 5})));
    }

    #[test]
    fn test_timestamp_strings_compare_as_instants() {
        // Differing subsecond precision sorts correctly.
        let a = json!("2026-01-01T00:00:00Z");
        let b = json!("2026-01-01T00:00:00.500Z");
        assert_eq!(partial_compare(&a, &b), Some(Ordering::Less));

        let filter = Filter::new()
            .gte("start_time", "2026-01-01T00:00:00Z")
            .lte("start_time", "2026-01-02T00:00:00Z");
        assert!(filter.matches(&json!({"start_time": "2026-01-01T12:00:00.123456Z"})));
        assert!(!filter.matches(&json!({"start_time": "2026-01-03T00:00:00Z"})));
    }

    #[test]
    fn test_sort_desc() {
        let sort = Sort::desc("generated_at");
        let older = json!({"generated_at": "2026-01-01T00:00:00Z"});
        let newer = json!({"generated_at": "2026-02-01T00:00:00Z"});
        assert_eq!(sort.compare(&newer, &older), Ordering::Less);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_empty_filter_matches_any_document(n in any::<i64>(), s in ".*") {
            let doc = json!({"n": n, "s": s});
            prop_assert!(Filter::new().matches(&doc));
        }

        #[test]
        fn prop_point_range_matches_exactly_its_value(x in any::<i32>(), y in any::<i32>()) {
            let filter = Filter::new().gte("n", x).lte("n", x);
            let doc_x = json!({"n": x});
            prop_assert!(filter.matches(&doc_x));
            prop_assert_eq!(filter.matches(&json!({"n": y})), x == y);
        }

        #[test]
        fn prop_range_bounds_inclusive(a in -1000i64..1000, b in -1000i64..1000, x in -1000i64..1000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let filter = Filter::new().gte("n", lo).lte("n", hi);
            prop_assert_eq!(filter.matches(&json!({"n": x})), lo <= x && x <= hi);
        }

        #[test]
        fn prop_contains_ci_ignores_case(needle in "[a-zA-Z]{1,8}", prefix in "[a-z]{0,4}") {
            let haystack = format!("{}{}", prefix, needle.to_uppercase());
            let filter = Filter::new().contains_ci("name", needle.to_lowercase());
            let doc = json!({"name": haystack});
            prop_assert!(filter.matches(&doc));
        }
    }

    #[test]
    fn test_eq_value_extraction() {
        let filter = Filter::new().eq("_id", "0123456789abcdef01234567").gte("n", 1);
        assert_eq!(
            filter.eq_value("_id"),
            Some(&json!("0123456789abcdef01234567"))
        );
        assert_eq!(filter.eq_value("n"), None);
    }
}
