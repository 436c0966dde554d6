//! Event filtering by field predicates.
//!
//! A filter is (field path, operator, comparison value), applied
//! independently to each event. Stateless: no cross-event memory, and
//! batch filtering preserves the relative order of matches.

use std::fmt;
use std::str::FromStr;

use log::debug;
use regex::Regex;

use super::access::get_field;
use super::event::{display_value, numeric_value, Event};
use crate::utils::error::FilterError;

/// Comparison operator for a filter specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
    Regex,
}

impl FromStr for FilterOp {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "equals" | "eq" => Self::Equals,
            "not_equals" | "ne" => Self::NotEquals,
            "contains" => Self::Contains,
            "greater_than" | "gt" => Self::GreaterThan,
            "less_than" | "lt" => Self::LessThan,
            "regex" | "regex_match" => Self::Regex,
            other => return Err(FilterError::InvalidOperator(other.to_string())),
        })
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::Contains => "contains",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::Regex => "regex",
        };
        f.write_str(name)
    }
}

/// A filter predicate over one field.
///
/// **Public** - build via [`FilterSpec::new`] so the regex operator
/// compiles its pattern up front (invalid patterns are configuration
/// errors, raised before any event is touched)
#[derive(Debug, Clone)]
pub struct FilterSpec {
    /// Field to test (dot notation allowed)
    pub field: String,

    /// Comparison operator
    pub op: FilterOp,

    /// Right-hand comparison value
    pub value: String,

    regex: Option<Regex>,
}

impl FilterSpec {
    /// Build a filter specification
    pub fn new(
        field: impl Into<String>,
        op: FilterOp,
        value: impl Into<String>,
    ) -> Result<Self, FilterError> {
        let value = value.into();
        let regex = match op {
            FilterOp::Regex => Some(Regex::new(&value)?),
            _ => None,
        };
        Ok(Self {
            field: field.into(),
            op,
            value,
            regex,
        })
    }

    /// Build a filter specification from a CLI operator string
    pub fn parse(
        field: impl Into<String>,
        op: &str,
        value: impl Into<String>,
    ) -> Result<Self, FilterError> {
        Self::new(field, op.parse()?, value)
    }

    /// Evaluate this filter against one event.
    ///
    /// **Public** - absent fields match only `not_equals` (absence is "not
    /// equal to anything"); a non-numeric operand under `greater_than`/
    /// `less_than` is a type mismatch, treated as a non-match rather than
    /// an error
    pub fn matches(&self, event: &Event) -> bool {
        let Some(value) = get_field(event, &self.field) else {
            return self.op == FilterOp::NotEquals;
        };

        match self.op {
            FilterOp::Equals => display_value(value) == self.value,
            FilterOp::NotEquals => display_value(value) != self.value,
            FilterOp::Contains => display_value(value).contains(&self.value),
            FilterOp::GreaterThan | FilterOp::LessThan => {
                let (Some(left), Ok(right)) =
                    (numeric_value(value), self.value.trim().parse::<f64>())
                else {
                    debug!(
                        "Type mismatch comparing field '{}' with {:?}, treating as non-match",
                        self.field, self.value
                    );
                    return false;
                };
                if self.op == FilterOp::GreaterThan {
                    left > right
                } else {
                    left < right
                }
            }
            // Unanchored search over the coerced value
            FilterOp::Regex => self
                .regex
                .as_ref()
                .is_some_and(|re| re.is_match(&display_value(value))),
        }
    }
}

/// Filter a batch, keeping events that match the predicate.
///
/// **Public** - applies the predicate independently per event and
/// preserves input order
pub fn filter_events(events: &[Event], spec: &FilterSpec) -> Vec<Event> {
    let kept: Vec<Event> = events.iter().filter(|e| spec.matches(e)).cloned().collect();
    debug!(
        "Filter {} {} {:?} kept {} of {} events",
        spec.field,
        spec.op,
        spec.value,
        kept.len(),
        events.len()
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: serde_json::Value) -> Event {
        value.as_object().expect("test event must be an object").clone()
    }

    fn spec(field: &str, op: &str, value: &str) -> FilterSpec {
        FilterSpec::parse(field, op, value).unwrap()
    }

    #[test]
    fn test_equals_and_contains() {
        let e = event(json!({"severity": "error", "host": "server1"}));

        assert!(spec("severity", "equals", "error").matches(&e));
        assert!(!spec("severity", "equals", "warn").matches(&e));
        assert!(spec("host", "contains", "server").matches(&e));
        assert!(!spec("host", "contains", "db").matches(&e));
    }

    #[test]
    fn test_absent_field_semantics() {
        let e = event(json!({}));

        assert!(spec("missing", "not_equals", "x").matches(&e));
        assert!(!spec("missing", "equals", "x").matches(&e));
        assert!(!spec("missing", "contains", "x").matches(&e));
        assert!(!spec("missing", "gt", "1").matches(&e));
        assert!(!spec("missing", "lt", "1").matches(&e));
        assert!(!spec("missing", "regex", "x").matches(&e));
    }

    #[test]
    fn test_numeric_comparison() {
        let e = event(json!({"status": 404, "latency": "12.5"}));

        assert!(spec("status", "gt", "400").matches(&e));
        assert!(!spec("status", "gt", "500").matches(&e));
        assert!(spec("latency", "lt", "20").matches(&e));
    }

    #[test]
    fn test_numeric_comparison_equal_values_match_neither() {
        let e = event(json!({"status": 404}));

        assert!(!spec("status", "gt", "404").matches(&e));
        assert!(!spec("status", "lt", "404").matches(&e));
    }

    #[test]
    fn test_type_mismatch_is_non_match() {
        let e = event(json!({"status": "unavailable"}));

        assert!(!spec("status", "gt", "100").matches(&e));
        assert!(!spec("status", "lt", "100").matches(&e));
    }

    #[test]
    fn test_numbers_compare_across_string_form() {
        // equals goes through display coercion, so 200 == "200"
        let e = event(json!({"status": 200}));

        assert!(spec("status", "equals", "200").matches(&e));
        assert!(!spec("status", "not_equals", "200").matches(&e));
    }

    #[test]
    fn test_regex_is_unanchored() {
        let e = event(json!({"_raw": "GET /api/users 200"}));

        assert!(spec("_raw", "regex", r"/api/\w+").matches(&e));
        assert!(!spec("_raw", "regex", r"^POST").matches(&e));
    }

    #[test]
    fn test_invalid_operator_and_regex_are_config_errors() {
        assert!(matches!(
            FilterSpec::parse("f", "between", "x"),
            Err(FilterError::InvalidOperator(_))
        ));
        assert!(matches!(
            FilterSpec::parse("f", "regex", "(unclosed"),
            Err(FilterError::InvalidRegex(_))
        ));
    }

    #[test]
    fn test_filter_events_preserves_order() {
        let events = vec![
            event(json!({"severity": "error", "n": 1})),
            event(json!({"severity": "warning", "n": 2})),
            event(json!({"severity": "error", "n": 3})),
        ];

        let kept = filter_events(&events, &spec("severity", "equals", "error"));

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0]["n"], json!(1));
        assert_eq!(kept[1]["n"], json!(3));
    }

    #[test]
    fn test_nested_field_filter() {
        let e = event(json!({"request": {"status": 500}}));

        assert!(spec("request.status", "equals", "500").matches(&e));
        assert!(spec("request.status", "gt", "499").matches(&e));
    }
}
