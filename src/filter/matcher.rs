/*!
# Filter Evaluation

Evaluates a [`Filter`] against a candidate JSON document.

Evaluation is a pure function of `(filter, document)`: it never errors and
never mutates state, so one filter value can be applied concurrently to any
number of documents. Type mismatches between the filter and the document
degrade to a non-match rather than a failure — a malformed document can
never crash evaluation of a well-formed filter.

# Examples

```
use jsonmatch::filter::{decode::decode, matcher::matches};
use serde_json::json;

let filter = decode(&json!({
    "filterType": "greaterThan",
    "field": "age",
    "value": 21,
})).unwrap();

assert!(matches(&filter, &json!({"age": 22})));
assert!(!matches(&filter, &json!({"age": 21})));
assert!(!matches(&filter, &json!({"age": "old"})));
```
*/
use std::cmp::Ordering;

use serde_json::{Number, Value};

use super::ast::{fold, Filter};
use crate::path::FieldPath;

/// Evaluates `filter` against `document`, returning whether it matches.
#[must_use]
pub fn matches(filter: &Filter, document: &Value) -> bool {
    match filter {
        Filter::Equals { field, value, case_sensitive } => {
            any_equal_candidate(field, document, value, *case_sensitive)
        }
        Filter::NotEquals { field, value, case_sensitive } => {
            // True when no resolved value equals the target, including
            // when the field is entirely absent. Presence is a separate
            // concern handled by Present.
            !any_equal_candidate(field, document, value, *case_sensitive)
        }
        Filter::GreaterThan { field, value } => {
            any_numeric_candidate(field, document, value, Ordering::is_gt)
        }
        Filter::GreaterOrEqual { field, value } => {
            any_numeric_candidate(field, document, value, Ordering::is_ge)
        }
        Filter::LessThan { field, value } => {
            any_numeric_candidate(field, document, value, Ordering::is_lt)
        }
        Filter::LessOrEqual { field, value } => {
            any_numeric_candidate(field, document, value, Ordering::is_le)
        }
        Filter::Substring { field, assertion } => {
            any_string_candidate(field, document, |s| assertion.matches(s))
        }
        Filter::Regex { field, assertion } => {
            any_string_candidate(field, document, |s| assertion.matches(s))
        }
        Filter::Present { field } => !field.resolve(document).is_empty(),
        Filter::ContainsField { field, value, case_sensitive } => {
            any_equal_candidate(field, document, value, *case_sensitive)
        }
        Filter::And { filters } => {
            filters.iter().all(|child| matches(child, document))
        }
        Filter::Or { filters } => {
            filters.iter().any(|child| matches(child, document))
        }
        Filter::Not { filter } => !matches(filter, document),
    }
}

/// Whether any resolved value equals `target`, either directly or as an
/// element of a resolved array.
fn any_equal_candidate(
    field: &FieldPath,
    document: &Value,
    target: &Value,
    case_sensitive: bool,
) -> bool {
    field.resolve(document).into_iter().any(|candidate| {
        value_eq(candidate, target, case_sensitive)
            || matches!(candidate, Value::Array(items)
                if items.iter().any(|item| value_eq(item, target, case_sensitive)))
    })
}

/// Whether any resolved numeric value (or numeric element of a resolved
/// array) stands in the given relation to `target`. Non-numbers are
/// ignored.
fn any_numeric_candidate(
    field: &FieldPath,
    document: &Value,
    target: &Number,
    relation: fn(Ordering) -> bool,
) -> bool {
    let satisfies = |candidate: &Value| {
        matches!(candidate, Value::Number(n)
            if compare_numbers(n, target).is_some_and(relation))
    };

    field.resolve(document).into_iter().any(|candidate| {
        satisfies(candidate)
            || matches!(candidate, Value::Array(items)
                if items.iter().any(satisfies))
    })
}

/// Whether any resolved string value (or string element of a resolved
/// array) satisfies `predicate`.
fn any_string_candidate(
    field: &FieldPath,
    document: &Value,
    predicate: impl Fn(&str) -> bool,
) -> bool {
    let satisfies =
        |candidate: &Value| matches!(candidate, Value::String(s) if predicate(s));

    field.resolve(document).into_iter().any(|candidate| {
        satisfies(candidate)
            || matches!(candidate, Value::Array(items)
                if items.iter().any(satisfies))
    })
}

/// Structural equality over JSON values. Strings fold case unless
/// `case_sensitive`; numbers compare numerically rather than lexically, so
/// `1.0` equals `1`.
fn value_eq(a: &Value, b: &Value, case_sensitive: bool) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => {
            compare_numbers(x, y) == Some(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => {
            if case_sensitive {
                x == y
            } else {
                fold(x) == fold(y)
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys)
                    .all(|(x, y)| value_eq(x, y, case_sensitive))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs.iter().all(|(key, x)| {
                    ys.get(key).is_some_and(|y| value_eq(x, y, case_sensitive))
                })
        }
        _ => false,
    }
}

/// Numeric comparison with an integer fast path; falls back to `f64`.
/// Returns `None` when either side has no meaningful ordering (NaN from an
/// arbitrary-precision edge case).
fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::filter::decode::decode;
    use serde_json::json;

    fn filter(wire: Value) -> Filter {
        decode(&wire).expect("test filters are well-formed")
    }

    #[test]
    fn equals_folds_case_by_default() {
        let f = filter(json!({
            "filterType": "equals",
            "field": "name",
            "value": "Ada",
        }));
        assert!(matches(&f, &json!({"name": "ada"})));
        assert!(matches(&f, &json!({"name": "ADA"})));

        let sensitive = filter(json!({
            "filterType": "equals",
            "field": "name",
            "value": "Ada",
            "caseSensitive": true,
        }));
        assert!(!matches(&sensitive, &json!({"name": "ada"})));
        assert!(matches(&sensitive, &json!({"name": "Ada"})));
    }

    #[test]
    fn equals_compares_numbers_numerically() {
        let f = filter(json!({
            "filterType": "equals",
            "field": "n",
            "value": 1,
        }));
        assert!(matches(&f, &json!({"n": 1})));
        assert!(matches(&f, &json!({"n": 1.0})));
        assert!(!matches(&f, &json!({"n": "1"})));
    }

    #[test]
    fn equals_looks_inside_terminal_arrays() {
        let f = filter(json!({
            "filterType": "equals",
            "field": "tags",
            "value": "blue",
        }));
        assert!(matches(&f, &json!({"tags": ["red", "blue"]})));
        assert!(!matches(&f, &json!({"tags": ["red", "green"]})));
    }

    #[test]
    fn not_equals_is_true_on_absence() {
        let f = filter(json!({
            "filterType": "notEquals",
            "field": "x",
            "value": 1,
        }));
        assert!(matches(&f, &json!({})));
        assert!(matches(&f, &json!({"x": 2})));
        assert!(!matches(&f, &json!({"x": 1})));
        // True only if *no* resolved value equals the target.
        assert!(!matches(&f, &json!({"x": [2, 1]})));
    }

    #[test]
    fn comparisons_ignore_non_numbers() {
        let f = filter(json!({
            "filterType": "lessThan",
            "field": "x",
            "value": 10,
        }));
        assert!(matches(&f, &json!({"x": 9})));
        assert!(!matches(&f, &json!({"x": 10})));
        assert!(!matches(&f, &json!({"x": "9"})));
        assert!(!matches(&f, &json!({"x": null})));
        assert!(matches(&f, &json!({"x": ["skip me", 3]})));
    }

    #[test]
    fn comparison_bounds_are_respected() {
        let doc = json!({"x": 5});
        for (filter_type, value, expected) in [
            ("greaterThan", 5, false),
            ("greaterThan", 4, true),
            ("greaterOrEqual", 5, true),
            ("greaterOrEqual", 6, false),
            ("lessThan", 5, false),
            ("lessThan", 6, true),
            ("lessOrEqual", 5, true),
            ("lessOrEqual", 4, false),
        ] {
            let f = filter(json!({
                "filterType": filter_type,
                "field": "x",
                "value": value,
            }));
            assert_eq!(
                matches(&f, &doc),
                expected,
                "{filter_type} vs {value}"
            );
        }
    }

    #[test]
    fn mixed_width_numbers_compare() {
        let f = filter(json!({
            "filterType": "greaterThan",
            "field": "x",
            "value": 2.5,
        }));
        assert!(matches(&f, &json!({"x": 3})));
        assert!(!matches(&f, &json!({"x": 2})));
    }

    #[test]
    fn substring_distributes_over_arrays() {
        let f = filter(json!({
            "filterType": "substring",
            "field": "aliases",
            "startsWith": "count",
        }));
        assert!(matches(&f, &json!({"aliases": ["lady", "Countess"]})));
        assert!(!matches(&f, &json!({"aliases": ["lady", 42]})));
    }

    #[test]
    fn regex_search_vs_entire_value() {
        let search = filter(json!({
            "filterType": "regularExpression",
            "field": "id",
            "regularExpression": "[0-9]{3}",
        }));
        assert!(matches(&search, &json!({"id": "abc123def"})));

        let entire = filter(json!({
            "filterType": "regularExpression",
            "field": "id",
            "regularExpression": "[0-9]{3}",
            "matchEntireValue": true,
        }));
        assert!(!matches(&entire, &json!({"id": "abc123def"})));
        assert!(matches(&entire, &json!({"id": "123"})));
    }

    #[test]
    fn present_matches_any_reachable_value() {
        let f = filter(json!({"filterType": "present", "field": ["a", "b"]}));
        assert!(matches(&f, &json!({"a": {"b": null}})));
        assert!(matches(&f, &json!({"a": [{"b": false}]})));
        assert!(!matches(&f, &json!({"a": {"c": 1}})));
    }

    #[test]
    fn contains_field_checks_membership() {
        let f = filter(json!({
            "filterType": "containsField",
            "field": "roles",
            "value": "admin",
        }));
        assert!(matches(&f, &json!({"roles": ["user", "admin"]})));
        assert!(matches(&f, &json!({"roles": "admin"})));
        assert!(!matches(&f, &json!({"roles": ["user"]})));
    }

    #[test]
    fn combinators_compose() {
        let f = filter(json!({
            "filterType": "and",
            "filters": [
                {"filterType": "equals", "field": "x", "value": 1},
                {"filterType": "equals", "field": "y", "value": 2},
            ],
        }));
        assert!(matches(&f, &json!({"x": 1, "y": 2})));
        assert!(!matches(&f, &json!({"x": 1, "y": 3})));

        let negated = filter(json!({
            "filterType": "not",
            "filter": {"filterType": "present", "field": "z"},
        }));
        assert!(matches(&negated, &json!({"x": 1})));
        assert!(!matches(&negated, &json!({"z": 1})));
    }

    #[test]
    fn vacuous_combinators_use_identity_semantics() {
        let empty_and = filter(json!({"filterType": "and", "filters": []}));
        assert!(matches(&empty_and, &json!({})));
        assert!(matches(&empty_and, &json!({"anything": true})));

        let empty_or = filter(json!({"filterType": "or", "filters": []}));
        assert!(!matches(&empty_or, &json!({})));
        assert!(!matches(&empty_or, &json!({"anything": true})));
    }

    #[test]
    fn malformed_documents_never_match() {
        let f = filter(json!({
            "filterType": "equals",
            "field": ["a", "b"],
            "value": 1,
        }));
        for doc in [json!(null), json!(42), json!("a"), json!([1, 2])] {
            assert!(!matches(&f, &doc));
        }
    }
}
