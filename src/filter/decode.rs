/*!
# Filter Decoder

Converts the JSON object wire form of a filter into a validated [`Filter`]
value.

Decoding is atomic: on any failure no partial filter is produced. The
stages are fixed:

1. the input must be a JSON object carrying a string `filterType`,
2. the discriminator must be registered (see [`crate::filter::schema`]),
3. every present field name must be in the variant's required/optional
   set and every required field must be present,
4. variant-specific invariants are checked last.

# Examples

```
use jsonmatch::filter::{FilterError, decode::decode};
use serde_json::json;

let filter = decode(&json!({
    "filterType": "and",
    "filters": [
        {"filterType": "equals", "field": "x", "value": 1},
        {"filterType": "present", "field": ["a", "b"]},
    ],
})).unwrap();
assert_eq!(filter.filter_type(), "and");

let err = decode(&json!({"filterType": "bogus"})).unwrap_err();
assert!(matches!(err, FilterError::UnknownFilterType(_)));
```
*/
use serde_json::{Map, Value};

use super::ast::{Filter, RegexAssertion, SubstringAssertion};
use super::schema::{
    self, FIELD_CASE_SENSITIVE, FIELD_CONTAINS, FIELD_ENDS_WITH, FIELD_FILTER,
    FIELD_FILTERS, FIELD_FILTER_TYPE, FIELD_MATCH_ENTIRE_VALUE, FIELD_REGEX,
    FIELD_STARTS_WITH, FIELD_VALUE,
};
use super::FilterError;

/// Decodes a filter from its JSON object representation.
///
/// # Errors
///
/// - [`FilterError::MalformedInput`] if `value` is not an object, the
///   `filterType` field is absent or not a string, or a field has the
///   wrong JSON kind.
/// - [`FilterError::UnknownFilterType`] if the discriminator has no
///   registered decoder.
/// - [`FilterError::SchemaViolation`] for unknown or missing field names.
/// - [`FilterError::InvariantViolation`] for variant-specific rule
///   violations (empty substring components, empty field path, invalid
///   regular expression).
pub fn decode(value: &Value) -> Result<Filter, FilterError> {
    let Some(obj) = value.as_object() else {
        return Err(FilterError::MalformedInput(format!(
            "filter must be a JSON object, got {}",
            schema::kind_name(value)
        )));
    };

    let filter_type = match obj.get(FIELD_FILTER_TYPE) {
        Some(Value::String(s)) => s.as_str(),
        _ => {
            return Err(FilterError::MalformedInput(
                "missing filter type".into(),
            ));
        }
    };

    let filter_schema = schema::schema_for(filter_type)
        .ok_or_else(|| FilterError::UnknownFilterType(filter_type.to_owned()))?;
    filter_schema.validate(obj)?;

    match filter_type {
        "equals" => decode_equality(obj, false),
        "notEquals" => decode_equality(obj, true),
        "greaterThan" | "greaterOrEqual" | "lessThan" | "lessOrEqual" => {
            decode_comparison(obj, filter_type)
        }
        "substring" => decode_substring(obj),
        "regularExpression" => decode_regex(obj),
        "present" => Ok(Filter::Present { field: schema::require_path(obj)? }),
        "containsField" => Ok(Filter::ContainsField {
            field: schema::require_path(obj)?,
            value: schema::require_value(obj, FIELD_VALUE)?,
            case_sensitive: schema::get_bool(obj, FIELD_CASE_SENSITIVE, false)?,
        }),
        "and" => Ok(Filter::And { filters: require_filters(obj)? }),
        "or" => Ok(Filter::Or { filters: require_filters(obj)? }),
        "not" => Ok(Filter::Not { filter: Box::new(require_filter(obj)?) }),
        // schema_for only resolves names matched above
        _ => unreachable!("registry and dispatch table out of sync"),
    }
}

fn decode_equality(obj: &Map<String, Value>, negated: bool) -> Result<Filter, FilterError> {
    let field = schema::require_path(obj)?;
    let value = schema::require_value(obj, FIELD_VALUE)?;
    let case_sensitive = schema::get_bool(obj, FIELD_CASE_SENSITIVE, false)?;
    Ok(if negated {
        Filter::NotEquals { field, value, case_sensitive }
    } else {
        Filter::Equals { field, value, case_sensitive }
    })
}

fn decode_comparison(
    obj: &Map<String, Value>,
    filter_type: &str,
) -> Result<Filter, FilterError> {
    let field = schema::require_path(obj)?;
    let value = schema::require_number(obj, FIELD_VALUE)?;
    Ok(match filter_type {
        "greaterThan" => Filter::GreaterThan { field, value },
        "greaterOrEqual" => Filter::GreaterOrEqual { field, value },
        "lessThan" => Filter::LessThan { field, value },
        _ => Filter::LessOrEqual { field, value },
    })
}

fn decode_substring(obj: &Map<String, Value>) -> Result<Filter, FilterError> {
    let field = schema::require_path(obj)?;
    let starts_with = schema::get_string(obj, FIELD_STARTS_WITH)?;
    let contains = schema::get_strings(obj, FIELD_CONTAINS)?;
    let ends_with = schema::get_string(obj, FIELD_ENDS_WITH)?;
    let case_sensitive = schema::get_bool(obj, FIELD_CASE_SENSITIVE, false)?;

    Ok(Filter::Substring {
        field,
        assertion: SubstringAssertion::new(
            starts_with,
            contains,
            ends_with,
            case_sensitive,
        )?,
    })
}

fn decode_regex(obj: &Map<String, Value>) -> Result<Filter, FilterError> {
    let field = schema::require_path(obj)?;
    let pattern = schema::get_string(obj, FIELD_REGEX)?.ok_or_else(|| {
        FilterError::SchemaViolation(format!(
            "missing required field {FIELD_REGEX:?}"
        ))
    })?;
    let match_entire_value =
        schema::get_bool(obj, FIELD_MATCH_ENTIRE_VALUE, false)?;

    Ok(Filter::Regex {
        field,
        assertion: RegexAssertion::new(pattern, match_entire_value)?,
    })
}

/// Decodes the required `filters` array of an `and`/`or` filter. An empty
/// array is legal; the combinators define identity semantics for it.
fn require_filters(obj: &Map<String, Value>) -> Result<Vec<Filter>, FilterError> {
    match obj.get(FIELD_FILTERS) {
        Some(Value::Array(items)) => items.iter().map(decode).collect(),
        Some(other) => Err(FilterError::MalformedInput(format!(
            "field {FIELD_FILTERS:?} must be an array of filter objects, got {}",
            schema::kind_name(other)
        ))),
        None => Err(FilterError::SchemaViolation(format!(
            "missing required field {FIELD_FILTERS:?}"
        ))),
    }
}

/// Decodes the required single `filter` child of a `not` filter.
fn require_filter(obj: &Map<String, Value>) -> Result<Filter, FilterError> {
    match obj.get(FIELD_FILTER) {
        Some(child @ Value::Object(_)) => decode(child),
        Some(other) => Err(FilterError::MalformedInput(format!(
            "field {FIELD_FILTER:?} must be a filter object, got {}",
            schema::kind_name(other)
        ))),
        None => Err(FilterError::SchemaViolation(format!(
            "missing required field {FIELD_FILTER:?}"
        ))),
    }
}
