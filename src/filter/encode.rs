/*!
# Canonical Encoder

Serializes a [`Filter`] back into its JSON object wire form.

The encoding is canonical: field insertion order is fixed per variant
(`filterType` first, then the variant's fields in declared order), a
one-element `field` or `contains` list is written as a bare string, and
default-false booleans are omitted. For every legally constructed filter
`f`, `decode(&encode(&f))` yields a filter equal to `f`.

# Examples

```
use jsonmatch::filter::{decode::decode, encode::encode};
use serde_json::json;

let wire = json!({
    "filterType": "substring",
    "field": "name",
    "contains": ["a", "b"],
});
let filter = decode(&wire).unwrap();
assert_eq!(encode(&filter), wire);
assert_eq!(decode(&encode(&filter)).unwrap(), filter);
```
*/
use serde_json::{Map, Value};

use super::ast::Filter;
use super::schema::{
    FIELD_CASE_SENSITIVE, FIELD_CONTAINS, FIELD_ENDS_WITH, FIELD_FILTER,
    FIELD_FILTERS, FIELD_FILTER_TYPE, FIELD_MATCH_ENTIRE_VALUE, FIELD_PATH,
    FIELD_REGEX, FIELD_STARTS_WITH, FIELD_VALUE,
};
use crate::path::FieldPath;

/// Encodes a filter into its canonical JSON object form.
#[must_use]
pub fn encode(filter: &Filter) -> Value {
    let mut obj = Map::new();
    obj.insert(
        FIELD_FILTER_TYPE.to_owned(),
        Value::String(filter.filter_type().to_owned()),
    );

    match filter {
        Filter::Equals { field, value, case_sensitive }
        | Filter::NotEquals { field, value, case_sensitive }
        | Filter::ContainsField { field, value, case_sensitive } => {
            insert_path(&mut obj, field);
            obj.insert(FIELD_VALUE.to_owned(), value.clone());
            insert_flag(&mut obj, FIELD_CASE_SENSITIVE, *case_sensitive);
        }
        Filter::GreaterThan { field, value }
        | Filter::GreaterOrEqual { field, value }
        | Filter::LessThan { field, value }
        | Filter::LessOrEqual { field, value } => {
            insert_path(&mut obj, field);
            obj.insert(FIELD_VALUE.to_owned(), Value::Number(value.clone()));
        }
        Filter::Substring { field, assertion } => {
            insert_path(&mut obj, field);
            if let Some(prefix) = assertion.starts_with() {
                obj.insert(
                    FIELD_STARTS_WITH.to_owned(),
                    Value::String(prefix.to_owned()),
                );
            }
            if !assertion.contains().is_empty() {
                obj.insert(
                    FIELD_CONTAINS.to_owned(),
                    scalar_or_array(assertion.contains()),
                );
            }
            if let Some(suffix) = assertion.ends_with() {
                obj.insert(
                    FIELD_ENDS_WITH.to_owned(),
                    Value::String(suffix.to_owned()),
                );
            }
            insert_flag(&mut obj, FIELD_CASE_SENSITIVE, assertion.case_sensitive());
        }
        Filter::Regex { field, assertion } => {
            insert_path(&mut obj, field);
            obj.insert(
                FIELD_REGEX.to_owned(),
                Value::String(assertion.pattern().to_owned()),
            );
            insert_flag(
                &mut obj,
                FIELD_MATCH_ENTIRE_VALUE,
                assertion.match_entire_value(),
            );
        }
        Filter::Present { field } => insert_path(&mut obj, field),
        Filter::And { filters } | Filter::Or { filters } => {
            obj.insert(
                FIELD_FILTERS.to_owned(),
                Value::Array(filters.iter().map(encode).collect()),
            );
        }
        Filter::Not { filter } => {
            obj.insert(FIELD_FILTER.to_owned(), encode(filter));
        }
    }

    Value::Object(obj)
}

/// Writes the field path, using the bare-string form for single-segment
/// paths.
fn insert_path(obj: &mut Map<String, Value>, path: &FieldPath) {
    obj.insert(FIELD_PATH.to_owned(), scalar_or_array(path.segments()));
}

/// A one-element string list encodes as a bare string; longer lists encode
/// as arrays. The decoder accepts both forms.
fn scalar_or_array(items: &[String]) -> Value {
    if let [single] = items {
        Value::String(single.clone())
    } else {
        Value::Array(
            items.iter().map(|s| Value::String(s.clone())).collect(),
        )
    }
}

/// Boolean flags are only written when they deviate from their `false`
/// default, mirroring the wire form's defaults.
fn insert_flag(obj: &mut Map<String, Value>, name: &str, value: bool) {
    if value {
        obj.insert(name.to_owned(), Value::Bool(true));
    }
}
