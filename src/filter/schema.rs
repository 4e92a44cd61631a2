/*!
# Decode Schemas

Per-variant declarations of the required and optional top-level field names
a filter's JSON form may carry, plus the typed extraction helpers the
variant decoders share.

Each filter kind has exactly one [`FilterSchema`] in a static table; the
table doubles as the decode registry ([`schema_for`] resolves the
`filterType` discriminator). A single generic validation routine enforces
the required/optional contract so variant decoders only deal with their own
invariants.
*/
use serde_json::{Map, Number, Value};

use super::FilterError;
use crate::path::FieldPath;

/// Name of the discriminator field common to every filter object.
pub(crate) const FIELD_FILTER_TYPE: &str = "filterType";
/// Name of the field-path field common to every leaf variant.
pub(crate) const FIELD_PATH: &str = "field";
/// Name of the comparison-target field.
pub(crate) const FIELD_VALUE: &str = "value";
/// Name of the case-sensitivity flag field.
pub(crate) const FIELD_CASE_SENSITIVE: &str = "caseSensitive";
/// Name of the substring prefix field.
pub(crate) const FIELD_STARTS_WITH: &str = "startsWith";
/// Name of the substring contains-list field.
pub(crate) const FIELD_CONTAINS: &str = "contains";
/// Name of the substring suffix field.
pub(crate) const FIELD_ENDS_WITH: &str = "endsWith";
/// Name of the regular-expression pattern field.
pub(crate) const FIELD_REGEX: &str = "regularExpression";
/// Name of the regular-expression anchoring flag field.
pub(crate) const FIELD_MATCH_ENTIRE_VALUE: &str = "matchEntireValue";
/// Name of the `and`/`or` child-list field.
pub(crate) const FIELD_FILTERS: &str = "filters";
/// Name of the `not` child field.
pub(crate) const FIELD_FILTER: &str = "filter";

/// The required/optional field-name contract for one filter kind's JSON
/// encoding. `filterType` itself is implicit and always accepted.
pub(crate) struct FilterSchema {
    /// The `filterType` discriminator this schema belongs to.
    pub filter_type: &'static str,
    /// Field names that must be present.
    pub required: &'static [&'static str],
    /// Field names that may be present.
    pub optional: &'static [&'static str],
}

/// One schema per filter kind; also the decode registry.
static SCHEMAS: &[FilterSchema] = &[
    FilterSchema {
        filter_type: "equals",
        required: &[FIELD_PATH, FIELD_VALUE],
        optional: &[FIELD_CASE_SENSITIVE],
    },
    FilterSchema {
        filter_type: "notEquals",
        required: &[FIELD_PATH, FIELD_VALUE],
        optional: &[FIELD_CASE_SENSITIVE],
    },
    FilterSchema {
        filter_type: "greaterThan",
        required: &[FIELD_PATH, FIELD_VALUE],
        optional: &[],
    },
    FilterSchema {
        filter_type: "greaterOrEqual",
        required: &[FIELD_PATH, FIELD_VALUE],
        optional: &[],
    },
    FilterSchema {
        filter_type: "lessThan",
        required: &[FIELD_PATH, FIELD_VALUE],
        optional: &[],
    },
    FilterSchema {
        filter_type: "lessOrEqual",
        required: &[FIELD_PATH, FIELD_VALUE],
        optional: &[],
    },
    FilterSchema {
        filter_type: "substring",
        required: &[FIELD_PATH],
        optional: &[
            FIELD_STARTS_WITH,
            FIELD_CONTAINS,
            FIELD_ENDS_WITH,
            FIELD_CASE_SENSITIVE,
        ],
    },
    FilterSchema {
        filter_type: "regularExpression",
        required: &[FIELD_PATH, FIELD_REGEX],
        optional: &[FIELD_MATCH_ENTIRE_VALUE],
    },
    FilterSchema {
        filter_type: "present",
        required: &[FIELD_PATH],
        optional: &[],
    },
    FilterSchema {
        filter_type: "containsField",
        required: &[FIELD_PATH, FIELD_VALUE],
        optional: &[FIELD_CASE_SENSITIVE],
    },
    FilterSchema { filter_type: "and", required: &[FIELD_FILTERS], optional: &[] },
    FilterSchema { filter_type: "or", required: &[FIELD_FILTERS], optional: &[] },
    FilterSchema { filter_type: "not", required: &[FIELD_FILTER], optional: &[] },
];

/// Resolves the schema registered for a `filterType` discriminator.
pub(crate) fn schema_for(filter_type: &str) -> Option<&'static FilterSchema> {
    SCHEMAS.iter().find(|schema| schema.filter_type == filter_type)
}

impl FilterSchema {
    /// Checks the required/optional contract against a decoded filter
    /// object: every present field name must be known, and every required
    /// field name must be present. Field *kinds* are checked by the typed
    /// extraction helpers afterwards.
    pub(crate) fn validate(&self, obj: &Map<String, Value>) -> Result<(), FilterError> {
        for name in obj.keys() {
            let known = name == FIELD_FILTER_TYPE
                || self.required.contains(&name.as_str())
                || self.optional.contains(&name.as_str());
            if !known {
                return Err(FilterError::SchemaViolation(format!(
                    "field {name:?} is not allowed in a {:?} filter",
                    self.filter_type
                )));
            }
        }
        for name in self.required {
            if !obj.contains_key(*name) {
                return Err(FilterError::SchemaViolation(format!(
                    "{:?} filter is missing required field {name:?}",
                    self.filter_type
                )));
            }
        }
        Ok(())
    }
}

/// Extracts an optional string field. Present but non-string is an error.
pub(crate) fn get_string(
    obj: &Map<String, Value>,
    name: &str,
) -> Result<Option<String>, FilterError> {
    match obj.get(name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(FilterError::MalformedInput(format!(
            "field {name:?} must be a string, got {}",
            kind_name(other)
        ))),
    }
}

/// Extracts a field that may be a bare string or an array of strings.
/// Absence yields an empty list.
pub(crate) fn get_strings(
    obj: &Map<String, Value>,
    name: &str,
) -> Result<Vec<String>, FilterError> {
    match obj.get(name) {
        None => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(FilterError::MalformedInput(format!(
                    "field {name:?} must contain only strings, got {}",
                    kind_name(other)
                ))),
            })
            .collect(),
        Some(other) => Err(FilterError::MalformedInput(format!(
            "field {name:?} must be a string or an array of strings, got {}",
            kind_name(other)
        ))),
    }
}

/// Extracts an optional boolean field, substituting `default` on absence.
pub(crate) fn get_bool(
    obj: &Map<String, Value>,
    name: &str,
    default: bool,
) -> Result<bool, FilterError> {
    match obj.get(name) {
        None => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(FilterError::MalformedInput(format!(
            "field {name:?} must be a boolean, got {}",
            kind_name(other)
        ))),
    }
}

/// Extracts a required numeric field.
pub(crate) fn require_number(
    obj: &Map<String, Value>,
    name: &str,
) -> Result<Number, FilterError> {
    match obj.get(name) {
        Some(Value::Number(n)) => Ok(n.clone()),
        Some(other) => Err(FilterError::MalformedInput(format!(
            "field {name:?} must be a number, got {}",
            kind_name(other)
        ))),
        None => Err(FilterError::SchemaViolation(format!(
            "missing required field {name:?}"
        ))),
    }
}

/// Extracts a required field of any JSON kind.
pub(crate) fn require_value(
    obj: &Map<String, Value>,
    name: &str,
) -> Result<Value, FilterError> {
    obj.get(name).cloned().ok_or_else(|| {
        FilterError::SchemaViolation(format!("missing required field {name:?}"))
    })
}

/// Extracts the `field` path specifier (a bare string or an array of
/// strings) and builds the validated [`FieldPath`].
pub(crate) fn require_path(obj: &Map<String, Value>) -> Result<FieldPath, FilterError> {
    if !obj.contains_key(FIELD_PATH) {
        return Err(FilterError::SchemaViolation(format!(
            "missing required field {FIELD_PATH:?}"
        )));
    }
    let segments = get_strings(obj, FIELD_PATH)?;
    Ok(FieldPath::new(segments)?)
}

/// Human-readable JSON kind name for error messages.
pub(crate) const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().expect("test object").clone()
    }

    #[test]
    fn registry_covers_all_discriminators() {
        for name in [
            "equals",
            "notEquals",
            "greaterThan",
            "greaterOrEqual",
            "lessThan",
            "lessOrEqual",
            "substring",
            "regularExpression",
            "present",
            "containsField",
            "and",
            "or",
            "not",
        ] {
            assert!(schema_for(name).is_some(), "no schema for {name}");
        }
        assert!(schema_for("bogus").is_none());
    }

    #[test]
    fn validate_rejects_unknown_fields() {
        let schema = schema_for("present").unwrap();
        let err = schema
            .validate(&obj(json!({
                "filterType": "present",
                "field": "x",
                "extra": 1,
            })))
            .unwrap_err();
        assert!(matches!(err, FilterError::SchemaViolation(_)));
    }

    #[test]
    fn validate_rejects_missing_required_fields() {
        let schema = schema_for("equals").unwrap();
        let err = schema
            .validate(&obj(json!({"filterType": "equals", "field": "x"})))
            .unwrap_err();
        assert!(matches!(err, FilterError::SchemaViolation(_)));
    }

    #[test]
    fn strings_accept_scalar_and_array_forms() {
        let scalar = obj(json!({"contains": "a"}));
        assert_eq!(get_strings(&scalar, "contains").unwrap(), vec!["a"]);

        let array = obj(json!({"contains": ["a", "b"]}));
        assert_eq!(get_strings(&array, "contains").unwrap(), vec!["a", "b"]);

        let wrong = obj(json!({"contains": [1]}));
        assert!(matches!(
            get_strings(&wrong, "contains"),
            Err(FilterError::MalformedInput(_))
        ));
    }

    #[test]
    fn path_rejects_wrong_kinds() {
        let numeric = obj(json!({"field": 7}));
        assert!(matches!(
            require_path(&numeric),
            Err(FilterError::MalformedInput(_))
        ));

        let empty = obj(json!({"field": []}));
        assert!(matches!(
            require_path(&empty),
            Err(FilterError::InvariantViolation(_))
        ));
    }
}
