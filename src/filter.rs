/*!
# JSON Object Filters

A composable predicate language over JSON documents with support for:
- Equality, ordering comparisons, substring and regular-expression matching
- Field presence and array-membership checks
- Boolean combinators (`and` / `or` / `not`) over nested filters
- A canonical JSON wire form that round-trips losslessly

A filter is decoded from its JSON object representation (see
[`decode::decode`]), evaluated against candidate documents with
[`matcher::matches`], and re-encoded with [`encode::encode`]. Filters are
immutable once constructed and safe to share across threads.

# Examples

```
use jsonmatch::filter::{decode::decode, matcher::matches};
use serde_json::json;

let filter = decode(&json!({
    "filterType": "substring",
    "field": "name",
    "startsWith": "ada",
})).unwrap();

assert!(matches(&filter, &json!({"name": "Ada Lovelace"})));
assert!(!matches(&filter, &json!({"name": "Grace Hopper"})));
```
*/

pub mod ast;
pub mod decode;
pub mod encode;
pub mod matcher;
pub(crate) mod schema;

use std::error::Error;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::path::EmptyPathError;

// Re-exports
pub use ast::*;

/// Errors produced while decoding or constructing a filter.
///
/// Matching never produces errors: a malformed document degrades to a
/// non-match rather than a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The supplied value is not a JSON object, or a field has the wrong
    /// JSON kind (e.g., `field` is a number).
    MalformedInput(String),
    /// The `filterType` value has no registered decoder.
    UnknownFilterType(String),
    /// A required field is missing, or a field name is not in the
    /// required/optional set for the filter kind.
    SchemaViolation(String),
    /// A filter-kind-specific rule was violated (e.g., a substring filter
    /// with no components, or an empty field path).
    InvariantViolation(String),
}

impl Error for FilterError {}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInput(msg) => {
                write!(f, "malformed filter input: {msg}")
            }
            Self::UnknownFilterType(name) => {
                write!(f, "unrecognized filter type: {name:?}")
            }
            Self::SchemaViolation(msg) => {
                write!(f, "filter schema violation: {msg}")
            }
            Self::InvariantViolation(msg) => {
                write!(f, "filter invariant violation: {msg}")
            }
        }
    }
}

impl From<EmptyPathError> for FilterError {
    fn from(err: EmptyPathError) -> Self {
        Self::InvariantViolation(err.to_string())
    }
}

impl Serialize for Filter {
    /// Serializes the filter as its canonical JSON object form.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode::encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Filter {
    /// Deserializes a filter from its JSON object form, applying the full
    /// schema and invariant validation of [`decode::decode`].
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode::decode(&value).map_err(D::Error::custom)
    }
}
