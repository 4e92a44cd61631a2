/*!
# Field Paths

Defines [`FieldPath`], an ordered, non-empty sequence of field names that
locates values inside nested JSON structure, and its resolver.

Resolution is *array transparent*: when a path segment is applied to an
array, the remaining path distributes over every element of the array in
document order. A segment is never interpreted as an array index.

# Examples

```
use jsonmatch::path::FieldPath;
use serde_json::json;

let path = FieldPath::new(vec!["a".into(), "b".into()]).unwrap();
let doc = json!({"a": [{"b": 1}, {"b": 2}, {"c": 3}]});

let values: Vec<_> = path.resolve(&doc);
assert_eq!(values, vec![&json!(1), &json!(2)]);
```
*/
use serde_json::Value;
use std::error::Error;
use std::fmt;

/// Error returned when constructing a [`FieldPath`] from an empty sequence
/// or a sequence containing an empty segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyPathError;

impl Error for EmptyPathError {}

impl fmt::Display for EmptyPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field path must contain at least one non-empty segment")
    }
}

/// An ordered, non-empty list of field names identifying a (possibly
/// nested) location inside a JSON object.
///
/// The non-empty invariant is enforced at construction, so a `FieldPath`
/// value always denotes at least one traversal step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Creates a field path from the given segments.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyPathError`] if `segments` is empty or any segment is
    /// the empty string.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonmatch::path::FieldPath;
    /// let path = FieldPath::new(vec!["foo".into(), "bar".into()]).unwrap();
    /// assert_eq!(path.segments(), ["foo", "bar"]);
    ///
    /// assert!(FieldPath::new(vec![]).is_err());
    /// ```
    pub fn new(segments: Vec<String>) -> Result<Self, EmptyPathError> {
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return Err(EmptyPathError);
        }
        Ok(Self(segments))
    }

    /// Creates a single-segment field path targeting a top-level field.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyPathError`] if `name` is the empty string.
    pub fn single<T: Into<String>>(name: T) -> Result<Self, EmptyPathError> {
        Self::new(vec![name.into()])
    }

    /// Returns the path segments in traversal order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Resolves this path against `root`, returning every reachable value
    /// in document order.
    ///
    /// - An object step looks up the next segment as a key; an absent key
    ///   contributes nothing.
    /// - An array distributes the remaining path over its elements
    ///   (array transparency).
    /// - A scalar encountered while segments remain contributes nothing.
    ///
    /// Terminal values are returned as-is; a terminal array is returned
    /// whole rather than flattened, and duplicates from multiple array
    /// branches are preserved.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonmatch::path::FieldPath;
    /// use serde_json::json;
    ///
    /// let path = FieldPath::single("x").unwrap();
    /// let doc = json!({"x": [1, 2]});
    /// // Terminal arrays are not flattened.
    /// assert_eq!(path.resolve(&doc), vec![&json!([1, 2])]);
    /// ```
    #[must_use]
    pub fn resolve<'a>(&self, root: &'a Value) -> Vec<&'a Value> {
        let mut out = Vec::new();
        collect(root, &self.0, &mut out);
        out
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Recursive resolution step. Arrays are handled by re-applying the full
/// remaining path to each element, which makes transparency hold for
/// arrays nested inside arrays as well.
fn collect<'a>(value: &'a Value, segments: &[String], out: &mut Vec<&'a Value>) {
    let Some((segment, rest)) = segments.split_first() else {
        out.push(value);
        return;
    };

    match value {
        Value::Object(map) => {
            if let Some(child) = map.get(segment) {
                collect(child, rest, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect(item, segments, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(segments: &[&str]) -> FieldPath {
        FieldPath::new(segments.iter().map(ToString::to_string).collect())
            .expect("test paths are non-empty")
    }

    #[test]
    fn rejects_empty_paths() {
        assert_eq!(FieldPath::new(vec![]), Err(EmptyPathError));
        assert_eq!(FieldPath::new(vec![String::new()]), Err(EmptyPathError));
        assert_eq!(FieldPath::single(""), Err(EmptyPathError));
    }

    #[test]
    fn resolves_nested_objects() {
        let doc = json!({"a": {"b": {"c": "target"}}});
        assert_eq!(path(&["a", "b", "c"]).resolve(&doc), vec![&json!("target")]);
    }

    #[test]
    fn absent_key_yields_nothing() {
        let doc = json!({"a": {"b": 1}});
        assert!(path(&["a", "z"]).resolve(&doc).is_empty());
        assert!(path(&["z"]).resolve(&doc).is_empty());
    }

    #[test]
    fn scalar_mid_path_yields_nothing() {
        let doc = json!({"a": 5});
        assert!(path(&["a", "b"]).resolve(&doc).is_empty());
    }

    #[test]
    fn array_transparency_preserves_order() {
        let doc = json!({"a": [{"b": 1}, {"b": 2}, {"c": 3}]});
        assert_eq!(
            path(&["a", "b"]).resolve(&doc),
            vec![&json!(1), &json!(2)]
        );
    }

    #[test]
    fn nested_arrays_stay_transparent() {
        let doc = json!({"a": [[{"b": 1}], [{"b": 2}, {"b": 1}]]});
        assert_eq!(
            path(&["a", "b"]).resolve(&doc),
            vec![&json!(1), &json!(2), &json!(1)],
            "duplicates from separate branches must be preserved"
        );
    }

    #[test]
    fn segments_are_never_indices() {
        let doc = json!({"a": [10, 20, 30]});
        assert!(path(&["a", "0"]).resolve(&doc).is_empty());
    }

    #[test]
    fn display_joins_segments() {
        assert_eq!(path(&["a", "b"]).to_string(), "a.b");
    }
}
