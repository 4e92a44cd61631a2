/*!
# Filter AST and Builders

Defines the closed set of filter variants as a tagged union and exposes
constructors and a builder for assembling filters programmatically.

Every filter is immutable once constructed: invariants are checked at
construction time (or at decode time for the JSON wire form), so a `Filter`
value can be shared freely between threads and evaluated concurrently.

# Examples

Filters compose into trees of owned children:

```
use jsonmatch::filter::Filter;
use jsonmatch::filter::matcher::matches;
use jsonmatch::path::FieldPath;
use serde_json::json;

let filter = Filter::and(vec![
    Filter::equals(FieldPath::single("x").unwrap(), json!(1)),
    Filter::not(Filter::present(FieldPath::single("z").unwrap())),
]);

assert!(matches(&filter, &json!({"x": 1})));
assert!(!matches(&filter, &json!({"x": 1, "z": null})));
```
*/
use std::fmt;

use regex::Regex;
use serde_json::{Number, Value};

use super::FilterError;
use crate::path::FieldPath;

/// A predicate over JSON documents.
///
/// The variant set is closed: the JSON wire form's `filterType`
/// discriminator selects exactly one of these at decode time, and runtime
/// dispatch is a plain `match`. `And`/`Or` own an ordered list of child
/// filters and `Not` owns exactly one child; filter trees contain no
/// sharing and no cycles.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Some value at `field` equals `value`.
    Equals {
        /// Path of the field to compare.
        field: FieldPath,
        /// The value matching candidates must equal.
        value: Value,
        /// Compare strings case-sensitively. Defaults to `false`.
        case_sensitive: bool,
    },
    /// No value at `field` equals `value` (vacuously true when the field
    /// is absent; use [`Filter::Present`] to require existence).
    NotEquals {
        /// Path of the field to compare.
        field: FieldPath,
        /// The value no candidate may equal.
        value: Value,
        /// Compare strings case-sensitively. Defaults to `false`.
        case_sensitive: bool,
    },
    /// Some numeric value at `field` is strictly greater than `value`.
    GreaterThan {
        /// Path of the field to compare.
        field: FieldPath,
        /// Numeric lower bound (exclusive).
        value: Number,
    },
    /// Some numeric value at `field` is greater than or equal to `value`.
    GreaterOrEqual {
        /// Path of the field to compare.
        field: FieldPath,
        /// Numeric lower bound (inclusive).
        value: Number,
    },
    /// Some numeric value at `field` is strictly less than `value`.
    LessThan {
        /// Path of the field to compare.
        field: FieldPath,
        /// Numeric upper bound (exclusive).
        value: Number,
    },
    /// Some numeric value at `field` is less than or equal to `value`.
    LessOrEqual {
        /// Path of the field to compare.
        field: FieldPath,
        /// Numeric upper bound (inclusive).
        value: Number,
    },
    /// Some string value at `field` satisfies a substring assertion.
    Substring {
        /// Path of the field to test.
        field: FieldPath,
        /// The substring components to match.
        assertion: SubstringAssertion,
    },
    /// Some string value at `field` matches a regular expression.
    Regex {
        /// Path of the field to test.
        field: FieldPath,
        /// The compiled pattern.
        assertion: RegexAssertion,
    },
    /// Resolution of `field` yields at least one value of any kind.
    Present {
        /// Path of the field that must exist.
        field: FieldPath,
    },
    /// Some value at `field` equals `value`, intended for array-membership
    /// checks where the caller does not know whether the field holds a
    /// scalar or an array.
    ContainsField {
        /// Path of the field to test.
        field: FieldPath,
        /// The member value to look for.
        value: Value,
        /// Compare strings case-sensitively. Defaults to `false`.
        case_sensitive: bool,
    },
    /// Every child filter matches. An empty `And` matches everything.
    And {
        /// The child filters, all of which must match.
        filters: Vec<Filter>,
    },
    /// At least one child filter matches. An empty `Or` matches nothing.
    Or {
        /// The child filters, any of which may match.
        filters: Vec<Filter>,
    },
    /// The child filter does not match.
    Not {
        /// The negated child filter.
        filter: Box<Filter>,
    },
}

impl Filter {
    /// Returns the wire-form `filterType` discriminator for this variant.
    #[must_use]
    pub const fn filter_type(&self) -> &'static str {
        match self {
            Self::Equals { .. } => "equals",
            Self::NotEquals { .. } => "notEquals",
            Self::GreaterThan { .. } => "greaterThan",
            Self::GreaterOrEqual { .. } => "greaterOrEqual",
            Self::LessThan { .. } => "lessThan",
            Self::LessOrEqual { .. } => "lessOrEqual",
            Self::Substring { .. } => "substring",
            Self::Regex { .. } => "regularExpression",
            Self::Present { .. } => "present",
            Self::ContainsField { .. } => "containsField",
            Self::And { .. } => "and",
            Self::Or { .. } => "or",
            Self::Not { .. } => "not",
        }
    }

    /// Constructs a case-insensitive equality filter.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonmatch::filter::Filter;
    /// use jsonmatch::path::FieldPath;
    /// use serde_json::json;
    ///
    /// let filter = Filter::equals(FieldPath::single("name").unwrap(), json!("ada"));
    /// assert_eq!(filter.filter_type(), "equals");
    /// ```
    #[must_use]
    pub const fn equals(field: FieldPath, value: Value) -> Self {
        Self::Equals { field, value, case_sensitive: false }
    }

    /// Constructs a case-insensitive inequality filter. The filter matches
    /// when *no* value at `field` equals `value`, including when the field
    /// is entirely absent.
    #[must_use]
    pub const fn not_equals(field: FieldPath, value: Value) -> Self {
        Self::NotEquals { field, value, case_sensitive: false }
    }

    /// Constructs a strict greater-than comparison filter.
    #[must_use]
    pub const fn greater_than(field: FieldPath, value: Number) -> Self {
        Self::GreaterThan { field, value }
    }

    /// Constructs a greater-or-equal comparison filter.
    #[must_use]
    pub const fn greater_or_equal(field: FieldPath, value: Number) -> Self {
        Self::GreaterOrEqual { field, value }
    }

    /// Constructs a strict less-than comparison filter.
    #[must_use]
    pub const fn less_than(field: FieldPath, value: Number) -> Self {
        Self::LessThan { field, value }
    }

    /// Constructs a less-or-equal comparison filter.
    #[must_use]
    pub const fn less_or_equal(field: FieldPath, value: Number) -> Self {
        Self::LessOrEqual { field, value }
    }

    /// Starts building a substring filter for `field`.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonmatch::filter::Filter;
    /// use jsonmatch::path::FieldPath;
    ///
    /// let filter = Filter::substring(FieldPath::single("name").unwrap())
    ///     .starts_with("ada")
    ///     .ends_with("lace")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(filter.filter_type(), "substring");
    /// ```
    #[must_use]
    pub const fn substring(field: FieldPath) -> SubstringBuilder {
        SubstringBuilder::new(field)
    }

    /// Constructs a regular-expression filter with search (unanchored)
    /// semantics.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvariantViolation`] if `pattern` is not a
    /// valid regular expression.
    pub fn regex<T: Into<String>>(field: FieldPath, pattern: T) -> Result<Self, FilterError> {
        Ok(Self::Regex {
            field,
            assertion: RegexAssertion::new(pattern, false)?,
        })
    }

    /// Constructs a field-presence filter.
    #[must_use]
    pub const fn present(field: FieldPath) -> Self {
        Self::Present { field }
    }

    /// Constructs a case-insensitive array-membership filter.
    #[must_use]
    pub const fn contains_field(field: FieldPath, value: Value) -> Self {
        Self::ContainsField { field, value, case_sensitive: false }
    }

    /// Constructs a conjunction of the given filters. An empty list yields
    /// a filter that matches every document (the identity of `and`).
    #[must_use]
    pub const fn and(filters: Vec<Self>) -> Self {
        Self::And { filters }
    }

    /// Constructs a disjunction of the given filters. An empty list yields
    /// a filter that matches no document (the identity of `or`).
    #[must_use]
    pub const fn or(filters: Vec<Self>) -> Self {
        Self::Or { filters }
    }

    /// Constructs the negation of `filter`.
    #[must_use]
    pub fn not(filter: Self) -> Self {
        Self::Not { filter: Box::new(filter) }
    }
}

impl fmt::Display for Filter {
    /// Formats the filter as its compact canonical JSON form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", super::encode::encode(self))
    }
}

/// Folds a string for case-insensitive comparison. Unicode default case
/// mapping, independent of any runtime locale.
pub(crate) fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// The substring components of a [`Filter::Substring`] filter.
///
/// A matching value must start with `starts_with` (if present), end with
/// `ends_with` (if present), and contain every `contains` entry in order
/// between the two, with no overlap between components. At least one
/// component must be present.
///
/// Case-folded copies of the components and the minimum length a value
/// needs to possibly match are computed once at construction so that
/// evaluation does no per-document preprocessing beyond folding the
/// candidate itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstringAssertion {
    starts_with: Option<String>,
    contains: Vec<String>,
    ends_with: Option<String>,
    case_sensitive: bool,

    match_starts_with: Option<String>,
    match_contains: Vec<String>,
    match_ends_with: Option<String>,
    min_length: usize,
}

impl SubstringAssertion {
    /// Creates a substring assertion from its components.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvariantViolation`] if none of
    /// `starts_with`, `contains`, `ends_with` is present.
    pub fn new(
        starts_with: Option<String>,
        contains: Vec<String>,
        ends_with: Option<String>,
        case_sensitive: bool,
    ) -> Result<Self, FilterError> {
        if starts_with.is_none() && contains.is_empty() && ends_with.is_none() {
            return Err(FilterError::InvariantViolation(
                "substring filter requires at least one of startsWith, \
                 contains, or endsWith"
                    .into(),
            ));
        }

        let fold_component =
            |s: &String| if case_sensitive { s.clone() } else { fold(s) };

        let match_starts_with = starts_with.as_ref().map(fold_component);
        let match_contains: Vec<String> = contains.iter().map(fold_component).collect();
        let match_ends_with = ends_with.as_ref().map(fold_component);

        let min_length = match_starts_with.as_ref().map_or(0, String::len)
            + match_contains.iter().map(String::len).sum::<usize>()
            + match_ends_with.as_ref().map_or(0, String::len);

        Ok(Self {
            starts_with,
            contains,
            ends_with,
            case_sensitive,
            match_starts_with,
            match_contains,
            match_ends_with,
            min_length,
        })
    }

    /// The substring that must appear at the beginning of matching values,
    /// if any.
    #[must_use]
    pub fn starts_with(&self) -> Option<&str> {
        self.starts_with.as_deref()
    }

    /// The substrings that must appear, in order, somewhere in matching
    /// values (after any `starts_with` and before any `ends_with`).
    #[must_use]
    pub fn contains(&self) -> &[String] {
        &self.contains
    }

    /// The substring that must appear at the end of matching values, if
    /// any.
    #[must_use]
    pub fn ends_with(&self) -> Option<&str> {
        self.ends_with.as_deref()
    }

    /// Whether matching is case-sensitive.
    #[must_use]
    pub const fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Tests a candidate string against this assertion.
    ///
    /// The prefix and suffix are consumed first, then the `contains`
    /// entries are matched left to right inside what remains, each
    /// consuming the text up to and including its match. Components never
    /// overlap.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        let folded;
        let value = if self.case_sensitive {
            candidate
        } else {
            folded = fold(candidate);
            &folded
        };

        if value.len() < self.min_length {
            return false;
        }

        let mut remaining = value;
        if let Some(prefix) = &self.match_starts_with {
            match remaining.strip_prefix(prefix.as_str()) {
                Some(rest) => remaining = rest,
                None => return false,
            }
        }
        if let Some(suffix) = &self.match_ends_with {
            match remaining.strip_suffix(suffix.as_str()) {
                Some(rest) => remaining = rest,
                None => return false,
            }
        }
        for needle in &self.match_contains {
            match remaining.find(needle.as_str()) {
                Some(idx) => remaining = &remaining[idx + needle.len()..],
                None => return false,
            }
        }

        true
    }
}

/// A compiled regular-expression assertion for [`Filter::Regex`] filters.
///
/// The pattern is compiled exactly once, at construction. When
/// `match_entire_value` is set the stored automaton is built from the
/// pattern wrapped in `\A(?:…)\z`, so entire-value matching costs the same
/// as a search. The regex crate's non-backtracking engine and its
/// construction-time size limit bound evaluation cost for any input.
#[derive(Debug, Clone)]
pub struct RegexAssertion {
    pattern: String,
    match_entire_value: bool,
    regex: Regex,
}

impl RegexAssertion {
    /// Compiles a regular-expression assertion.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvariantViolation`] if `pattern` does not
    /// compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonmatch::filter::RegexAssertion;
    ///
    /// let assertion = RegexAssertion::new("[0-9]+", true).unwrap();
    /// assert!(assertion.matches("42"));
    /// assert!(!assertion.matches("4x2"));
    ///
    /// assert!(RegexAssertion::new("(unclosed", false).is_err());
    /// ```
    pub fn new<T: Into<String>>(
        pattern: T,
        match_entire_value: bool,
    ) -> Result<Self, FilterError> {
        let pattern = pattern.into();
        let source = if match_entire_value {
            format!(r"\A(?:{pattern})\z")
        } else {
            pattern.clone()
        };
        let regex = Regex::new(&source).map_err(|err| {
            FilterError::InvariantViolation(format!(
                "invalid regular expression {pattern:?}: {err}"
            ))
        })?;

        Ok(Self { pattern, match_entire_value, regex })
    }

    /// The original pattern text as supplied (without anchoring).
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the pattern must match the entire candidate value rather
    /// than being searched for within it.
    #[must_use]
    pub const fn match_entire_value(&self) -> bool {
        self.match_entire_value
    }

    /// Tests a candidate string against this assertion.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

// Equality is defined on the pattern text and anchoring mode; the compiled
// automaton is derived from both.
impl PartialEq for RegexAssertion {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && self.match_entire_value == other.match_entire_value
    }
}

/// Builder for [`Filter::Substring`] filters.
///
/// The builder is the only mutable stage in a filter's life; `build`
/// validates the components and produces the immutable filter value. A
/// builder must not be shared across threads while being assembled.
///
/// # Examples
///
/// ```
/// use jsonmatch::filter::Filter;
/// use jsonmatch::filter::matcher::matches;
/// use jsonmatch::path::FieldPath;
/// use serde_json::json;
///
/// let filter = Filter::substring(FieldPath::single("x").unwrap())
///     .starts_with("ab")
///     .contains(["cd", "ef"])
///     .ends_with("gh")
///     .build()
///     .unwrap();
///
/// assert!(matches(&filter, &json!({"x": "abcdefgh"})));
/// assert!(!matches(&filter, &json!({"x": "abefcdgh"})));
/// ```
#[derive(Debug, Clone)]
pub struct SubstringBuilder {
    field: FieldPath,
    starts_with: Option<String>,
    contains: Vec<String>,
    ends_with: Option<String>,
    case_sensitive: bool,
}

impl SubstringBuilder {
    /// Creates a builder targeting `field` with no components set.
    #[must_use]
    pub const fn new(field: FieldPath) -> Self {
        Self {
            field,
            starts_with: None,
            contains: Vec::new(),
            ends_with: None,
            case_sensitive: false,
        }
    }

    /// Requires matching values to start with `prefix`.
    #[must_use]
    pub fn starts_with<T: Into<String>>(mut self, prefix: T) -> Self {
        self.starts_with = Some(prefix.into());
        self
    }

    /// Requires matching values to contain every given substring, in
    /// order, without overlap. Replaces any previously set list.
    #[must_use]
    pub fn contains<I, T>(mut self, substrings: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.contains = substrings.into_iter().map(Into::into).collect();
        self
    }

    /// Requires matching values to end with `suffix`.
    #[must_use]
    pub fn ends_with<T: Into<String>>(mut self, suffix: T) -> Self {
        self.ends_with = Some(suffix.into());
        self
    }

    /// Sets case-sensitive matching. The default is case-insensitive.
    #[must_use]
    pub const fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Validates the components and produces the immutable filter.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvariantViolation`] if no component was
    /// set.
    pub fn build(self) -> Result<Filter, FilterError> {
        Ok(Filter::Substring {
            field: self.field,
            assertion: SubstringAssertion::new(
                self.starts_with,
                self.contains,
                self.ends_with,
                self.case_sensitive,
            )?,
        })
    }
}
