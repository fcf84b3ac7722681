//! Typed input values
//!
//! Manifest inputs are free-form YAML. They are carried as an [`InputValue`]
//! tree so that nested settings such as `container.push.enabled` can be read
//! with an explicit dotted path instead of ad-hoc map casting.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Flat map of input name to value
pub type InputMap = BTreeMap<String, InputValue>;

/// A single input value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum InputValue {
    /// Explicit null or missing value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// String
    String(String),
    /// Sequence of values
    Array(Vec<InputValue>),
    /// Nested mapping
    Object(BTreeMap<String, InputValue>),
}

impl InputValue {
    /// Build an object value from key/value pairs
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, InputValue)>,
    {
        InputValue::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Name of the value's kind, as used in validation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            InputValue::Null => "null",
            InputValue::Bool(_) => "boolean",
            InputValue::Integer(_) | InputValue::Float(_) => "number",
            InputValue::String(_) => "string",
            InputValue::Array(_) => "array",
            InputValue::Object(_) => "object",
        }
    }

    /// Whether the value counts as true in an `if` condition
    ///
    /// `false`, zero, null and empty strings or collections are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            InputValue::Null => false,
            InputValue::Bool(b) => *b,
            InputValue::Integer(i) => *i != 0,
            InputValue::Float(f) => *f != 0.0,
            InputValue::String(s) => !s.is_empty(),
            InputValue::Array(items) => !items.is_empty(),
            InputValue::Object(map) => !map.is_empty(),
        }
    }

    /// Borrow as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            InputValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Read as a boolean, only when the value is an actual boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            InputValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow as an object
    pub fn as_object(&self) -> Option<&BTreeMap<String, InputValue>> {
        match self {
            InputValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a nested value by dotted path (`push.enabled`)
    ///
    /// An empty path returns the value itself. Returns `None` when any
    /// segment is missing or traverses a non-object.
    pub fn get_path(&self, path: &str) -> Option<&InputValue> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |current, segment| match current {
            InputValue::Object(map) => map.get(segment),
            _ => None,
        })
    }

    /// Set a nested value by dotted path, creating objects along the way
    ///
    /// Any non-object met on the way is replaced by an object.
    pub fn set_path(&mut self, path: &str, value: InputValue) {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        if !matches!(self, InputValue::Object(_)) {
            *self = InputValue::Object(BTreeMap::new());
        }
        if let InputValue::Object(map) = self {
            match rest {
                Some(rest) => map
                    .entry(head.to_string())
                    .or_insert(InputValue::Null)
                    .set_path(rest, value),
                None => {
                    map.insert(head.to_string(), value);
                }
            }
        }
    }

    /// Copy every key of `defaults` missing from this object, recursing
    /// into nested objects
    ///
    /// Values already present are kept, whatever their type. Does nothing
    /// unless both sides are objects.
    pub fn fill_from(&mut self, defaults: &InputValue) {
        let (InputValue::Object(target), Some(defaults)) = (self, defaults.as_object()) else {
            return;
        };
        for (key, default) in defaults {
            match target.get_mut(key) {
                Some(existing) => existing.fill_from(default),
                None => {
                    target.insert(key.clone(), default.clone());
                }
            }
        }
    }

    /// Equality used by template comparisons
    ///
    /// Integers and floats compare numerically; everything else compares
    /// structurally.
    pub fn loosely_equals(&self, other: &InputValue) -> bool {
        match (self, other) {
            (InputValue::Integer(a), InputValue::Float(b))
            | (InputValue::Float(b), InputValue::Integer(a)) => (*a as f64) == *b,
            _ => self == other,
        }
    }
}

/// Look up a dotted path in an input map (`container.push.enabled`)
pub fn lookup<'a>(inputs: &'a InputMap, path: &str) -> Option<&'a InputValue> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, rest),
        None => (path, ""),
    };
    inputs.get(head)?.get_path(rest)
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Null => Ok(()),
            InputValue::Bool(b) => write!(f, "{}", b),
            InputValue::Integer(i) => write!(f, "{}", i),
            InputValue::Float(x) => write!(f, "{}", x),
            InputValue::String(s) => f.write_str(s),
            InputValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            InputValue::Object(map) => {
                f.write_str("map[")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::String(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        InputValue::String(value)
    }
}

impl From<bool> for InputValue {
    fn from(value: bool) -> Self {
        InputValue::Bool(value)
    }
}

impl From<i64> for InputValue {
    fn from(value: i64) -> Self {
        InputValue::Integer(value)
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        InputValue::Float(value)
    }
}

impl<T: Into<InputValue>> From<Vec<T>> for InputValue {
    fn from(values: Vec<T>) -> Self {
        InputValue::Array(values.into_iter().map(Into::into).collect())
    }
}
