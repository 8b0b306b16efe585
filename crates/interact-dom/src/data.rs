#![forbid(unsafe_code)]

//! Associated per-node data.
//!
//! Every element carries a small string-keyed bag of values. Values come from
//! two places: `data-*` attributes (read lazily, names converted to camelCase)
//! and values stored programmatically with
//! [`Document::set_data`](crate::Document::set_data). Programmatic values win
//! when both define the same key.
//!
//! Values are coerced to strings with the same rules a script host uses for
//! `String(value)`: integral floats print without a fraction, `null` prints
//! as `null`, booleans print as `true`/`false`.

use std::fmt;

/// Attribute prefix that exposes an attribute as associated data.
pub const DATA_ATTRIBUTE_PREFIX: &str = "data-";

/// A primitive value stored against a node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataValue {
    /// UTF-8 string value.
    String(String),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Explicit null.
    Null,
}

impl DataValue {
    /// Returns the string payload if this is a [`DataValue::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write_float(f, *value),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Null => f.write_str("null"),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        return f.write_str("NaN");
    }
    if value.is_infinite() {
        return f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" });
    }
    // Integral values inside the exactly-representable range print like integers.
    if value.fract() == 0.0 && value.abs() < 9.007_199_254_740_992e15 {
        return write!(f, "{}", value as i64);
    }
    write!(f, "{value}")
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Convert a `data-*` attribute name into its associated-data key.
///
/// Returns `None` when `attribute` does not start with `data-` or has nothing
/// after the prefix. Each `-x` (lowercase ASCII letter) collapses to `X`:
///
/// ```
/// use interact_dom::data::data_key_from_attribute;
///
/// assert_eq!(data_key_from_attribute("data-text-plain").as_deref(), Some("textPlain"));
/// assert_eq!(data_key_from_attribute("data-dropzone").as_deref(), Some("dropzone"));
/// assert_eq!(data_key_from_attribute("title"), None);
/// ```
#[must_use]
pub fn data_key_from_attribute(attribute: &str) -> Option<String> {
    let rest = attribute.strip_prefix(DATA_ATTRIBUTE_PREFIX)?;
    if rest.is_empty() {
        return None;
    }

    let mut key = String::with_capacity(rest.len());
    let mut chars = rest.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '-'
            && let Some(next) = chars.peek().copied()
            && next.is_ascii_lowercase()
        {
            key.push(next.to_ascii_uppercase());
            chars.next();
            continue;
        }
        key.push(ch);
    }
    Some(key)
}
