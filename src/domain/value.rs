// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed property values and their text conversions.
//!
//! Sources deliver text; properties hold typed [`Value`]s. A [`ValueType`] is
//! the parse/serialize contract between the two, and a [`Trimmer`] decides how
//! raw text is cleaned up before it is parsed.

use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A typed property value.
///
/// # Examples
///
/// ```
/// use hexprop::domain::value::{Value, ValueType};
///
/// let value = ValueType::Int.parse("COUNT", Some("42")).unwrap();
/// assert_eq!(value, Some(Value::Int(42)));
/// assert_eq!(Value::Int(42).to_string(), "42");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Text
    Str(String),
    /// Boolean (also used by flags)
    Bool(bool),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// Double precision float
    Double(f64),
}

impl Value {
    /// Returns the text if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int` value.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int` or `Long` value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number as a float if this is any numeric value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(f64::from(*n)),
            Value::Long(n) => Some(*n as f64),
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns true for `Int`, `Long` and `Double`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Long(_) | Value::Double(_))
    }

    /// Compares two numeric values, widening as needed.
    ///
    /// Returns `None` if either value is not numeric or a float is NaN.
    pub fn compare_numeric(&self, other: &Value) -> Option<Ordering> {
        match (self.as_i64(), other.as_i64()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => self.as_f64()?.partial_cmp(&other.as_f64()?),
        }
    }

    /// Converts the value to its canonical text form.
    pub fn to_text(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Long(n) => n.to_string(),
            Value::Double(n) => n.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

/// The parse/serialize contract of a property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Text, kept verbatim after trimming
    Str,
    /// Boolean; blank text means "no value"
    Bool,
    /// Boolean where presence alone means true
    Flag,
    /// 32-bit integer
    Int,
    /// 64-bit integer
    Long,
    /// Double precision float
    Double,
}

impl ValueType {
    /// Returns a short, human readable name of the type.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Str => "string",
            ValueType::Bool => "boolean",
            ValueType::Flag => "flag",
            ValueType::Int => "integer",
            ValueType::Long => "long",
            ValueType::Double => "double",
        }
    }

    /// Returns true if the value has the shape this type produces.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ValueType::Str, Value::Str(_))
                | (ValueType::Bool | ValueType::Flag, Value::Bool(_))
                | (ValueType::Int, Value::Int(_))
                | (ValueType::Long, Value::Long(_))
                | (ValueType::Double, Value::Double(_))
        )
    }

    /// Returns the trimmer used when a property does not choose one.
    pub fn default_trimmer(&self) -> Trimmer {
        match self {
            ValueType::Str => Trimmer::QuotedSpacePreserving,
            _ => Trimmer::TrimToNull,
        }
    }

    /// Parses text into a value.
    ///
    /// Returns `Ok(None)` when there is no value: `None` text for every type,
    /// and blank text for every type except strings. Strings are kept
    /// verbatim because whitespace handling belongs to the [`Trimmer`].
    ///
    /// # Arguments
    ///
    /// * `key` - The name the text was found under, used in error messages
    /// * `text` - The text to parse
    ///
    /// # Examples
    ///
    /// ```
    /// use hexprop::domain::value::{Value, ValueType};
    ///
    /// assert_eq!(ValueType::Bool.parse("DEBUG", Some("yes")).unwrap(), Some(Value::Bool(true)));
    /// assert_eq!(ValueType::Int.parse("COUNT", Some("  ")).unwrap(), None);
    /// assert_eq!(ValueType::Int.parse("COUNT", None).unwrap(), None);
    /// assert!(ValueType::Int.parse("COUNT", Some("ten")).is_err());
    /// ```
    pub fn parse(&self, key: &str, text: Option<&str>) -> Result<Option<Value>> {
        let text = match text {
            None => return Ok(None),
            Some(text) => text,
        };

        if *self == ValueType::Str {
            return Ok(Some(Value::Str(text.to_string())));
        }

        if text.trim().is_empty() {
            return Ok(None);
        }

        let value = match self {
            ValueType::Str => unreachable!("strings are returned above"),
            ValueType::Bool | ValueType::Flag => Value::Bool(parse_bool(key, text)?),
            ValueType::Int => Value::Int(
                text.parse::<i32>()
                    .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))?,
            ),
            ValueType::Long => Value::Long(
                text.parse::<i64>()
                    .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))?,
            ),
            ValueType::Double => Value::Double(
                text.parse::<f64>()
                    .map_err(|e| ConfigError::from_parse_float_error(key.to_string(), e))?,
            ),
        };
        Ok(Some(value))
    }

    /// Parses text from a source where the presence of a name is meaningful.
    ///
    /// For flags this never yields "no value": absent or blank text means
    /// true. Other types require a value and fail if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexprop::domain::value::{Value, ValueType};
    ///
    /// assert_eq!(ValueType::Flag.parse_flag("VERBOSE", None).unwrap(), Value::Bool(true));
    /// assert_eq!(ValueType::Flag.parse_flag("VERBOSE", Some("off")).unwrap(), Value::Bool(false));
    /// ```
    pub fn parse_flag(&self, key: &str, text: Option<&str>) -> Result<Value> {
        if *self == ValueType::Flag && text.map_or(true, |t| t.trim().is_empty()) {
            return Ok(Value::Bool(true));
        }
        self.parse(key, text)?
            .ok_or_else(|| ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: self.name().to_string(),
                source: "a value is required".into(),
            })
    }

    /// Converts a value of this type to text that [`parse`](Self::parse) reads back.
    pub fn to_text(&self, value: &Value) -> String {
        value.to_text()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recognizes the following values (case-insensitive):
/// - `true`: "true", "t", "yes", "y", "on", "1"
/// - `false`: "false", "f", "no", "n", "off", "0"
fn parse_bool(key: &str, text: &str) -> Result<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Ok(false),
        _ => text
            .parse::<bool>()
            .map_err(|e| ConfigError::from_parse_bool_error(key.to_string(), e)),
    }
}

/// Whitespace policy applied to raw text before parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trimmer {
    /// Trim surrounding whitespace; blank text becomes no value.
    TrimToNull,
    /// Like `TrimToNull`, then strip one pair of surrounding double quotes,
    /// keeping whatever whitespace was inside them.
    QuotedSpacePreserving,
}

impl Trimmer {
    /// Applies the policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexprop::domain::value::Trimmer;
    ///
    /// let t = Trimmer::QuotedSpacePreserving;
    /// assert_eq!(t.trim(Some("  abc  ")), Some("abc".to_string()));
    /// assert_eq!(t.trim(Some(" \"  abc  \" ")), Some("  abc  ".to_string()));
    /// assert_eq!(t.trim(Some("   ")), None);
    /// ```
    pub fn trim(&self, raw: Option<&str>) -> Option<String> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            return None;
        }
        match self {
            Trimmer::TrimToNull => Some(trimmed.to_string()),
            Trimmer::QuotedSpacePreserving => {
                if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
                    Some(trimmed[1..trimmed.len() - 1].to_string())
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }
}
