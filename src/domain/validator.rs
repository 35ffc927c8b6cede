// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value validators.
//!
//! A validator is a pure predicate over a parsed [`Value`] plus the text needed
//! to explain a failure. Validators never fail for ordinary invalid input; a
//! validator that is itself mis-specified (a bad regular expression, an empty
//! list of choices) says so through [`Validator::is_specification_valid`].

use crate::domain::value::{Value, ValueType};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

/// A rule a property value must satisfy.
///
/// # Examples
///
/// ```rust
/// use hexprop::domain::validator::Validator;
/// use hexprop::domain::value::{Value, ValueType};
///
/// #[derive(Debug)]
/// struct Even;
///
/// impl Validator for Even {
///     fn supports(&self, value_type: ValueType) -> bool {
///         matches!(value_type, ValueType::Int | ValueType::Long)
///     }
///
///     fn is_valid(&self, value: &Value) -> bool {
///         value.as_i64().map_or(false, |n| n % 2 == 0)
///     }
///
///     fn describe(&self) -> String {
///         "must be even".to_string()
///     }
/// }
///
/// assert!(Even.is_valid(&Value::Int(4)));
/// assert!(!Even.is_valid(&Value::Int(3)));
/// ```
pub trait Validator: fmt::Debug + Send + Sync {
    /// Returns true if the validator itself is well formed.
    fn is_specification_valid(&self) -> bool {
        true
    }

    /// Explains why the validator is not well formed.
    fn invalid_specification_message(&self) -> String {
        format!("{:?} is not a valid validator", self)
    }

    /// Returns true if the validator can check values of the given type.
    fn supports(&self, value_type: ValueType) -> bool;

    /// Returns true if the value satisfies the rule.
    fn is_valid(&self, value: &Value) -> bool;

    /// Describes the rule, e.g. "must be greater than 0".
    fn describe(&self) -> String;

    /// Builds the message reported for an invalid value.
    fn invalid_message(&self, value: &Value) -> String {
        format!("The value '{}' {}", value, self.describe())
    }
}

fn is_text(value_type: ValueType) -> bool {
    value_type == ValueType::Str
}

fn is_number(value_type: ValueType) -> bool {
    matches!(
        value_type,
        ValueType::Int | ValueType::Long | ValueType::Double
    )
}

/// Requires text to start with a prefix.
#[derive(Clone, Debug)]
pub struct StartsWith {
    prefix: String,
    ignore_case: bool,
}

impl StartsWith {
    /// Creates a case-sensitive validator.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ignore_case: false,
        }
    }

    /// Creates a case-insensitive validator.
    pub fn ignoring_case(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ignore_case: true,
        }
    }
}

impl Validator for StartsWith {
    fn supports(&self, value_type: ValueType) -> bool {
        is_text(value_type)
    }

    fn is_valid(&self, value: &Value) -> bool {
        match value.as_str() {
            Some(s) if self.ignore_case => s.to_lowercase().starts_with(&self.prefix.to_lowercase()),
            Some(s) => s.starts_with(&self.prefix),
            None => false,
        }
    }

    fn describe(&self) -> String {
        format!(
            "must start with '{}'{}",
            self.prefix,
            if self.ignore_case { " (ignoring case)" } else { "" }
        )
    }
}

/// Requires text to end with a suffix.
#[derive(Clone, Debug)]
pub struct EndsWith {
    suffix: String,
    ignore_case: bool,
}

impl EndsWith {
    /// Creates a case-sensitive validator.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            ignore_case: false,
        }
    }

    /// Creates a case-insensitive validator.
    pub fn ignoring_case(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            ignore_case: true,
        }
    }
}

impl Validator for EndsWith {
    fn supports(&self, value_type: ValueType) -> bool {
        is_text(value_type)
    }

    fn is_valid(&self, value: &Value) -> bool {
        match value.as_str() {
            Some(s) if self.ignore_case => s.to_lowercase().ends_with(&self.suffix.to_lowercase()),
            Some(s) => s.ends_with(&self.suffix),
            None => false,
        }
    }

    fn describe(&self) -> String {
        format!(
            "must end with '{}'{}",
            self.suffix,
            if self.ignore_case { " (ignoring case)" } else { "" }
        )
    }
}

/// Requires text to match a regular expression in full.
#[derive(Clone, Debug)]
pub struct Matches {
    pattern: String,
    regex: Option<Regex>,
}

impl Matches {
    /// Creates the validator. An invalid pattern is not an error here; it is
    /// reported when the property is registered.
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let regex = Regex::new(&format!("^(?:{})$", pattern)).ok();
        Self { pattern, regex }
    }
}

impl Validator for Matches {
    fn is_specification_valid(&self) -> bool {
        self.regex.is_some()
    }

    fn invalid_specification_message(&self) -> String {
        format!("'{}' is not a valid regular expression", self.pattern)
    }

    fn supports(&self, value_type: ValueType) -> bool {
        is_text(value_type)
    }

    fn is_valid(&self, value: &Value) -> bool {
        match (&self.regex, value.as_str()) {
            (Some(regex), Some(s)) => regex.is_match(s),
            _ => false,
        }
    }

    fn describe(&self) -> String {
        format!("must match the regular expression '{}'", self.pattern)
    }
}

/// Requires text to be one of a fixed set of choices.
#[derive(Clone, Debug)]
pub struct OneOf {
    choices: Vec<String>,
    ignore_case: bool,
}

impl OneOf {
    /// Creates a case-sensitive validator.
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
            ignore_case: false,
        }
    }

    /// Creates a case-insensitive validator.
    pub fn ignoring_case<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignore_case: true,
            ..Self::new(choices)
        }
    }
}

impl Validator for OneOf {
    fn is_specification_valid(&self) -> bool {
        !self.choices.is_empty()
    }

    fn invalid_specification_message(&self) -> String {
        "the list of allowed values is empty".to_string()
    }

    fn supports(&self, value_type: ValueType) -> bool {
        is_text(value_type)
    }

    fn is_valid(&self, value: &Value) -> bool {
        let s = match value.as_str() {
            Some(s) => s,
            None => return false,
        };
        self.choices.iter().any(|c| {
            if self.ignore_case {
                c.eq_ignore_ascii_case(s)
            } else {
                c == s
            }
        })
    }

    fn describe(&self) -> String {
        format!("must be one of [{}]", self.choices.join(", "))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Comparison {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl Comparison {
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Comparison::GreaterThan => ordering == Ordering::Greater,
            Comparison::GreaterThanOrEqual => ordering != Ordering::Less,
            Comparison::LessThan => ordering == Ordering::Less,
            Comparison::LessThanOrEqual => ordering != Ordering::Greater,
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            Comparison::GreaterThan => "greater than",
            Comparison::GreaterThanOrEqual => "greater than or equal to",
            Comparison::LessThan => "less than",
            Comparison::LessThanOrEqual => "less than or equal to",
        }
    }
}

/// Requires a number to compare against a fixed limit.
///
/// # Examples
///
/// ```
/// use hexprop::domain::validator::{NumberBound, Validator};
/// use hexprop::domain::value::Value;
///
/// let positive = NumberBound::greater_than(0);
/// assert!(positive.is_valid(&Value::Int(1)));
/// assert!(!positive.is_valid(&Value::Int(-1)));
/// assert_eq!(positive.describe(), "must be greater than 0");
/// ```
#[derive(Clone, Debug)]
pub struct NumberBound {
    comparison: Comparison,
    limit: Value,
}

impl NumberBound {
    fn new(comparison: Comparison, limit: impl Into<Value>) -> Self {
        Self {
            comparison,
            limit: limit.into(),
        }
    }

    /// Value must be greater than the limit.
    pub fn greater_than(limit: impl Into<Value>) -> Self {
        Self::new(Comparison::GreaterThan, limit)
    }

    /// Value must be greater than or equal to the limit.
    pub fn greater_than_or_equal(limit: impl Into<Value>) -> Self {
        Self::new(Comparison::GreaterThanOrEqual, limit)
    }

    /// Value must be less than the limit.
    pub fn less_than(limit: impl Into<Value>) -> Self {
        Self::new(Comparison::LessThan, limit)
    }

    /// Value must be less than or equal to the limit.
    pub fn less_than_or_equal(limit: impl Into<Value>) -> Self {
        Self::new(Comparison::LessThanOrEqual, limit)
    }
}

impl Validator for NumberBound {
    fn is_specification_valid(&self) -> bool {
        self.limit.is_numeric() && self.limit.compare_numeric(&self.limit).is_some()
    }

    fn invalid_specification_message(&self) -> String {
        format!("the limit '{}' is not a number", self.limit)
    }

    fn supports(&self, value_type: ValueType) -> bool {
        is_number(value_type)
    }

    fn is_valid(&self, value: &Value) -> bool {
        value
            .compare_numeric(&self.limit)
            .map_or(false, |ordering| self.comparison.holds(ordering))
    }

    fn describe(&self) -> String {
        format!("must be {} {}", self.comparison.phrase(), self.limit)
    }
}
