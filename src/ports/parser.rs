// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which turns the content of a
//! configuration file into flat name/text pairs for the file loader.

use crate::domain::Result;
use std::collections::BTreeMap;

/// A trait for parsing configuration files.
///
/// Parsers produce a flat map of names to raw text. Nested formats flatten
/// their structure with dot notation, so a YAML document like:
///
/// ```yaml
/// app:
///   Server:
///     PORT: 8080
/// ```
///
/// yields `app.Server.PORT` -> `"8080"`. When a format allows a key to appear
/// twice, the last value wins.
///
/// # Examples
///
/// ```rust
/// use hexprop::domain::Result;
/// use hexprop::ports::ConfigParser;
/// use std::collections::BTreeMap;
///
/// struct LineParser;
///
/// impl ConfigParser for LineParser {
///     fn parse(&self, content: &str) -> Result<BTreeMap<String, String>> {
///         Ok(content
///             .lines()
///             .filter_map(|l| l.split_once('='))
///             .map(|(k, v)| (k.to_string(), v.to_string()))
///             .collect())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["lines"]
///     }
/// }
///
/// let values = LineParser.parse("a=1\nb=2").unwrap();
/// assert_eq!(values.get("b"), Some(&"2".to_string()));
/// ```
pub trait ConfigParser: Send + Sync {
    /// Parses file content into name/text pairs.
    ///
    /// # Returns
    ///
    /// * `Ok(BTreeMap<String, String>)` - The parsed pairs
    /// * `Err(ConfigError)` - The content is malformed
    fn parse(&self, content: &str) -> Result<BTreeMap<String, String>>;

    /// Returns the file extensions (without the leading dot) this parser reads.
    fn supported_extensions(&self) -> &[&str];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigError;

    struct Strict;

    impl ConfigParser for Strict {
        fn parse(&self, content: &str) -> Result<BTreeMap<String, String>> {
            let mut map = BTreeMap::new();
            for line in content.lines() {
                let (k, v) = line.split_once('=').ok_or_else(|| ConfigError::ParseError {
                    message: format!("missing '=' in '{}'", line),
                    source: None,
                })?;
                map.insert(k.to_string(), v.to_string());
            }
            Ok(map)
        }

        fn supported_extensions(&self) -> &[&str] {
            &["strict", "str"]
        }
    }

    #[test]
    fn test_parser_last_value_wins() {
        let result = Strict.parse("a=1\na=2").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.get("a"), Some(&"2".to_string()));
    }

    #[test]
    fn test_parser_error() {
        let err = Strict.parse("no separator").unwrap_err();
        assert!(err.to_string().contains("missing '='"));
    }

    #[test]
    fn test_parser_supported_extensions() {
        assert_eq!(Strict.supported_extensions(), &["strict", "str"]);
    }
}
