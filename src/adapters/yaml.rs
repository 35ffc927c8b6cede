// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML file parser.
//!
//! This module provides a [`ConfigParser`] for YAML files, used with the
//! [`FileLoader`](crate::adapters::FileLoader).

use crate::domain::{ConfigError, Result};
use crate::ports::ConfigParser;
use std::collections::BTreeMap;

/// YAML parser implementation.
///
/// This parser converts YAML files into flat name/text maps using dot notation
/// for nested structures, so nested mappings line up with group names.
///
/// # Examples
///
/// ```rust
/// use hexprop::adapters::YamlParser;
/// use hexprop::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let yaml_content = "app:\n  Server:\n    HOST: localhost\n    PORT: 5432";
/// let result = parser.parse(yaml_content).unwrap();
/// assert_eq!(result.get("app.Server.HOST"), Some(&"localhost".to_string()));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    /// Flattens a YAML value into a flat map with dot notation keys.
    fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, result: &mut BTreeMap<String, String>) {
        match value {
            serde_yaml::Value::Mapping(map) => {
                for (key, val) in map {
                    let key_str = match key {
                        serde_yaml::Value::String(s) => s.clone(),
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        _ => continue,
                    };
                    let new_prefix = if prefix.is_empty() {
                        key_str
                    } else {
                        format!("{}.{}", prefix, key_str)
                    };
                    Self::flatten_yaml(val, &new_prefix, result);
                }
            }
            serde_yaml::Value::Sequence(seq) => {
                for (i, val) in seq.iter().enumerate() {
                    let new_prefix = if prefix.is_empty() {
                        i.to_string()
                    } else {
                        format!("{}.{}", prefix, i)
                    };
                    Self::flatten_yaml(val, &new_prefix, result);
                }
            }
            _ if prefix.is_empty() => {}
            serde_yaml::Value::String(s) => {
                result.insert(prefix.to_string(), s.clone());
            }
            serde_yaml::Value::Number(n) => {
                result.insert(prefix.to_string(), n.to_string());
            }
            serde_yaml::Value::Bool(b) => {
                result.insert(prefix.to_string(), b.to_string());
            }
            serde_yaml::Value::Null => {
                result.insert(prefix.to_string(), String::new());
            }
            _ => {}
        }
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<BTreeMap<String, String>> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        let mut result = BTreeMap::new();
        Self::flatten_yaml(&value, "", &mut result);
        Ok(result)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
