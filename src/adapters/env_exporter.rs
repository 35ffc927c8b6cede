// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable exporter.
//!
//! Exports resolved values into the process environment, so child processes
//! or components that only read environment variables see them.

use crate::domain::{ConfigError, Result};
use crate::ports::Exporter;
use std::collections::BTreeMap;
use std::env;

/// Exporter writing environment variables of the current process.
///
/// # Examples
///
/// ```rust,no_run
/// use hexprop::adapters::EnvVarExporter;
/// use hexprop::ports::Exporter;
///
/// let mut exporter = EnvVarExporter::with_prefix("MYAPP_").replace_dots(true);
/// exporter.export("app.Server.PORT", "8080").unwrap();
/// assert_eq!(std::env::var("MYAPP_app_Server_PORT").unwrap(), "8080");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvVarExporter {
    /// Optional prefix prepended to every variable name
    prefix: Option<String>,
    /// Whether to replace dots with underscores
    replace_dots: bool,
    /// Names of the variables written so far
    exported: Vec<String>,
}

impl EnvVarExporter {
    /// Creates an exporter writing names unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an exporter prepending a prefix to every name.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Sets whether dots in names are replaced with underscores.
    pub fn replace_dots(mut self, enabled: bool) -> Self {
        self.replace_dots = enabled;
        self
    }

    /// Returns the variable names written so far.
    pub fn exported(&self) -> &[String] {
        &self.exported
    }

    /// Maps a property name to the variable name it is written as.
    pub fn variable_name(&self, name: &str) -> String {
        let name = if self.replace_dots {
            name.replace('.', "_")
        } else {
            name.to_string()
        };
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, name),
            None => name,
        }
    }
}

impl Exporter for EnvVarExporter {
    fn export(&mut self, name: &str, value: &str) -> Result<()> {
        let variable = self.variable_name(name);
        let malformed = variable.is_empty() || variable.contains(|c: char| c == '=' || c == '\0');
        if malformed || value.contains('\0') {
            return Err(ConfigError::SourceError {
                source_name: "env-export".to_string(),
                message: format!("'{}' cannot be exported as an environment variable", variable),
                source: None,
            });
        }
        tracing::trace!("Exporting environment variable {}", variable);
        env::set_var(&variable, value);
        self.exported.push(variable);
        Ok(())
    }
}

impl Exporter for BTreeMap<String, String> {
    fn export(&mut self, name: &str, value: &str) -> Result<()> {
        self.insert(name.to_string(), value.to_string());
        Ok(())
    }
}
