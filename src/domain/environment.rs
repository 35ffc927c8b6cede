// SPDX-License-Identifier: MIT OR Apache-2.0

//! The external environment loaders read from.
//!
//! Process state (environment variables, command line, host-provided system
//! properties, a directory service) is captured in one [`Environment`] value
//! and handed to every loader. Tests build one by hand instead of mutating the
//! real process.

use crate::ports::DirectoryContext;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Captured process state.
///
/// # Examples
///
/// ```rust
/// use hexprop::domain::environment::Environment;
///
/// let env = Environment::empty()
///     .with_env_var("APP_SERVER_PORT", "8080")
///     .with_cmd_line_args(["app.Server.HOST=localhost"])
///     .with_system_property("app.Server.TIMEOUT", "30");
///
/// assert_eq!(env.env_vars().get("APP_SERVER_PORT").map(String::as_str), Some("8080"));
/// assert_eq!(env.cmd_line_args().len(), 1);
/// assert!(env.directory().is_none());
/// ```
#[derive(Clone, Default)]
pub struct Environment {
    env_vars: BTreeMap<String, String>,
    cmd_line_args: Vec<String>,
    system_properties: BTreeMap<String, String>,
    directory: Option<Arc<dyn DirectoryContext>>,
}

impl Environment {
    /// Creates an environment with nothing in it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Captures the environment variables of this process.
    ///
    /// Variables whose name or value is not valid unicode are skipped. The
    /// command line is not captured; the host program owns its arguments and
    /// passes the ones meant for configuration with
    /// [`with_cmd_line_args`](Self::with_cmd_line_args).
    pub fn from_process() -> Self {
        let env_vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self {
            env_vars,
            ..Self::default()
        }
    }

    /// Adds one environment variable.
    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Adds environment variables.
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Replaces the command line arguments.
    pub fn with_cmd_line_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cmd_line_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one system property.
    pub fn with_system_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.system_properties.insert(key.into(), value.into());
        self
    }

    /// Adds system properties.
    pub fn with_system_properties<I, K, V>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.system_properties
            .extend(props.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the directory service.
    pub fn with_directory(mut self, directory: Arc<dyn DirectoryContext>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Returns the environment variables, sorted by name.
    pub fn env_vars(&self) -> &BTreeMap<String, String> {
        &self.env_vars
    }

    /// Returns the command line arguments, without the program name.
    pub fn cmd_line_args(&self) -> &[String] {
        &self.cmd_line_args
    }

    /// Returns the system properties, sorted by name.
    pub fn system_properties(&self) -> &BTreeMap<String, String> {
        &self.system_properties
    }

    /// Returns the directory service, if one is available.
    pub fn directory(&self) -> Option<&Arc<dyn DirectoryContext>> {
        self.directory.as_ref()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("env_vars", &self.env_vars.len())
            .field("cmd_line_args", &self.cmd_line_args)
            .field("system_properties", &self.system_properties.len())
            .field("directory", &self.directory)
            .finish()
    }
}
