// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable loader.
//!
//! This module provides a loader that reads property values from environment
//! variables.

use crate::domain::values::{LoadContext, LoadSession, LoaderValues};
use crate::ports::Loader;

/// Maximum length for environment variable keys (prevents DoS)
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Loader for environment variables.
///
/// Variable names are matched against property names through the naming
/// strategy, so with the default case-insensitive strategy `APP.SERVER.PORT`
/// and `app.Server.PORT` name the same property. Variables that match no
/// property are ignored, since the environment holds much more than the
/// application's configuration.
///
/// Variables are read from the [`Environment`](crate::domain::Environment)
/// captured when the configuration is built, never from the live process.
///
/// # Examples
///
/// ```rust
/// use hexprop::adapters::EnvVarLoader;
///
/// // Read all environment variables
/// let loader = EnvVarLoader::new();
///
/// // Read only variables with a specific prefix, mapping `_` to `.`
/// let loader = EnvVarLoader::with_prefix("MYAPP_").replace_underscores(true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvVarLoader {
    /// Optional prefix to filter environment variables
    prefix: Option<String>,
    /// Whether to replace underscores with dots
    replace_underscores: bool,
}

impl EnvVarLoader {
    /// Creates a new environment variable loader without prefix filtering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new environment variable loader with prefix filtering.
    ///
    /// Only environment variables starting with the given prefix are read.
    /// The prefix is stripped before the name is matched.
    ///
    /// # Arguments
    ///
    /// * `prefix` - The prefix to filter environment variables (e.g., "APP_")
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            replace_underscores: false,
        }
    }

    /// Sets whether to replace underscores with dots in names.
    ///
    /// Off by default. When enabled, `APP_SERVER_PORT` is matched as
    /// `APP.SERVER.PORT`.
    pub fn replace_underscores(mut self, enabled: bool) -> Self {
        self.replace_underscores = enabled;
        self
    }

    /// Maps a variable name to the property name it is matched as.
    fn property_name(&self, key: &str) -> Option<String> {
        let key = match &self.prefix {
            Some(prefix) => key.strip_prefix(prefix.as_str())?,
            None => key,
        };
        if key.is_empty() {
            return None;
        }
        if self.replace_underscores {
            Some(key.replace('_', "."))
        } else {
            Some(key.to_string())
        }
    }
}

impl Loader for EnvVarLoader {
    fn name(&self) -> &str {
        "env"
    }

    fn specific_load_description(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("environment variables with prefix '{}'", prefix),
            None => "environment variables".to_string(),
        }
    }

    fn load(&self, ctx: &LoadContext<'_>) -> LoaderValues {
        let mut session = LoadSession::new(ctx, self);
        let mut matched = 0usize;

        for (key, value) in ctx.environment().env_vars() {
            // Validate input sizes to prevent DoS
            if key.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    "Skipping oversized environment variable: key_len={}, value_len={} (max key={}, max value={})",
                    key.len(),
                    value.len(),
                    MAX_ENV_KEY_LEN,
                    MAX_ENV_VALUE_LEN
                );
                continue;
            }

            let Some(name) = self.property_name(key) else {
                continue;
            };
            if ctx.registry().property_for_name(&name).is_some() {
                matched += 1;
            }
            session.attempt_to_add(&name, Some(value.as_str()));
        }

        tracing::debug!(
            "Matched {} environment variables (prefix={:?}, replace_underscores={})",
            matched,
            self.prefix,
            self.replace_underscores
        );
        session.finish()
    }

    fn is_unknown_property_a_problem(&self) -> bool {
        false
    }

    fn is_flag_value_supported(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::CaseInsensitiveNaming;
    use crate::domain::environment::Environment;
    use crate::domain::group::Group;
    use crate::domain::property::{Property, PropertyDef};
    use crate::domain::registry::PropertyRegistry;
    use crate::domain::value::Value;
    use crate::domain::values::{LoaderInfo, ValuesSoFar};
    use std::sync::Arc;

    fn registry(host: &Property<String>, port: &Property<i32>) -> PropertyRegistry {
        let group = Group::new("database").with("HOST", host).with("PORT", port);
        PropertyRegistry::build(vec![group], &[], Arc::new(CaseInsensitiveNaming)).0
    }

    fn load(loader: &EnvVarLoader, registry: &PropertyRegistry, env: &Environment) -> LoaderValues {
        let so_far = ValuesSoFar::new();
        let ctx = LoadContext::new(LoaderInfo::new(0, "env", "test"), env, registry, &so_far);
        loader.load(&ctx)
    }

    fn value(lv: &LoaderValues, def: &PropertyDef) -> Option<Value> {
        lv.value_for(def).map(|v| v.value().clone())
    }

    #[test]
    fn test_env_loader_name() {
        let loader = EnvVarLoader::new();
        assert_eq!(loader.name(), "env");
        assert!(!loader.is_unknown_property_a_problem());
    }

    #[test]
    fn test_env_loader_matches_case_insensitively() {
        let host: Property<String> = Property::new();
        let port: Property<i32> = Property::new();
        let registry = registry(&host, &port);
        let env = Environment::empty()
            .with_env_var("DATABASE.HOST", "localhost")
            .with_env_var("database.port", "5432")
            .with_env_var("PATH", "/usr/bin");

        let lv = load(&EnvVarLoader::new(), &registry, &env);
        assert!(lv.problems().is_empty());
        assert_eq!(value(&lv, &host), Some(Value::from("localhost")));
        assert_eq!(value(&lv, &port), Some(Value::Int(5432)));
    }

    #[test]
    fn test_env_loader_with_prefix() {
        let host: Property<String> = Property::new();
        let port: Property<i32> = Property::new();
        let registry = registry(&host, &port);
        let env = Environment::empty()
            .with_env_var("MYAPP_DATABASE_HOST", "localhost")
            .with_env_var("DATABASE_PORT", "1");

        let loader = EnvVarLoader::with_prefix("MYAPP_").replace_underscores(true);
        let lv = load(&loader, &registry, &env);
        assert_eq!(value(&lv, &host), Some(Value::from("localhost")));
        assert_eq!(value(&lv, &port), None);
    }

    #[test]
    fn test_env_loader_no_replace_underscores() {
        let host: Property<String> = Property::new();
        let port: Property<i32> = Property::new();
        let registry = registry(&host, &port);
        let env = Environment::empty().with_env_var("DATABASE_HOST", "localhost");

        let lv = load(&EnvVarLoader::new(), &registry, &env);
        assert!(lv.values().is_empty());
    }

    #[test]
    fn test_env_loader_skips_oversized_values() {
        let host: Property<String> = Property::new();
        let port: Property<i32> = Property::new();
        let registry = registry(&host, &port);
        let env = Environment::empty()
            .with_env_var("DATABASE.HOST", "x".repeat(MAX_ENV_VALUE_LEN + 1));

        let lv = load(&EnvVarLoader::new(), &registry, &env);
        assert!(lv.values().is_empty());
    }

    #[test]
    fn test_env_loader_parse_error_is_a_problem() {
        let host: Property<String> = Property::new();
        let port: Property<i32> = Property::new();
        let registry = registry(&host, &port);
        let env = Environment::empty().with_env_var("DATABASE.PORT", "not_a_number");

        let lv = load(&EnvVarLoader::new(), &registry, &env);
        assert!(lv.values().is_empty());
        assert_eq!(lv.problems().len(), 1);
    }

    #[test]
    fn test_property_name() {
        let loader = EnvVarLoader::with_prefix("APP_").replace_underscores(true);
        assert_eq!(loader.property_name("APP_A_B"), Some("A.B".to_string()));
        assert_eq!(loader.property_name("APP_"), None);
        assert_eq!(loader.property_name("OTHER"), None);
    }
}
