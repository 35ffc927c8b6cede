// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory service loader.
//!
//! Properties are looked up by name in a [`DirectoryContext`]. Every in-name
//! of a property is tried under every configured root, in both the dot
//! delimited form and the slash delimited form, e.g. for `app.Server.PORT`
//! with the standard roots:
//!
//! - `comp/env/app.Server.PORT`
//! - `comp/env/app/Server/PORT`
//! - `app.Server.PORT`
//! - `app/Server/PORT`
//!
//! Finding a property under more than one of these names is a problem.

use crate::domain::group::Group;
use crate::domain::problem::LoaderProblem;
use crate::domain::property::Property;
use crate::domain::value::Value;
use crate::domain::values::{LoadContext, LoadSession, LoaderValues};
use crate::domain::Result;
use crate::ports::{DirectoryContext, Loader};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Name of the group holding the directory loader's settings.
pub const DIRECTORY_GROUP: &str = "hexprop.DirectoryLoader";

/// Written form of the empty root in a root list.
const EMPTY_ROOT: &str = "\"\"";

/// Roots every lookup is tried under, as a comma separated list.
pub static STANDARD_ROOTS: Lazy<Property<String>> = Lazy::new(|| {
    Property::builder()
        .default_value("comp/env/,\"\"".to_string())
        .description("Comma separated directory roots; \"\" is the empty root")
        .build()
});

/// Extra roots tried after the standard roots, as a comma separated list.
pub static ADDED_ROOTS: Lazy<Property<String>> = Lazy::new(|| {
    Property::builder()
        .description("Comma separated directory roots added to the standard ones")
        .build()
});

/// Loader for a directory service.
///
/// The directory comes from the [`Environment`](crate::domain::Environment).
/// When there is none, or it cannot be queried, the loader returns no values;
/// this is reported as a problem only if
/// [`missing_environment_is_problem`](Self::missing_environment_is_problem)
/// is set.
///
/// # Examples
///
/// ```rust
/// use hexprop::adapters::DirectoryLoader;
/// use hexprop::ports::Loader;
///
/// let loader = DirectoryLoader::new().missing_environment_is_problem(true);
/// assert!(loader.is_missing_environment_a_problem());
/// assert!(loader.class_config().is_some());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryLoader {
    missing_environment_is_problem: bool,
}

impl DirectoryLoader {
    /// Creates a new directory loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether an absent or failing directory is a problem.
    pub fn missing_environment_is_problem(mut self, enabled: bool) -> Self {
        self.missing_environment_is_problem = enabled;
        self
    }

    /// Returns the roots configured by earlier loaders, standard roots first.
    fn roots(ctx: &LoadContext<'_>) -> Vec<String> {
        let so_far = ctx.values_so_far();
        let mut roots: Vec<String> = Vec::new();
        for property in [&*STANDARD_ROOTS, &*ADDED_ROOTS] {
            if let Some(Value::Str(list)) = so_far.value_or_default(property) {
                for root in parse_roots(list) {
                    if !roots.contains(&root) {
                        roots.push(root);
                    }
                }
            }
        }
        roots
    }

    fn missing_environment(&self, session: &mut LoadSession<'_, '_>, message: String) {
        if self.missing_environment_is_problem {
            session.add_problem(LoaderProblem::MissingEnvironment {
                loader: session.context().info().clone(),
                message,
            });
        } else {
            tracing::debug!("{}; directory values skipped", message);
        }
    }
}

/// Splits a comma separated root list.
fn parse_roots(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|root| !root.is_empty())
        .map(|root| {
            if root == EMPTY_ROOT {
                String::new()
            } else {
                root.to_string()
            }
        })
        .collect()
}

impl Loader for DirectoryLoader {
    fn name(&self) -> &str {
        "directory"
    }

    fn specific_load_description(&self) -> String {
        format!(
            "directory lookups under the roots in {}.STANDARD_ROOTS and {}.ADDED_ROOTS",
            DIRECTORY_GROUP, DIRECTORY_GROUP
        )
    }

    fn load(&self, ctx: &LoadContext<'_>) -> LoaderValues {
        let mut session = LoadSession::new(ctx, self);
        let Some(directory) = ctx.environment().directory() else {
            self.missing_environment(&mut session, "No directory context is available".to_string());
            return session.finish();
        };

        let registry = ctx.registry();
        let strategy = registry.naming_strategy();
        let roots = Self::roots(ctx);
        tracing::debug!("Searching the directory under roots {:?}", roots);

        for registered in registry.properties() {
            let mut hits: Vec<(String, String)> = Vec::new();
            let mut tried: Vec<String> = Vec::new();

            for in_name in registered.naming().in_names() {
                let actual = in_name.actual();
                let mut forms = vec![actual.to_string()];
                if strategy.is_uri_name_distinct(actual) {
                    forms.push(strategy.uri_name(actual));
                }

                for root in &roots {
                    for form in &forms {
                        let full = format!("{}{}", root, form);
                        if tried.contains(&full) {
                            continue;
                        }
                        match directory.lookup(&full) {
                            Ok(Some(text)) => hits.push((full.clone(), text)),
                            Ok(None) => {}
                            Err(e) => {
                                self.missing_environment(
                                    &mut session,
                                    format!("Directory lookup of '{}' failed: {}", full, e),
                                );
                                return session.finish();
                            }
                        }
                        tried.push(full);
                    }
                }
            }

            match hits.len() {
                0 => {}
                1 => {
                    let (name, text) = &hits[0];
                    session.attempt_to_add_for(registered.def(), name, Some(text.as_str()));
                }
                _ => session.add_problem(LoaderProblem::AmbiguousDirectoryValue {
                    loader: ctx.info().clone(),
                    property: registered.canonical_name().to_string(),
                    names: hits.into_iter().map(|(name, _)| name).collect(),
                }),
            }
        }
        session.finish()
    }

    fn is_missing_environment_a_problem(&self) -> bool {
        self.missing_environment_is_problem
    }

    fn class_config(&self) -> Option<Group> {
        Some(
            Group::internal(DIRECTORY_GROUP)
                .with("STANDARD_ROOTS", &*STANDARD_ROOTS)
                .with("ADDED_ROOTS", &*ADDED_ROOTS),
        )
    }
}

/// A directory backed by an in-memory map.
///
/// Useful for tests and for applications that assemble their directory
/// bindings at startup.
///
/// # Examples
///
/// ```rust
/// use hexprop::adapters::MapDirectoryContext;
/// use hexprop::ports::DirectoryContext;
///
/// let directory = MapDirectoryContext::new().with_binding("comp/env/app/PORT", "8080");
/// assert_eq!(directory.lookup("comp/env/app/PORT").unwrap(), Some("8080".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapDirectoryContext {
    bindings: BTreeMap<String, String>,
}

impl MapDirectoryContext {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a name to a value.
    pub fn with_binding(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }
}

impl DirectoryContext for MapDirectoryContext {
    fn lookup(&self, name: &str) -> Result<Option<String>> {
        Ok(self.bindings.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::CaseInsensitiveNaming;
    use crate::domain::environment::Environment;
    use crate::domain::problem::Problem;
    use crate::domain::registry::PropertyRegistry;
    use crate::domain::values::{LoaderInfo, ValuesSoFar};
    use crate::domain::ConfigError;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Broken;

    impl DirectoryContext for Broken {
        fn lookup(&self, _name: &str) -> Result<Option<String>> {
            Err(ConfigError::SourceError {
                source_name: "directory".to_string(),
                message: "connection refused".to_string(),
                source: None,
            })
        }
    }

    fn registry(port: &Property<i32>) -> PropertyRegistry {
        let loaders: Vec<Box<dyn Loader>> = vec![Box::new(DirectoryLoader::new())];
        let (registry, problems) = PropertyRegistry::build(
            vec![Group::new("app.Server").with("PORT", port)],
            &loaders,
            Arc::new(CaseInsensitiveNaming),
        );
        assert!(problems.is_empty());
        registry
    }

    fn load(loader: &DirectoryLoader, registry: &PropertyRegistry, env: &Environment) -> LoaderValues {
        let so_far = ValuesSoFar::new();
        let ctx = LoadContext::new(LoaderInfo::new(0, "directory", "test"), env, registry, &so_far);
        loader.load(&ctx)
    }

    #[test]
    fn test_parse_roots() {
        assert_eq!(parse_roots("comp/env/,\"\""), vec!["comp/env/", ""]);
        assert_eq!(parse_roots(" a/ , ,b/"), vec!["a/", "b/"]);
        assert!(parse_roots("").is_empty());
    }

    #[test]
    fn test_lookup_under_standard_root_uri_form() {
        let port: Property<i32> = Property::new();
        let registry = registry(&port);
        let directory = MapDirectoryContext::new().with_binding("comp/env/app/Server/PORT", "8080");
        let env = Environment::empty().with_directory(Arc::new(directory));

        let lv = load(&DirectoryLoader::new(), &registry, &env);
        assert!(lv.problems().is_empty());
        assert_eq!(lv.value_for(&port).map(|v| v.value()), Some(&Value::Int(8080)));
    }

    #[test]
    fn test_lookup_under_empty_root_dot_form() {
        let port: Property<i32> = Property::new();
        let registry = registry(&port);
        let directory = MapDirectoryContext::new().with_binding("app.Server.PORT", "1");
        let env = Environment::empty().with_directory(Arc::new(directory));

        let lv = load(&DirectoryLoader::new(), &registry, &env);
        assert_eq!(lv.value_for(&port).map(|v| v.value()), Some(&Value::Int(1)));
    }

    #[test]
    fn test_two_hits_are_ambiguous() {
        let port: Property<i32> = Property::new();
        let registry = registry(&port);
        let directory = MapDirectoryContext::new()
            .with_binding("comp/env/app/Server/PORT", "1")
            .with_binding("app.Server.PORT", "2");
        let env = Environment::empty().with_directory(Arc::new(directory));

        let lv = load(&DirectoryLoader::new(), &registry, &env);
        assert!(lv.values().is_empty());
        match lv.problems().iter().next() {
            Some(Problem::Loader(LoaderProblem::AmbiguousDirectoryValue { names, .. })) => {
                assert_eq!(names.len(), 2);
            }
            other => panic!("unexpected problem: {:?}", other),
        }
    }

    #[test]
    fn test_added_roots_from_earlier_loader() {
        let port: Property<i32> = Property::new();
        let registry = registry(&port);
        let directory = MapDirectoryContext::new().with_binding("custom/app/Server/PORT", "7");
        let env = Environment::empty().with_directory(Arc::new(directory));

        let mut so_far = ValuesSoFar::new();
        let def = Arc::clone(ADDED_ROOTS.def());
        so_far.merge(LoaderValues::new(
            LoaderInfo::new(0, "fixed", "test"),
            vec![crate::domain::values::PropertyValue::new(
                def,
                Value::from("custom/"),
                Default::default(),
            )],
            Default::default(),
        ));
        let ctx = LoadContext::new(LoaderInfo::new(1, "directory", "test"), &env, &registry, &so_far);
        let lv = DirectoryLoader::new().load(&ctx);
        assert_eq!(lv.value_for(&port).map(|v| v.value()), Some(&Value::Int(7)));
    }

    #[test]
    fn test_missing_directory_policy() {
        let port: Property<i32> = Property::new();
        let registry = registry(&port);
        let env = Environment::empty();

        assert!(load(&DirectoryLoader::new(), &registry, &env).problems().is_empty());

        let strict = DirectoryLoader::new().missing_environment_is_problem(true);
        assert!(matches!(
            load(&strict, &registry, &env).problems().iter().next(),
            Some(Problem::Loader(LoaderProblem::MissingEnvironment { .. }))
        ));
    }

    #[test]
    fn test_failing_directory_policy() {
        let port: Property<i32> = Property::new();
        let registry = registry(&port);
        let env = Environment::empty().with_directory(Arc::new(Broken));

        assert!(load(&DirectoryLoader::new(), &registry, &env).problems().is_empty());
        let strict = DirectoryLoader::new().missing_environment_is_problem(true);
        assert_eq!(load(&strict, &registry, &env).problems().len(), 1);
    }
}
