// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed value loader.
//!
//! This module provides a loader holding values set in code, mostly used by
//! tests and by applications that compute some values at startup.

use crate::domain::property::{Property, PropertyDef, PropertyType};
use crate::domain::value::Value;
use crate::domain::values::{LoadContext, LoadSession, LoaderValues};
use crate::ports::Loader;
use std::sync::Arc;

/// Loader for values set in code.
///
/// Values can be attached to a property directly, or to a name that is
/// looked up in the registry like any other source.
///
/// # Examples
///
/// ```rust
/// use hexprop::adapters::FixedValueLoader;
/// use hexprop::domain::property::Property;
///
/// let port: Property<i32> = Property::new();
/// let loader = FixedValueLoader::new()
///     .with_value(&port, 8080)
///     .with_named_value("app.Server.HOST", "localhost");
/// ```
#[derive(Debug, Default)]
pub struct FixedValueLoader {
    values: Vec<(Arc<PropertyDef>, Value)>,
    named_values: Vec<(String, String)>,
}

impl FixedValueLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of a property.
    pub fn with_value<T: PropertyType>(mut self, property: &Property<T>, value: T) -> Self {
        self.values
            .push((Arc::clone(property.def()), value.into_value()));
        self
    }

    /// Sets the text value of a name.
    pub fn with_named_value(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.named_values.push((name.into(), text.into()));
        self
    }

    /// Returns true if no value is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.named_values.is_empty()
    }
}

impl Loader for FixedValueLoader {
    fn name(&self) -> &str {
        "fixed"
    }

    fn specific_load_description(&self) -> String {
        format!("{} values fixed in code", self.values.len() + self.named_values.len())
    }

    fn load(&self, ctx: &LoadContext<'_>) -> LoaderValues {
        let mut session = LoadSession::new(ctx, self);
        for (def, value) in &self.values {
            session.add_value(def, value.clone());
        }
        for (name, text) in &self.named_values {
            session.attempt_to_add(name, Some(text.as_str()));
        }
        session.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::CaseInsensitiveNaming;
    use crate::domain::environment::Environment;
    use crate::domain::group::Group;
    use crate::domain::problem::{LoaderProblem, Problem};
    use crate::domain::registry::PropertyRegistry;
    use crate::domain::values::{LoaderInfo, ValuesSoFar};

    fn load(loader: &FixedValueLoader, groups: Vec<Group>) -> LoaderValues {
        let (registry, _) = PropertyRegistry::build(groups, &[], Arc::new(CaseInsensitiveNaming));
        let env = Environment::empty();
        let so_far = ValuesSoFar::new();
        let ctx = LoadContext::new(LoaderInfo::new(0, loader.name(), "test"), &env, &registry, &so_far);
        loader.load(&ctx)
    }

    #[test]
    fn test_typed_and_named_values() {
        let port: Property<i32> = Property::new();
        let host: Property<String> = Property::new();
        let loader = FixedValueLoader::new()
            .with_value(&port, 8080)
            .with_named_value("APP.SERVER.HOST", "localhost");
        let lv = load(
            &loader,
            vec![Group::new("app.Server").with("PORT", &port).with("HOST", &host)],
        );
        assert!(lv.problems().is_empty());
        assert_eq!(lv.value_for(&port).map(|v| v.value()), Some(&Value::Int(8080)));
        assert_eq!(
            lv.value_for(&host).map(|v| v.value()),
            Some(&Value::from("localhost"))
        );
    }

    #[test]
    fn test_unregistered_property_is_a_problem() {
        let stray: Property<i32> = Property::new();
        let loader = FixedValueLoader::new().with_value(&stray, 1);
        let lv = load(&loader, Vec::new());
        assert!(lv.values().is_empty());
        assert!(matches!(
            lv.problems().iter().next(),
            Some(Problem::Loader(LoaderProblem::UnknownProperty { .. }))
        ));
    }

    #[test]
    fn test_is_empty() {
        assert!(FixedValueLoader::new().is_empty());
        assert!(!FixedValueLoader::new().with_named_value("a", "b").is_empty());
    }
}
