// SPDX-License-Identifier: MIT OR Apache-2.0

//! System property loader.
//!
//! System properties are process-level name/value pairs set by the embedding
//! application (for example from a launcher script) and carried in the
//! [`Environment`](crate::domain::Environment).

use crate::domain::values::{LoadContext, LoadSession, LoaderValues};
use crate::ports::Loader;

/// Loader for system properties.
///
/// String values are taken verbatim, without trimming, since they are set
/// programmatically rather than typed by hand. Names that match no property
/// are ignored.
///
/// # Examples
///
/// ```rust
/// use hexprop::adapters::SystemPropertyLoader;
/// use hexprop::ports::Loader;
///
/// let loader = SystemPropertyLoader::new();
/// assert_eq!(loader.name(), "sysprop");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPropertyLoader;

impl SystemPropertyLoader {
    /// Creates a new system property loader.
    pub fn new() -> Self {
        Self
    }
}

impl Loader for SystemPropertyLoader {
    fn name(&self) -> &str {
        "sysprop"
    }

    fn specific_load_description(&self) -> String {
        "system properties".to_string()
    }

    fn load(&self, ctx: &LoadContext<'_>) -> LoaderValues {
        let mut session = LoadSession::new(ctx, self);
        for (name, value) in ctx.environment().system_properties() {
            session.attempt_to_add(name, Some(value.as_str()));
        }
        session.finish()
    }

    fn is_trimming_required_for_string_values(&self) -> bool {
        false
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
    use crate::domain::property::Property;
    use crate::domain::registry::PropertyRegistry;
    use crate::domain::value::Value;
    use crate::domain::values::{LoaderInfo, ValuesSoFar};
    use std::sync::Arc;

    #[test]
    fn test_sysprop_keeps_string_whitespace() {
        let banner: Property<String> = Property::new();
        let port: Property<i32> = Property::new();
        let verbose = Property::<bool>::flag().build();
        let group = Group::new("app")
            .with("BANNER", &banner)
            .with("PORT", &port)
            .with("VERBOSE", &verbose);
        let (registry, _) =
            PropertyRegistry::build(vec![group], &[], Arc::new(CaseInsensitiveNaming));
        let env = Environment::empty()
            .with_system_property("app.BANNER", "  hello  ")
            .with_system_property("app.PORT", " 42 ")
            .with_system_property("app.VERBOSE", "")
            .with_system_property("runtime.version", "1.80");

        let so_far = ValuesSoFar::new();
        let ctx = LoadContext::new(LoaderInfo::new(0, "sysprop", "test"), &env, &registry, &so_far);
        let lv = SystemPropertyLoader::new().load(&ctx);

        assert!(lv.problems().is_empty());
        assert_eq!(
            lv.value_for(&banner).map(|v| v.value()),
            Some(&Value::from("  hello  "))
        );
        assert_eq!(lv.value_for(&port).map(|v| v.value()), Some(&Value::Int(42)));
        assert_eq!(lv.value_for(&verbose).map(|v| v.value()), Some(&Value::Bool(true)));
    }
}
