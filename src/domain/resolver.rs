// SPDX-License-Identifier: MIT OR Apache-2.0

//! The loader pipeline.
//!
//! Loaders run one at a time, in configured order, each seeing the values
//! resolved by the loaders before it. Their outputs are merged first-wins and
//! every problem they report is collected; a problem never stops the loaders
//! that follow.

use crate::domain::environment::Environment;
use crate::domain::errors::{FatalError, Result};
use crate::domain::problem::{ProblemList, ValueProblem};
use crate::domain::registry::PropertyRegistry;
use crate::domain::snapshot::Snapshot;
use crate::domain::values::{LoadContext, LoaderInfo, ValuesSoFar};
use crate::ports::Loader;
use std::sync::Arc;

/// The outcome of one resolution pass.
#[derive(Debug)]
pub struct Resolution {
    values: ValuesSoFar,
    problems: ProblemList,
}

impl Resolution {
    /// Returns the merged loader output.
    pub fn values(&self) -> &ValuesSoFar {
        &self.values
    }

    /// Returns every problem found while loading.
    pub fn problems(&self) -> &ProblemList {
        &self.problems
    }

    /// Returns true if no problem was found.
    pub fn is_success(&self) -> bool {
        self.problems.is_empty()
    }

    /// Turns the resolution into a snapshot.
    ///
    /// Fails with the fatal aggregate if any problem was found; no partial
    /// snapshot is ever produced.
    ///
    /// # Arguments
    ///
    /// * `registry` - The registry the resolution ran against
    /// * `earlier_problems` - Problems from earlier stages, reported first
    pub fn into_snapshot(
        self,
        registry: Arc<PropertyRegistry>,
        earlier_problems: ProblemList,
    ) -> Result<Snapshot> {
        let mut problems = earlier_problems;
        problems.extend(self.problems);
        if !problems.is_empty() {
            return Err(FatalError::new(problems).into());
        }
        Ok(Snapshot::new(registry, self.values))
    }
}

/// Runs every loader and merges their values.
///
/// # Arguments
///
/// * `registry` - The built registry
/// * `loaders` - The loaders, in precedence order
/// * `environment` - The external environment handed to each loader
///
/// # Examples
///
/// ```rust
/// use hexprop::adapters::{CaseInsensitiveNaming, FixedValueLoader};
/// use hexprop::domain::environment::Environment;
/// use hexprop::domain::group::Group;
/// use hexprop::domain::property::Property;
/// use hexprop::domain::registry::PropertyRegistry;
/// use hexprop::domain::resolver::resolve;
/// use hexprop::ports::Loader;
/// use std::sync::Arc;
///
/// let count: Property<i32> = Property::builder().default_value(3).build();
/// let group = Group::new("app.Config").with("COUNT", &count);
/// let loaders: Vec<Box<dyn Loader>> =
///     vec![Box::new(FixedValueLoader::new().with_value(&count, 10))];
///
/// let (registry, problems) =
///     PropertyRegistry::build(vec![group], &loaders, Arc::new(CaseInsensitiveNaming));
/// assert!(problems.is_empty());
///
/// let resolution = resolve(&registry, &loaders, &Environment::empty());
/// assert!(resolution.is_success());
/// assert_eq!(resolution.values().get(&count), Some(10));
/// ```
pub fn resolve(
    registry: &PropertyRegistry,
    loaders: &[Box<dyn Loader>],
    environment: &Environment,
) -> Resolution {
    let mut values = ValuesSoFar::new();
    let mut problems = ProblemList::new();

    for (index, loader) in loaders.iter().enumerate() {
        let info = LoaderInfo::new(index, loader.name(), loader.specific_load_description());
        tracing::debug!("Loading values from {}", info);

        let loaded = {
            let ctx = LoadContext::new(info, environment, registry, &values);
            loader.load(&ctx)
        };

        let found = loaded.values().len();
        problems.extend(loaded.all_problems());
        let won = values.merge(loaded);
        tracing::debug!(
            "Loader {} found {} values, {} not already set by an earlier loader",
            loader.name(),
            found,
            won
        );
    }

    for registered in registry.properties() {
        let def = registered.def();
        if def.is_required() && values.value_or_default(def).is_none() {
            problems.push(ValueProblem::UnresolvedRequiredProperty {
                property: registered.canonical_name().to_string(),
            });
        }
    }

    Resolution { values, problems }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{CaseInsensitiveNaming, FixedValueLoader};
    use crate::domain::group::Group;
    use crate::domain::problem::Problem;
    use crate::domain::property::Property;

    fn registry(groups: Vec<Group>, loaders: &[Box<dyn Loader>]) -> PropertyRegistry {
        let (registry, problems) =
            PropertyRegistry::build(groups, loaders, Arc::new(CaseInsensitiveNaming));
        assert!(problems.is_empty(), "{:?}", problems);
        registry
    }

    #[test]
    fn test_no_loaders_uses_defaults() {
        let count: Property<i32> = Property::builder().default_value(3).build();
        let reg = registry(vec![Group::new("a.B").with("COUNT", &count)], &[]);
        let resolution = resolve(&reg, &[], &Environment::empty());
        assert!(resolution.is_success());
        assert_eq!(resolution.values().get(&count), Some(3));
        assert!(!resolution.values().is_explicitly_set(&count));
    }

    #[test]
    fn test_first_loader_wins() {
        let count: Property<i32> = Property::new();
        let loaders: Vec<Box<dyn Loader>> = vec![
            Box::new(FixedValueLoader::new().with_value(&count, 1)),
            Box::new(FixedValueLoader::new().with_value(&count, 2)),
        ];
        let reg = registry(vec![Group::new("a.B").with("COUNT", &count)], &loaders);
        let resolution = resolve(&reg, &loaders, &Environment::empty());
        assert_eq!(resolution.values().get(&count), Some(1));
        assert_eq!(resolution.values().shadowed_values(&count).len(), 1);
    }

    #[test]
    fn test_required_without_value() {
        let key: Property<String> = Property::builder().required().build();
        let with_default: Property<String> = Property::builder()
            .required()
            .default_value("x".to_string())
            .build();
        let reg = registry(
            vec![Group::new("a.B").with("API_KEY", &key).with("OTHER", &with_default)],
            &[],
        );
        let resolution = resolve(&reg, &[], &Environment::empty());
        assert_eq!(resolution.problems().len(), 1);
        assert!(matches!(
            resolution.problems().iter().next(),
            Some(Problem::Value(ValueProblem::UnresolvedRequiredProperty { property }))
                if property == "a.B.API_KEY"
        ));
    }

    #[test]
    fn test_into_snapshot_is_atomic() {
        let key: Property<String> = Property::builder().required().build();
        let reg = Arc::new(registry(vec![Group::new("a.B").with("API_KEY", &key)], &[]));
        let resolution = resolve(&reg, &[], &Environment::empty());
        let err = resolution
            .into_snapshot(Arc::clone(&reg), ProblemList::new())
            .unwrap_err();
        assert_eq!(err.problems().map(|p| p.len()), Some(1));
    }

    #[test]
    fn test_earlier_problems_come_first() {
        let count: Property<i32> = Property::builder().default_value(3).build();
        let reg = Arc::new(registry(vec![Group::new("a.B").with("COUNT", &count)], &[]));
        let resolution = resolve(&reg, &[], &Environment::empty());
        let mut earlier = ProblemList::new();
        earlier.push(ValueProblem::InvalidValidationConfiguration {
            property: "a.B.COUNT".to_string(),
            message: "bad".to_string(),
        });
        let err = resolution.into_snapshot(reg, earlier).unwrap_err();
        assert_eq!(err.problems().map(|p| p.len()), Some(1));
    }
}
