// SPDX-License-Identifier: MIT OR Apache-2.0

//! The property registry.
//!
//! The registry is the closed universe of properties known to one
//! initialization. It is built once from the declared groups plus the
//! auxiliary groups of the configured loaders, and is read-only afterwards.
//! Building never fails: every defect is returned as a problem and the
//! offending property or name is left out.

use crate::domain::group::Group;
use crate::domain::name::PropertyNaming;
use crate::domain::problem::{ConstructionProblem, ProblemList, ValueProblem};
use crate::domain::property::{PropertyDef, PropertyId};
use crate::ports::{Loader, NamingStrategy};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// One registered property.
#[derive(Clone, Debug)]
pub struct RegisteredProperty {
    def: Arc<PropertyDef>,
    group: usize,
    field: String,
    naming: PropertyNaming,
}

impl RegisteredProperty {
    /// Returns the property definition.
    pub fn def(&self) -> &Arc<PropertyDef> {
        &self.def
    }

    /// Returns the field name within the group.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the canonical name and aliases.
    pub fn naming(&self) -> &PropertyNaming {
        &self.naming
    }

    /// Returns the canonical name.
    pub fn canonical_name(&self) -> &str {
        self.naming.canonical().actual()
    }
}

/// Immutable mapping from properties to their groups and names.
///
/// # Examples
///
/// ```rust
/// use hexprop::adapters::CaseInsensitiveNaming;
/// use hexprop::domain::group::Group;
/// use hexprop::domain::property::Property;
/// use hexprop::domain::registry::PropertyRegistry;
/// use std::sync::Arc;
///
/// let port: Property<i32> = Property::builder().alias("port").build();
/// let group = Group::new("org.acme.Server").with("PORT", &port);
///
/// let (registry, problems) =
///     PropertyRegistry::build(vec![group], &[], Arc::new(CaseInsensitiveNaming));
/// assert!(problems.is_empty());
/// assert_eq!(registry.canonical_name(&port), Some("org.acme.Server.PORT"));
/// assert!(registry.property_for_name("PORT").is_some());
/// assert!(registry.property_for_name("org.acme.server.port").is_some());
/// ```
pub struct PropertyRegistry {
    naming: Arc<dyn NamingStrategy>,
    groups: Vec<Group>,
    properties: Vec<RegisteredProperty>,
    by_id: HashMap<PropertyId, usize>,
    by_in_name: HashMap<String, usize>,
    by_out_name: HashMap<String, usize>,
}

impl PropertyRegistry {
    /// Builds a registry.
    ///
    /// # Arguments
    ///
    /// * `groups` - The user groups, in registration order
    /// * `loaders` - The configured loaders; their auxiliary groups are
    ///   registered and their per-instance properties checked
    /// * `naming` - The naming strategy
    ///
    /// # Returns
    ///
    /// The registry and every problem found while building it.
    pub fn build(
        groups: Vec<Group>,
        loaders: &[Box<dyn Loader>],
        naming: Arc<dyn NamingStrategy>,
    ) -> (Self, ProblemList) {
        tracing::debug!(
            "Building property registry from {} groups and {} loaders. {}",
            groups.len(),
            loaders.len(),
            naming.description()
        );

        let mut registry = Self {
            naming,
            groups: Vec::new(),
            properties: Vec::new(),
            by_id: HashMap::new(),
            by_in_name: HashMap::new(),
            by_out_name: HashMap::new(),
        };
        let mut problems = ProblemList::new();

        for group in groups {
            registry.register_group(group, &mut problems);
        }

        for loader in loaders {
            if let Some(group) = loader.class_config() {
                if registry.groups.iter().all(|g| g.name() != group.name()) {
                    registry.register_group(group, &mut problems);
                }
            }
        }

        for loader in loaders {
            for def in loader.instance_config() {
                if !registry.contains(&def) {
                    problems.push(ConstructionProblem::LoaderPropertyNotRegistered {
                        loader: loader.name().to_string(),
                        property: def.label(),
                    });
                }
            }
        }

        tracing::debug!(
            "Registered {} properties with {} problems",
            registry.properties.len(),
            problems.len()
        );
        (registry, problems)
    }

    fn register_group(&mut self, group: Group, problems: &mut ProblemList) {
        let group_index = self.groups.len();

        for (field, def) in group.properties() {
            if let Some(&existing) = self.by_id.get(&def.id()) {
                problems.push(ConstructionProblem::DuplicateProperty {
                    property: self.properties[existing].canonical_name().to_string(),
                    group: group.name().to_string(),
                    field: field.clone(),
                });
                continue;
            }

            let naming = match self.naming.build_names(def, &group) {
                Some(naming) => naming,
                None => {
                    problems.push(ConstructionProblem::SecurityException {
                        group: group.name().to_string(),
                        field: field.clone(),
                        message: "Unable to resolve the property within its declaring group"
                            .to_string(),
                    });
                    continue;
                }
            };
            let canonical = naming.canonical().actual().to_string();

            let mut legal = true;
            for name in naming.all().filter(|n| !n.is_legal()) {
                problems.push(ConstructionProblem::InvalidName {
                    property: canonical.clone(),
                    name: name.actual().to_string(),
                });
                legal = false;
            }
            if !legal {
                continue;
            }

            self.check_validators(def, &canonical, problems);

            let slot = self.properties.len();
            let mut reported = HashSet::new();
            for name in naming.all() {
                let in_owner = name
                    .is_in()
                    .then(|| self.by_in_name.get(name.effective()).copied())
                    .flatten()
                    .filter(|&owner| owner != slot);
                let out_owner = name
                    .is_out()
                    .then(|| self.by_out_name.get(name.actual()).copied())
                    .flatten()
                    .filter(|&owner| owner != slot);

                if let Some(owner) = in_owner.or(out_owner) {
                    if reported.insert(name.actual().to_string()) {
                        problems.push(ConstructionProblem::NonUniqueNames {
                            name: name.actual().to_string(),
                            property: canonical.clone(),
                            conflicting_property: self.properties[owner]
                                .canonical_name()
                                .to_string(),
                        });
                    }
                }
                if name.is_in() && in_owner.is_none() {
                    self.by_in_name.insert(name.effective().to_string(), slot);
                }
                if name.is_out() && out_owner.is_none() {
                    self.by_out_name.insert(name.actual().to_string(), slot);
                }
            }

            tracing::trace!("Registered property {}", canonical);
            self.by_id.insert(def.id(), slot);
            self.properties.push(RegisteredProperty {
                def: Arc::clone(def),
                group: group_index,
                field: field.clone(),
                naming,
            });
        }

        self.groups.push(group);
    }

    fn check_validators(&self, def: &PropertyDef, canonical: &str, problems: &mut ProblemList) {
        for validator in def.validators() {
            if !validator.is_specification_valid() {
                problems.push(ValueProblem::InvalidValidationConfiguration {
                    property: canonical.to_string(),
                    message: validator.invalid_specification_message(),
                });
                continue;
            }
            if !validator.supports(def.value_type()) {
                problems.push(ValueProblem::InvalidValidationConfiguration {
                    property: canonical.to_string(),
                    message: format!(
                        "The rule '{}' cannot be applied to {} values",
                        validator.describe(),
                        def.value_type()
                    ),
                });
                continue;
            }
            if let Some(default) = def.default_value() {
                if !validator.is_valid(default) {
                    problems.push(ConstructionProblem::InvalidDefaultValue {
                        property: canonical.to_string(),
                        value: default.to_text(),
                        message: validator.invalid_message(default),
                    });
                }
            }
        }
    }

    /// Returns the naming strategy.
    pub fn naming_strategy(&self) -> &Arc<dyn NamingStrategy> {
        &self.naming
    }

    /// Returns every registered group, user groups first.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Returns every registered property, in registration order.
    pub fn properties(&self) -> &[RegisteredProperty] {
        &self.properties
    }

    /// Returns the number of registered properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Returns true if the property is registered.
    pub fn contains(&self, property: &PropertyDef) -> bool {
        self.by_id.contains_key(&property.id())
    }

    /// Returns the registration of a property.
    pub fn get(&self, property: &PropertyDef) -> Option<&RegisteredProperty> {
        self.by_id
            .get(&property.id())
            .map(|&slot| &self.properties[slot])
    }

    /// Returns the canonical name and aliases of a property.
    pub fn naming_of(&self, property: &PropertyDef) -> Option<&PropertyNaming> {
        self.get(property).map(|r| &r.naming)
    }

    /// Returns the canonical name of a property.
    pub fn canonical_name(&self, property: &PropertyDef) -> Option<&str> {
        self.get(property).map(|r| r.canonical_name())
    }

    /// Returns the group a property is registered in.
    pub fn group_of(&self, property: &PropertyDef) -> Option<&Group> {
        self.get(property).map(|r| &self.groups[r.group])
    }

    /// Finds the property an incoming name refers to.
    ///
    /// The naming strategy's transform is applied to the name first.
    pub fn property_for_name(&self, name: &str) -> Option<&Arc<PropertyDef>> {
        let effective = self.naming.to_effective_name(name);
        self.by_in_name
            .get(&effective)
            .map(|&slot| &self.properties[slot].def)
    }

    /// Finds the property an export name belongs to.
    pub fn property_for_out_name(&self, name: &str) -> Option<&Arc<PropertyDef>> {
        self.by_out_name
            .get(name)
            .map(|&slot| &self.properties[slot].def)
    }
}

impl fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyRegistry")
            .field("naming", &self.naming)
            .field("groups", &self.groups.len())
            .field("properties", &self.properties.len())
            .finish()
    }
}
