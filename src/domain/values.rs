// SPDX-License-Identifier: MIT OR Apache-2.0

//! Values produced by loaders and the running view of values resolved so far.
//!
//! A loader turns text into [`PropertyValue`]s through a [`LoadSession`],
//! which handles name lookup, trimming, parsing, duplicate detection and
//! validation. The session's result is one [`LoaderValues`], which the
//! resolver merges into [`ValuesSoFar`] with first-wins precedence.

use crate::domain::environment::Environment;
use crate::domain::problem::{LoaderProblem, Problem, ProblemList};
use crate::domain::property::{Property, PropertyDef, PropertyId, PropertyType};
use crate::domain::registry::PropertyRegistry;
use crate::domain::validation;
use crate::domain::value::{Value, ValueType};
use crate::ports::Loader;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Identity of one loader within one initialization.
///
/// # Examples
///
/// ```rust
/// use hexprop::domain::values::LoaderInfo;
///
/// let info = LoaderInfo::new(0, "cli", "command line arguments");
/// assert_eq!(info.to_string(), "cli (command line arguments)");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LoaderInfo {
    index: usize,
    name: String,
    description: String,
}

impl LoaderInfo {
    /// Creates a loader identity.
    ///
    /// # Arguments
    ///
    /// * `index` - Position of the loader in the configured order
    /// * `name` - Short loader name
    /// * `description` - Where exactly the loader reads from
    pub fn new(index: usize, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Returns the position of the loader in the configured order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the short loader name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns where exactly the loader reads from.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for LoaderInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.description)
    }
}

/// A value one loader found for one property.
#[derive(Clone, Debug)]
pub struct PropertyValue {
    property: Arc<PropertyDef>,
    value: Value,
    problems: ProblemList,
}

impl PropertyValue {
    /// Creates a value with its validation problems.
    pub fn new(property: Arc<PropertyDef>, value: Value, problems: ProblemList) -> Self {
        Self {
            property,
            value,
            problems,
        }
    }

    /// Returns the property.
    pub fn property(&self) -> &Arc<PropertyDef> {
        &self.property
    }

    /// Returns the value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the validation problems of this value.
    pub fn problems(&self) -> &ProblemList {
        &self.problems
    }

    /// Returns true if the value passed every validator.
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Everything one loader produced.
#[derive(Clone, Debug)]
pub struct LoaderValues {
    loader: LoaderInfo,
    values: Vec<PropertyValue>,
    problems: ProblemList,
}

impl LoaderValues {
    /// Creates the output of a loader.
    pub fn new(loader: LoaderInfo, values: Vec<PropertyValue>, problems: ProblemList) -> Self {
        Self {
            loader,
            values,
            problems,
        }
    }

    /// Creates an output with no values and no problems.
    pub fn empty(loader: LoaderInfo) -> Self {
        Self::new(loader, Vec::new(), ProblemList::new())
    }

    /// Returns the loader identity.
    pub fn loader(&self) -> &LoaderInfo {
        &self.loader
    }

    /// Returns the values in the order they were found.
    pub fn values(&self) -> &[PropertyValue] {
        &self.values
    }

    /// Returns the value found for a property, if any.
    pub fn value_for(&self, property: &PropertyDef) -> Option<&PropertyValue> {
        self.values
            .iter()
            .find(|v| v.property.id() == property.id())
    }

    /// Returns the loader-level problems.
    pub fn problems(&self) -> &ProblemList {
        &self.problems
    }

    /// Returns loader-level problems followed by every value's problems.
    pub fn all_problems(&self) -> ProblemList {
        let mut all = self.problems.clone();
        for value in &self.values {
            all.extend(value.problems.clone());
        }
        all
    }
}

/// The accumulated output of every loader run so far.
///
/// Earlier loaders win: the first explicit value recorded for a property is
/// its value, and anything later is kept only as a shadowed value.
#[derive(Clone, Debug, Default)]
pub struct ValuesSoFar {
    loader_values: Vec<LoaderValues>,
    winners: HashMap<PropertyId, (usize, usize)>,
}

impl ValuesSoFar {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one loader's output, returning how many values it won.
    pub fn merge(&mut self, values: LoaderValues) -> usize {
        let loader_slot = self.loader_values.len();
        let mut won = 0;
        for (value_slot, value) in values.values.iter().enumerate() {
            let id = value.property.id();
            if let std::collections::hash_map::Entry::Vacant(entry) = self.winners.entry(id) {
                entry.insert((loader_slot, value_slot));
                won += 1;
            } else {
                tracing::debug!(
                    "Value for property {} from loader {} is shadowed by an earlier loader",
                    id,
                    values.loader
                );
            }
        }
        self.loader_values.push(values);
        won
    }

    /// Returns the output of each loader merged so far, in order.
    pub fn loader_values(&self) -> &[LoaderValues] {
        &self.loader_values
    }

    /// Returns the winning value record for a property.
    pub fn explicit_property_value(&self, property: &PropertyDef) -> Option<&PropertyValue> {
        let (loader_slot, value_slot) = self.winners.get(&property.id())?;
        self.loader_values
            .get(*loader_slot)
            .and_then(|lv| lv.values.get(*value_slot))
    }

    /// Returns the value a loader supplied for a property, if any.
    pub fn explicit_value(&self, property: &PropertyDef) -> Option<&Value> {
        self.explicit_property_value(property).map(|pv| &pv.value)
    }

    /// Returns the explicit value, or else the property's default.
    pub fn value_or_default<'a>(&'a self, property: &'a PropertyDef) -> Option<&'a Value> {
        self.explicit_value(property)
            .or_else(|| property.default_value())
    }

    /// Returns the typed value or default.
    pub fn get<T: PropertyType>(&self, property: &Property<T>) -> Option<T> {
        self.value_or_default(property).and_then(T::from_value)
    }

    /// Returns true if some loader supplied a value.
    pub fn is_explicitly_set(&self, property: &PropertyDef) -> bool {
        self.winners.contains_key(&property.id())
    }

    /// Returns the loader that supplied the winning value.
    pub fn winning_loader(&self, property: &PropertyDef) -> Option<&LoaderInfo> {
        let (loader_slot, _) = self.winners.get(&property.id())?;
        self.loader_values.get(*loader_slot).map(|lv| &lv.loader)
    }

    /// Returns values later loaders supplied but lost to the winner.
    pub fn shadowed_values(&self, property: &PropertyDef) -> Vec<(&LoaderInfo, &Value)> {
        let winner = match self.winners.get(&property.id()) {
            Some((loader_slot, _)) => *loader_slot,
            None => return Vec::new(),
        };
        self.loader_values
            .iter()
            .skip(winner + 1)
            .filter_map(|lv| lv.value_for(property).map(|pv| (&lv.loader, &pv.value)))
            .collect()
    }
}

/// What a loader is given when it runs.
pub struct LoadContext<'a> {
    info: LoaderInfo,
    environment: &'a Environment,
    registry: &'a PropertyRegistry,
    values_so_far: &'a ValuesSoFar,
}

impl<'a> LoadContext<'a> {
    /// Creates a context.
    pub fn new(
        info: LoaderInfo,
        environment: &'a Environment,
        registry: &'a PropertyRegistry,
        values_so_far: &'a ValuesSoFar,
    ) -> Self {
        Self {
            info,
            environment,
            registry,
            values_so_far,
        }
    }

    /// Returns the identity of the running loader.
    pub fn info(&self) -> &LoaderInfo {
        &self.info
    }

    /// Returns the external environment.
    pub fn environment(&self) -> &'a Environment {
        self.environment
    }

    /// Returns the registry.
    pub fn registry(&self) -> &'a PropertyRegistry {
        self.registry
    }

    /// Returns values resolved by earlier loaders.
    pub fn values_so_far(&self) -> &'a ValuesSoFar {
        self.values_so_far
    }
}

/// Helper that turns a loader's raw findings into [`LoaderValues`].
///
/// The session applies the loader's policies (trimming, unknown names, flags),
/// parses text with the property's value type, rejects a second value for the
/// same property and validates every value before it is recorded.
pub struct LoadSession<'c, 'a> {
    ctx: &'c LoadContext<'a>,
    trim_strings: bool,
    unknown_is_problem: bool,
    flags_supported: bool,
    values: Vec<PropertyValue>,
    seen: HashSet<PropertyId>,
    problems: ProblemList,
}

impl<'c, 'a> LoadSession<'c, 'a> {
    /// Starts a session for a loader.
    pub fn new(ctx: &'c LoadContext<'a>, loader: &dyn Loader) -> Self {
        Self {
            ctx,
            trim_strings: loader.is_trimming_required_for_string_values(),
            unknown_is_problem: loader.is_unknown_property_a_problem(),
            flags_supported: loader.is_flag_value_supported(),
            values: Vec::new(),
            seen: HashSet::new(),
            problems: ProblemList::new(),
        }
    }

    /// Returns the context the session runs in.
    pub fn context(&self) -> &'c LoadContext<'a> {
        self.ctx
    }

    /// Looks up a name and, if it is known, adds its text value.
    ///
    /// Unknown names are a problem only if the loader says so.
    pub fn attempt_to_add(&mut self, name: &str, text: Option<&str>) {
        let registry = self.ctx.registry;
        match registry.property_for_name(name) {
            Some(def) => self.attempt_to_add_for(def, name, text),
            None if self.unknown_is_problem => self.problems.push(LoaderProblem::UnknownProperty {
                loader: self.ctx.info.clone(),
                name: name.to_string(),
            }),
            None => {
                tracing::trace!("Ignoring unknown name '{}' in {}", name, self.ctx.info);
            }
        }
    }

    /// Adds a text value for a known property.
    ///
    /// # Arguments
    ///
    /// * `property` - The property the text belongs to
    /// * `name` - The name the text was found under
    /// * `text` - The raw text; `None` means the name appeared without a value
    pub fn attempt_to_add_for(&mut self, property: &Arc<PropertyDef>, name: &str, text: Option<&str>) {
        let value_type = property.value_type();
        let prepared = if value_type != ValueType::Str || self.trim_strings {
            property.trimmer().trim(text)
        } else {
            text.map(str::to_string)
        };

        let parsed = if self.flags_supported && value_type == ValueType::Flag {
            value_type.parse_flag(name, prepared.as_deref()).map(Some)
        } else {
            value_type.parse(name, prepared.as_deref())
        };

        match parsed {
            Ok(Some(value)) => self.record(property, name, value),
            Ok(None) => {}
            Err(e) => self.problems.push(LoaderProblem::ParsingError {
                loader: self.ctx.info.clone(),
                property: self.canonical_name(property),
                text: text.unwrap_or_default().to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Adds an already typed value.
    pub fn add_value(&mut self, property: &Arc<PropertyDef>, value: Value) {
        let name = self.canonical_name(property);
        self.record(property, &name, value);
    }

    fn record(&mut self, property: &Arc<PropertyDef>, name: &str, value: Value) {
        if !self.ctx.registry.contains(property) {
            self.problems.push(LoaderProblem::UnknownProperty {
                loader: self.ctx.info.clone(),
                name: property.label(),
            });
            return;
        }

        let canonical = self.canonical_name(property);
        if !property.value_type().accepts(&value) {
            self.problems.push(LoaderProblem::ParsingError {
                loader: self.ctx.info.clone(),
                property: canonical,
                text: value.to_text(),
                message: format!("expected a {} value", property.value_type()),
            });
            return;
        }

        if !self.seen.insert(property.id()) {
            self.problems.push(LoaderProblem::DuplicateValue {
                loader: self.ctx.info.clone(),
                property: canonical,
                name: name.to_string(),
            });
            return;
        }

        let problems = validation::validate(property, &value, &self.ctx.info, &canonical);
        self.values
            .push(PropertyValue::new(Arc::clone(property), value, problems));
    }

    /// Records a loader-level problem.
    pub fn add_problem(&mut self, problem: impl Into<Problem>) {
        self.problems.push(problem);
    }

    /// Returns true if a value was already recorded for the property.
    pub fn has_value(&self, property: &PropertyDef) -> bool {
        self.seen.contains(&property.id())
    }

    /// Ends the session.
    pub fn finish(self) -> LoaderValues {
        LoaderValues::new(self.ctx.info.clone(), self.values, self.problems)
    }

    fn canonical_name(&self, property: &PropertyDef) -> String {
        self.ctx
            .registry
            .canonical_name(property)
            .map(str::to_string)
            .unwrap_or_else(|| property.label())
    }
}
