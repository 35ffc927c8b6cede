// SPDX-License-Identifier: MIT OR Apache-2.0

//! Problem model for configuration defects.
//!
//! Nothing in the resolution pipeline fails fast on a misconfiguration. Each
//! defect is recorded as a [`Problem`] and appended to a [`ProblemList`], and
//! the whole list is reported at the end of initialization.
//!
//! Problems fall into three families:
//!
//! - [`ConstructionProblem`]: found while building the property registry
//! - [`LoaderProblem`]: found while a loader reads its source
//! - [`ValueProblem`]: found while validating or completing resolved values

use crate::domain::values::LoaderInfo;
use std::fmt;

/// A defect found while building the property registry.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum ConstructionProblem {
    /// Two different properties resolve to the same name.
    NonUniqueNames {
        /// The conflicting name, as declared
        name: String,
        /// Canonical name of the property being registered
        property: String,
        /// Canonical name of the property that already owns the name
        conflicting_property: String,
    },

    /// The same property was registered more than once.
    DuplicateProperty {
        /// Canonical name from the first registration
        property: String,
        /// Group of the repeated registration
        group: String,
        /// Field name of the repeated registration
        field: String,
    },

    /// A canonical name or alias is empty or contains reserved characters.
    InvalidName {
        /// Canonical name of the property (or group and field if unnamed)
        property: String,
        /// The offending name
        name: String,
    },

    /// A loader requires a property that no group registers.
    LoaderPropertyNotRegistered {
        /// Name of the loader
        loader: String,
        /// Label of the unregistered property
        property: String,
    },

    /// A declared property could not be resolved within its containing group.
    SecurityException {
        /// Group being registered
        group: String,
        /// Field being registered
        field: String,
        /// Explanation
        message: String,
    },

    /// A property's default value fails one of its own validators.
    InvalidDefaultValue {
        /// Canonical name of the property
        property: String,
        /// The default value, as text
        value: String,
        /// The validator's message
        message: String,
    },

    /// More than one initializer was registered for the process-wide handle.
    TooManyInitializers {
        /// Names of all registered initializers
        names: Vec<String>,
    },
}

impl ConstructionProblem {
    /// Returns the context string of this problem.
    pub fn context(&self) -> String {
        match self {
            ConstructionProblem::NonUniqueNames { property, .. }
            | ConstructionProblem::DuplicateProperty { property, .. }
            | ConstructionProblem::InvalidName { property, .. }
            | ConstructionProblem::InvalidDefaultValue { property, .. } => {
                format!("Property {}", property)
            }
            ConstructionProblem::LoaderPropertyNotRegistered { loader, .. } => {
                format!("Loader {}", loader)
            }
            ConstructionProblem::SecurityException { group, field, .. } => {
                format!("Property {}.{}", group, field)
            }
            ConstructionProblem::TooManyInitializers { .. } => "Initialization".to_string(),
        }
    }

    /// Returns the description string of this problem.
    pub fn description(&self) -> String {
        match self {
            ConstructionProblem::NonUniqueNames {
                name,
                conflicting_property,
                ..
            } => format!(
                "The name '{}' is also used by property {}. Names and aliases must be unique",
                name, conflicting_property
            ),
            ConstructionProblem::DuplicateProperty { group, field, .. } => format!(
                "Registered a second time as {}.{}. A property may only be registered once",
                group, field
            ),
            ConstructionProblem::InvalidName { name, .. } => format!(
                "The name '{}' is empty or contains a reserved character",
                name
            ),
            ConstructionProblem::LoaderPropertyNotRegistered { property, .. } => format!(
                "Requires the property {} for its configuration, but it is not registered in any group",
                property
            ),
            ConstructionProblem::SecurityException { message, .. } => message.clone(),
            ConstructionProblem::InvalidDefaultValue { value, message, .. } => format!(
                "The default value '{}' is invalid: {}",
                value, message
            ),
            ConstructionProblem::TooManyInitializers { names } => format!(
                "Found {} initializers ({}) but at most one may be registered",
                names.len(),
                names.join(", ")
            ),
        }
    }
}

/// A defect found while a loader reads its source.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum LoaderProblem {
    /// The source names a property that is not registered.
    UnknownProperty {
        /// The loader reporting the problem
        loader: LoaderInfo,
        /// The unrecognized name
        name: String,
    },

    /// The source supplies more than one value for the same property.
    DuplicateValue {
        /// The loader reporting the problem
        loader: LoaderInfo,
        /// Canonical name of the property
        property: String,
        /// The name used for the repeated value
        name: String,
    },

    /// The source could not be read.
    IoError {
        /// The loader reporting the problem
        loader: LoaderInfo,
        /// Explanation
        message: String,
    },

    /// The source was read but its content is malformed.
    MalformedSource {
        /// The loader reporting the problem
        loader: LoaderInfo,
        /// Explanation
        message: String,
    },

    /// The external environment this loader reads from is missing or failed.
    MissingEnvironment {
        /// The loader reporting the problem
        loader: LoaderInfo,
        /// Explanation
        message: String,
    },

    /// A text value could not be converted to the property's type.
    ParsingError {
        /// The loader reporting the problem
        loader: LoaderInfo,
        /// Canonical name of the property
        property: String,
        /// The text that failed to convert
        text: String,
        /// Explanation
        message: String,
    },

    /// A directory lookup found a property under more than one name.
    AmbiguousDirectoryValue {
        /// The loader reporting the problem
        loader: LoaderInfo,
        /// Canonical name of the property
        property: String,
        /// Every full name a value was found under
        names: Vec<String>,
    },
}

impl LoaderProblem {
    /// Returns the loader that reported this problem.
    pub fn loader(&self) -> &LoaderInfo {
        match self {
            LoaderProblem::UnknownProperty { loader, .. }
            | LoaderProblem::DuplicateValue { loader, .. }
            | LoaderProblem::IoError { loader, .. }
            | LoaderProblem::MalformedSource { loader, .. }
            | LoaderProblem::MissingEnvironment { loader, .. }
            | LoaderProblem::ParsingError { loader, .. }
            | LoaderProblem::AmbiguousDirectoryValue { loader, .. } => loader,
        }
    }

    /// Returns the context string of this problem.
    pub fn context(&self) -> String {
        format!("Loader {}", self.loader())
    }

    /// Returns the description string of this problem.
    pub fn description(&self) -> String {
        match self {
            LoaderProblem::UnknownProperty { name, .. } => {
                format!("The name '{}' does not match any registered property", name)
            }
            LoaderProblem::DuplicateValue { property, name, .. } => format!(
                "Found a second value for property {} (under the name '{}')",
                property, name
            ),
            LoaderProblem::IoError { message, .. }
            | LoaderProblem::MalformedSource { message, .. }
            | LoaderProblem::MissingEnvironment { message, .. } => message.clone(),
            LoaderProblem::ParsingError {
                property,
                text,
                message,
                ..
            } => format!(
                "Unable to convert '{}' for property {}: {}",
                text, property, message
            ),
            LoaderProblem::AmbiguousDirectoryValue {
                property, names, ..
            } => format!(
                "Found values for property {} under multiple names ({})",
                property,
                names.join(", ")
            ),
        }
    }
}

/// A defect in a resolved value.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum ValueProblem {
    /// A value failed one of its property's validators.
    InvalidValue {
        /// The loader that supplied the value
        loader: LoaderInfo,
        /// Canonical name of the property
        property: String,
        /// The offending value, as text
        value: String,
        /// The rule that failed
        validator: String,
        /// The validator's message
        message: String,
    },

    /// A validator is itself mis-specified.
    InvalidValidationConfiguration {
        /// Canonical name of the property
        property: String,
        /// Explanation
        message: String,
    },

    /// A required property ended up with neither an explicit nor a default value.
    UnresolvedRequiredProperty {
        /// Canonical name of the property
        property: String,
    },
}

impl ValueProblem {
    /// Returns the context string of this problem.
    pub fn context(&self) -> String {
        match self {
            ValueProblem::InvalidValue {
                loader, property, ..
            } => format!("Property {} loaded from {}", property, loader),
            ValueProblem::InvalidValidationConfiguration { property, .. }
            | ValueProblem::UnresolvedRequiredProperty { property } => {
                format!("Property {}", property)
            }
        }
    }

    /// Returns the description string of this problem.
    pub fn description(&self) -> String {
        match self {
            ValueProblem::InvalidValue { message, .. } => message.clone(),
            ValueProblem::InvalidValidationConfiguration { message, .. } => {
                format!("The validator is misconfigured: {}", message)
            }
            ValueProblem::UnresolvedRequiredProperty { .. } => {
                "This property is required but no value was found in any loader".to_string()
            }
        }
    }
}

/// Any configuration defect.
#[derive(Clone, Debug, PartialEq)]
pub enum Problem {
    /// Registry construction problem
    Construction(ConstructionProblem),
    /// Loader problem
    Loader(LoaderProblem),
    /// Value problem
    Value(ValueProblem),
}

impl Problem {
    /// Returns where the problem was found.
    pub fn context(&self) -> String {
        match self {
            Problem::Construction(p) => p.context(),
            Problem::Loader(p) => p.context(),
            Problem::Value(p) => p.context(),
        }
    }

    /// Returns what the problem is.
    pub fn description(&self) -> String {
        match self {
            Problem::Construction(p) => p.description(),
            Problem::Loader(p) => p.description(),
            Problem::Value(p) => p.description(),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context(), self.description())
    }
}

impl From<ConstructionProblem> for Problem {
    fn from(p: ConstructionProblem) -> Self {
        Problem::Construction(p)
    }
}

impl From<LoaderProblem> for Problem {
    fn from(p: LoaderProblem) -> Self {
        Problem::Loader(p)
    }
}

impl From<ValueProblem> for Problem {
    fn from(p: ValueProblem) -> Self {
        Problem::Value(p)
    }
}

/// An append-only, ordered collection of problems.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProblemList {
    problems: Vec<Problem>,
}

impl ProblemList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a problem.
    pub fn push(&mut self, problem: impl Into<Problem>) {
        self.problems.push(problem.into());
    }

    /// Appends a problem if there is one; `None` is silently dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexprop::domain::problem::{ProblemList, ValueProblem};
    ///
    /// let mut list = ProblemList::new();
    /// list.add(None::<ValueProblem>);
    /// list.add(Some(ValueProblem::UnresolvedRequiredProperty {
    ///     property: "app.Config.API_KEY".to_string(),
    /// }));
    /// assert_eq!(list.len(), 1);
    /// ```
    pub fn add<P: Into<Problem>>(&mut self, problem: Option<P>) {
        if let Some(problem) = problem {
            self.push(problem);
        }
    }

    /// Appends every problem from another list, keeping order.
    pub fn extend(&mut self, other: ProblemList) {
        self.problems.extend(other.problems);
    }

    /// Returns true if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Returns the number of problems.
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    /// Iterates over the problems in the order they were found.
    pub fn iter(&self) -> std::slice::Iter<'_, Problem> {
        self.problems.iter()
    }

    /// Iterates over construction problems only.
    pub fn construction_problems(&self) -> impl Iterator<Item = &ConstructionProblem> {
        self.problems.iter().filter_map(|p| match p {
            Problem::Construction(c) => Some(c),
            _ => None,
        })
    }

    /// Iterates over loader problems only.
    pub fn loader_problems(&self) -> impl Iterator<Item = &LoaderProblem> {
        self.problems.iter().filter_map(|p| match p {
            Problem::Loader(l) => Some(l),
            _ => None,
        })
    }

    /// Iterates over value problems only.
    pub fn value_problems(&self) -> impl Iterator<Item = &ValueProblem> {
        self.problems.iter().filter_map(|p| match p {
            Problem::Value(v) => Some(v),
            _ => None,
        })
    }
}

impl IntoIterator for ProblemList {
    type Item = Problem;
    type IntoIter = std::vec::IntoIter<Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.problems.into_iter()
    }
}

impl<'a> IntoIterator for &'a ProblemList {
    type Item = &'a Problem;
    type IntoIter = std::slice::Iter<'a, Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.problems.iter()
    }
}

impl<P: Into<Problem>> FromIterator<P> for ProblemList {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            problems: iter.into_iter().map(Into::into).collect(),
        }
    }
}
