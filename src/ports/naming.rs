// SPDX-License-Identifier: MIT OR Apache-2.0

//! Naming strategy trait definition.
//!
//! A naming strategy turns a property's position (its group and field) into a
//! canonical name plus aliases, and decides how incoming names are matched.

use crate::domain::group::Group;
use crate::domain::name::{EffectiveName, PropertyNaming};
use crate::domain::property::PropertyDef;
use std::fmt;

/// A trait for deriving and matching property names.
///
/// Only [`to_effective_name`](NamingStrategy::to_effective_name) and
/// [`description`](NamingStrategy::description) must be provided; the other
/// methods have the standard behavior.
///
/// # Examples
///
/// ```rust
/// use hexprop::ports::NamingStrategy;
///
/// #[derive(Debug)]
/// struct LowerCase;
///
/// impl NamingStrategy for LowerCase {
///     fn to_effective_name(&self, name: &str) -> String {
///         name.to_lowercase()
///     }
///
///     fn description(&self) -> String {
///         "names are matched in lower case".to_string()
///     }
/// }
///
/// assert_eq!(LowerCase.to_effective_name("Bob"), "bob");
/// assert_eq!(LowerCase.uri_name("a.B.c"), "a/B/c");
/// ```
pub trait NamingStrategy: fmt::Debug + Send + Sync {
    /// Transforms a name into the form used for matching incoming names.
    fn to_effective_name(&self, name: &str) -> String;

    /// Describes the matching rules, for logs and diagnostics.
    fn description(&self) -> String;

    /// Builds the canonical name and aliases of a property.
    ///
    /// Returns `None` if the property is not a member of the group.
    ///
    /// # Arguments
    ///
    /// * `property` - The property to name
    /// * `group` - The group the property is registered in
    fn build_names(&self, property: &PropertyDef, group: &Group) -> Option<PropertyNaming> {
        let field = group.field_name_of(property)?;
        let canonical = format!("{}.{}", group.name(), field);
        let effective = self.to_effective_name(&canonical);
        let mut naming = PropertyNaming::new(EffectiveName::new(canonical, effective, true, true));

        for request in property.aliases() {
            naming.add_alias(EffectiveName::new(
                request.name(),
                self.to_effective_name(request.name()),
                request.is_in(),
                request.is_out(),
            ));
        }
        Some(naming)
    }

    /// Returns true if the URI form of a dotted name differs from it.
    fn is_uri_name_distinct(&self, name: &str) -> bool {
        name.contains('.')
    }

    /// Returns the slash-delimited form of a dotted name.
    fn uri_name(&self, name: &str) -> String {
        name.replace('.', "/")
    }
}
