// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration service trait definition.
//!
//! This module defines the `ConfigurationService` trait, the read interface
//! application code uses to query resolved property values.

use crate::domain::property::{Property, PropertyDef, PropertyType};
use crate::domain::value::Value;

/// The read interface of a resolved configuration.
///
/// # Examples
///
/// ```rust
/// use hexprop::domain::property::{Property, PropertyDef};
/// use hexprop::domain::service::ConfigurationService;
/// use hexprop::domain::value::Value;
///
/// struct Defaults;
///
/// impl ConfigurationService for Defaults {
///     fn value<'a>(&'a self, property: &'a PropertyDef) -> Option<&'a Value> {
///         property.default_value()
///     }
///
///     fn explicit_value(&self, _property: &PropertyDef) -> Option<&Value> {
///         None
///     }
/// }
///
/// let count: Property<i32> = Property::builder().default_value(3).build();
/// assert_eq!(Defaults.get(&count), Some(3));
/// assert!(!Defaults.is_explicitly_set(&count));
/// ```
pub trait ConfigurationService {
    /// Returns the effective value: the explicit value if any loader supplied
    /// one, else the default.
    fn value<'a>(&'a self, property: &'a PropertyDef) -> Option<&'a Value>;

    /// Returns the value a loader supplied, ignoring the default.
    fn explicit_value(&self, property: &PropertyDef) -> Option<&Value>;

    /// Returns true if a loader supplied a value.
    fn is_explicitly_set(&self, property: &PropertyDef) -> bool {
        self.explicit_value(property).is_some()
    }

    /// Returns the effective value converted to `T`.
    fn get<T: PropertyType>(&self, property: &Property<T>) -> Option<T>
    where
        Self: Sized,
    {
        self.value(property).and_then(T::from_value)
    }
}
