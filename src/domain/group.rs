// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property groups.
//!
//! A group is the namespace a property is registered under. User code declares
//! groups through [`Group::new`]; loaders declare their own auxiliary groups
//! through [`Group::internal`].

use crate::domain::property::{Property, PropertyDef};
use std::sync::Arc;

/// A named, ordered collection of properties.
///
/// # Examples
///
/// ```rust
/// use hexprop::domain::group::Group;
/// use hexprop::domain::property::Property;
///
/// let port: Property<i32> = Property::builder().default_value(8080).build();
/// let host: Property<String> = Property::new();
///
/// let server = Group::new("org.acme.Server")
///     .with("PORT", &port)
///     .with("HOST", &host);
///
/// assert_eq!(server.properties().len(), 2);
/// assert_eq!(server.field_name_of(&port), Some("PORT"));
///
/// let tls = server.nested("Tls");
/// assert_eq!(tls.name(), "org.acme.Server.Tls");
/// assert_eq!(tls.physical_name(), "org.acme.Server$Tls");
/// ```
#[derive(Clone, Debug)]
pub struct Group {
    name: String,
    physical_name: String,
    properties: Vec<(String, Arc<PropertyDef>)>,
    user_group: bool,
}

impl Group {
    /// Creates an empty user group.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            physical_name: name.clone(),
            name,
            properties: Vec::new(),
            user_group: true,
        }
    }

    /// Creates an empty group declared by the engine or a loader.
    pub fn internal(name: impl Into<String>) -> Self {
        Self {
            user_group: false,
            ..Self::new(name)
        }
    }

    /// Creates an empty group nested inside this one.
    pub fn nested(&self, simple_name: &str) -> Self {
        Self {
            name: format!("{}.{}", self.name, simple_name),
            physical_name: format!("{}${}", self.physical_name, simple_name),
            properties: Vec::new(),
            user_group: self.user_group,
        }
    }

    /// Adds a property under the given field name, builder style.
    pub fn with<T>(mut self, field: impl Into<String>, property: &Property<T>) -> Self {
        self.add(field, property);
        self
    }

    /// Adds a property under the given field name.
    pub fn add<T>(&mut self, field: impl Into<String>, property: &Property<T>) {
        self.add_def(field, Arc::clone(property.def()));
    }

    /// Adds an untyped definition under the given field name.
    pub fn add_def(&mut self, field: impl Into<String>, def: Arc<PropertyDef>) {
        self.properties.push((field.into(), def));
    }

    /// Returns the dotted name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name with `$` separating nesting levels.
    pub fn physical_name(&self) -> &str {
        &self.physical_name
    }

    /// Returns the (field, property) pairs in declaration order.
    pub fn properties(&self) -> &[(String, Arc<PropertyDef>)] {
        &self.properties
    }

    /// Returns true for groups declared by application code.
    pub fn is_user_group(&self) -> bool {
        self.user_group
    }

    /// Returns the field a property is declared under, if it is a member.
    pub fn field_name_of(&self, property: &PropertyDef) -> Option<&str> {
        self.properties
            .iter()
            .find(|(_, def)| def.id() == property.id())
            .map(|(field, _)| field.as_str())
    }
}
