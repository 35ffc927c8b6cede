// SPDX-License-Identifier: MIT OR Apache-2.0

//! The resolved, read-only configuration.

use crate::domain::property::{PropertyDef, PropertyId};
use crate::domain::registry::PropertyRegistry;
use crate::domain::service::ConfigurationService;
use crate::domain::value::Value;
use crate::domain::values::{LoaderInfo, ValuesSoFar};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Which names to use when exporting values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportPolicy {
    /// Only the canonical name
    #[default]
    CanonicalOnly,
    /// Only out-aliases
    AliasesOnly,
    /// The canonical name and every out-alias
    CanonicalAndAliases,
}

/// The final value of every registered property, with provenance.
///
/// A snapshot is immutable and can be shared freely between threads.
#[derive(Debug)]
pub struct Snapshot {
    registry: Arc<PropertyRegistry>,
    values: ValuesSoFar,
    resolved: HashMap<PropertyId, Value>,
}

impl Snapshot {
    pub(crate) fn new(registry: Arc<PropertyRegistry>, values: ValuesSoFar) -> Self {
        let resolved = registry
            .properties()
            .iter()
            .filter_map(|r| {
                values
                    .value_or_default(r.def())
                    .map(|v| (r.def().id(), v.clone()))
            })
            .collect();
        Self {
            registry,
            values,
            resolved,
        }
    }

    /// Returns the registry the snapshot was resolved against.
    pub fn registry(&self) -> &Arc<PropertyRegistry> {
        &self.registry
    }

    /// Returns the loader that supplied the value, if any did.
    pub fn source_of(&self, property: &PropertyDef) -> Option<&LoaderInfo> {
        self.values.winning_loader(property)
    }

    /// Returns the values later loaders supplied but lost.
    pub fn shadowed_values(&self, property: &PropertyDef) -> Vec<(&LoaderInfo, &Value)> {
        self.values.shadowed_values(property)
    }

    /// Returns the output of every loader, in order.
    pub fn loader_values(&self) -> &ValuesSoFar {
        &self.values
    }

    /// Returns name/value text pairs for every property with a value.
    ///
    /// Properties are visited in registration order.
    pub fn export_pairs(&self, policy: ExportPolicy) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for registered in self.registry.properties() {
            let value = match self.resolved.get(&registered.def().id()) {
                Some(value) => value,
                None => continue,
            };
            let text = registered.def().value_type().to_text(value);
            let naming = registered.naming();

            if policy != ExportPolicy::AliasesOnly {
                pairs.push((naming.canonical().actual().to_string(), text.clone()));
            }
            if policy != ExportPolicy::CanonicalOnly {
                for alias in naming.aliases().iter().filter(|a| a.is_out()) {
                    pairs.push((alias.actual().to_string(), text.clone()));
                }
            }
        }
        pairs
    }
}

impl ConfigurationService for Snapshot {
    fn value<'a>(&'a self, property: &'a PropertyDef) -> Option<&'a Value> {
        self.resolved.get(&property.id())
    }

    fn explicit_value(&self, property: &PropertyDef) -> Option<&Value> {
        self.values.explicit_value(property)
    }
}
