// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loader trait definition.
//!
//! A loader reads one physical source (command line, environment, a file, a
//! directory service) and reports the values it found for registered
//! properties. Loaders never fail: every defect they find is returned as a
//! problem inside their [`LoaderValues`].

use crate::domain::group::Group;
use crate::domain::property::PropertyDef;
use crate::domain::values::{LoadContext, LoaderValues};
use std::sync::Arc;

/// A trait for implementing value sources.
///
/// Loaders are invoked once per initialization, in configured order. The first
/// loader to supply a value for a property wins.
///
/// # Examples
///
/// ```rust
/// use hexprop::domain::values::{LoadContext, LoadSession, LoaderValues};
/// use hexprop::ports::Loader;
///
/// struct OneValue;
///
/// impl Loader for OneValue {
///     fn name(&self) -> &str {
///         "one-value"
///     }
///
///     fn specific_load_description(&self) -> String {
///         "a single hard coded value".to_string()
///     }
///
///     fn load(&self, ctx: &LoadContext<'_>) -> LoaderValues {
///         let mut session = LoadSession::new(ctx, self);
///         session.attempt_to_add("app.Server.PORT", Some("8080"));
///         session.finish()
///     }
/// }
/// ```
pub trait Loader: Send + Sync {
    /// Returns a short name identifying this loader.
    fn name(&self) -> &str;

    /// Describes exactly where this loader reads from, e.g.
    /// "file at /etc/app.properties".
    fn specific_load_description(&self) -> String;

    /// Reads the source and returns the values found.
    ///
    /// Must only report values for properties it actually found.
    fn load(&self, ctx: &LoadContext<'_>) -> LoaderValues;

    /// Returns true if string values must be trimmed before parsing.
    fn is_trimming_required_for_string_values(&self) -> bool {
        true
    }

    /// Returns true if a name that matches no property is a problem.
    fn is_unknown_property_a_problem(&self) -> bool {
        true
    }

    /// Returns true if the mere presence of a flag name sets it to true.
    fn is_flag_value_supported(&self) -> bool {
        false
    }

    /// Returns true if an absent or failed external source is a problem.
    fn is_missing_environment_a_problem(&self) -> bool {
        false
    }

    /// Returns properties this loader instance needs; each must be
    /// registered by some group.
    fn instance_config(&self) -> Vec<Arc<PropertyDef>> {
        Vec::new()
    }

    /// Returns the auxiliary group this kind of loader needs, if any.
    /// It is registered automatically.
    fn class_config(&self) -> Option<Group> {
        None
    }
}
