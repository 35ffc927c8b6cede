// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exporter trait definition.

use crate::domain::Result;

/// A destination for resolved name/value pairs, such as the process
/// environment of a legacy component.
///
/// # Examples
///
/// ```rust
/// use hexprop::domain::Result;
/// use hexprop::ports::Exporter;
/// use std::collections::BTreeMap;
///
/// #[derive(Default)]
/// struct Collect(BTreeMap<String, String>);
///
/// impl Exporter for Collect {
///     fn export(&mut self, name: &str, value: &str) -> Result<()> {
///         self.0.insert(name.to_string(), value.to_string());
///         Ok(())
///     }
/// }
///
/// let mut out = Collect::default();
/// out.export("PORT", "8080").unwrap();
/// assert_eq!(out.0.get("PORT").map(String::as_str), Some("8080"));
/// ```
pub trait Exporter {
    /// Writes one pair.
    fn export(&mut self, name: &str, value: &str) -> Result<()>;
}
