// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory service trait definition.

use crate::domain::Result;
use std::fmt;

/// A read-only, name based directory service.
///
/// # Examples
///
/// ```rust
/// use hexprop::domain::Result;
/// use hexprop::ports::DirectoryContext;
///
/// #[derive(Debug)]
/// struct Empty;
///
/// impl DirectoryContext for Empty {
///     fn lookup(&self, _name: &str) -> Result<Option<String>> {
///         Ok(None)
///     }
/// }
///
/// assert_eq!(Empty.lookup("comp/env/app/Server/PORT").unwrap(), None);
/// ```
pub trait DirectoryContext: fmt::Debug + Send + Sync {
    /// Looks up a name.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(text))` - The name is bound
    /// * `Ok(None)` - The name is not bound
    /// * `Err(ConfigError)` - The directory could not be queried
    fn lookup(&self, name: &str) -> Result<Option<String>>;
}
