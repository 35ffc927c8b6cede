// SPDX-License-Identifier: MIT OR Apache-2.0

//! Naming strategy implementations.

use crate::ports::NamingStrategy;

/// Matches incoming names regardless of case.
///
/// Effective names are upper-cased, so `Bob`, `BOB` and `bob` are the same
/// name. This tolerates platforms whose environment variables are case-folded.
///
/// # Examples
///
/// ```rust
/// use hexprop::adapters::CaseInsensitiveNaming;
/// use hexprop::ports::NamingStrategy;
///
/// let naming = CaseInsensitiveNaming;
/// assert_eq!(naming.to_effective_name("Bob"), naming.to_effective_name("bob"));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CaseInsensitiveNaming;

impl NamingStrategy for CaseInsensitiveNaming {
    fn to_effective_name(&self, name: &str) -> String {
        name.to_uppercase()
    }

    fn description(&self) -> String {
        "Property names are matched case-insensitively".to_string()
    }
}

/// Matches incoming names exactly as declared.
#[derive(Clone, Copy, Debug, Default)]
pub struct CaseSensitiveNaming;

impl NamingStrategy for CaseSensitiveNaming {
    fn to_effective_name(&self, name: &str) -> String {
        name.to_string()
    }

    fn description(&self) -> String {
        "Property names are matched case-sensitively".to_string()
    }
}
