// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property names, effective names and alias coalescing.
//!
//! Every name has an *actual* form (as declared) and an *effective* form (after
//! the naming strategy's transform, e.g. upper-cased). Incoming names are
//! matched on the effective form; exported names use the actual form.

use std::fmt;

/// Characters that may not appear in any property name or alias.
pub const ILLEGAL_NAME_CHARS: &[char] = &[
    ' ', '\t', '\n', '\r', '\x0c', '\0', '\\', '"', '\'', '`', '=', ':', '#', '!', '<', '>', ';',
    '(', ')', '[', ']', '{', '}',
];

/// Returns true if the name is non-empty and free of [`ILLEGAL_NAME_CHARS`].
///
/// # Examples
///
/// ```
/// use hexprop::domain::name::is_legal_name;
///
/// assert!(is_legal_name("org.acme.Server.PORT"));
/// assert!(!is_legal_name("has space"));
/// assert!(!is_legal_name(""));
/// ```
pub fn is_legal_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(ILLEGAL_NAME_CHARS)
}

/// An alias as requested on a property declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AliasRequest {
    name: String,
    is_in: bool,
    is_out: bool,
}

impl AliasRequest {
    /// Creates an alias request.
    pub fn new(name: impl Into<String>, is_in: bool, is_out: bool) -> Self {
        Self {
            name: name.into(),
            is_in,
            is_out,
        }
    }

    /// Returns the requested name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the alias is used to read values.
    pub fn is_in(&self) -> bool {
        self.is_in
    }

    /// Returns true if the alias is used to export values.
    pub fn is_out(&self) -> bool {
        self.is_out
    }
}

/// A name in both its actual and effective forms.
///
/// # Examples
///
/// ```
/// use hexprop::domain::name::EffectiveName;
///
/// let name = EffectiveName::new("app.Config.PORT", "APP.CONFIG.PORT", true, true);
/// assert_eq!(name.actual(), "app.Config.PORT");
/// assert_eq!(name.effective(), "APP.CONFIG.PORT");
/// assert!(name.is_legal());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EffectiveName {
    actual: String,
    effective: String,
    is_in: bool,
    is_out: bool,
}

impl EffectiveName {
    /// Creates a name.
    pub fn new(
        actual: impl Into<String>,
        effective: impl Into<String>,
        is_in: bool,
        is_out: bool,
    ) -> Self {
        Self {
            actual: actual.into(),
            effective: effective.into(),
            is_in,
            is_out,
        }
    }

    /// Returns the name as declared.
    pub fn actual(&self) -> &str {
        &self.actual
    }

    /// Returns the name as matched.
    pub fn effective(&self) -> &str {
        &self.effective
    }

    /// Returns true if the name is used to read values.
    pub fn is_in(&self) -> bool {
        self.is_in
    }

    /// Returns true if the name is used to export values.
    pub fn is_out(&self) -> bool {
        self.is_out
    }

    /// Returns true if both forms are legal names.
    pub fn is_legal(&self) -> bool {
        is_legal_name(&self.actual) && is_legal_name(&self.effective)
    }
}

impl fmt::Display for EffectiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.actual)
    }
}

/// The canonical name and aliases of one property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyNaming {
    canonical: EffectiveName,
    aliases: Vec<EffectiveName>,
}

impl PropertyNaming {
    /// Creates a naming with no aliases.
    pub fn new(canonical: EffectiveName) -> Self {
        Self {
            canonical,
            aliases: Vec::new(),
        }
    }

    /// Returns the canonical name.
    pub fn canonical(&self) -> &EffectiveName {
        &self.canonical
    }

    /// Returns the aliases, in request order.
    pub fn aliases(&self) -> &[EffectiveName] {
        &self.aliases
    }

    /// Iterates over the canonical name followed by every alias.
    pub fn all(&self) -> impl Iterator<Item = &EffectiveName> {
        std::iter::once(&self.canonical).chain(self.aliases.iter())
    }

    /// Iterates over names usable for reading values.
    pub fn in_names(&self) -> impl Iterator<Item = &EffectiveName> {
        self.all().filter(|n| n.is_in)
    }

    /// Iterates over names usable for exporting values.
    pub fn out_names(&self) -> impl Iterator<Item = &EffectiveName> {
        self.all().filter(|n| n.is_out)
    }

    /// Adds an alias, coalescing it with the canonical name and earlier aliases.
    ///
    /// - An in-alias whose effective form equals the canonical effective form
    ///   loses its in flag; an out-alias spelled like the canonical name loses
    ///   its out flag.
    /// - An alias spelled exactly like an earlier one merges into it.
    /// - An in+out alias whose effective form equals an in-only alias replaces
    ///   it as a single in+out alias.
    /// - An in-alias whose effective form is already readable keeps only its
    ///   out flag, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexprop::domain::name::{EffectiveName, PropertyNaming};
    ///
    /// let mut naming = PropertyNaming::new(EffectiveName::new("a.B.C", "A.B.C", true, true));
    /// naming.add_alias(EffectiveName::new("bob", "BOB", true, false));
    /// naming.add_alias(EffectiveName::new("Bob", "BOB", true, true));
    /// assert_eq!(naming.aliases().len(), 1);
    /// assert_eq!(naming.aliases()[0].actual(), "Bob");
    /// assert!(naming.aliases()[0].is_in() && naming.aliases()[0].is_out());
    /// ```
    pub fn add_alias(&mut self, mut alias: EffectiveName) {
        if alias.is_in && alias.effective == self.canonical.effective {
            alias.is_in = false;
        }
        if alias.is_out && alias.actual == self.canonical.actual {
            alias.is_out = false;
        }
        if !alias.is_in && !alias.is_out {
            return;
        }

        if alias.is_in {
            let readable_elsewhere = self
                .aliases
                .iter()
                .any(|a| a.is_in && a.effective == alias.effective && a.actual != alias.actual);
            if readable_elsewhere && self.aliases.iter().any(|a| a.actual == alias.actual) {
                alias.is_in = false;
            }
        }

        if let Some(existing) = self.aliases.iter_mut().find(|a| a.actual == alias.actual) {
            existing.is_in |= alias.is_in;
            existing.is_out |= alias.is_out;
            return;
        }

        if alias.is_in {
            if let Some(existing) = self
                .aliases
                .iter_mut()
                .find(|a| a.is_in && a.effective == alias.effective)
            {
                if !existing.is_out && alias.is_out {
                    *existing = alias;
                    return;
                }
                alias.is_in = false;
                if !alias.is_out {
                    return;
                }
            }
        }

        self.aliases.push(alias);
    }
}
