// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test utilities and mock implementations.

#![allow(dead_code)]

use hexprop::domain::problem::LoaderProblem;
use hexprop::domain::values::{LoadContext, LoadSession, LoaderValues};
use hexprop::ports::Loader;
use std::io::Write;
use tempfile::NamedTempFile;

/// A mock loader for testing.
///
/// This allows tests to easily create a loader with predefined name/text
/// pairs and policies.
#[derive(Debug, Clone)]
pub struct MockLoader {
    name: String,
    values: Vec<(String, Option<String>)>,
    unknown_is_problem: bool,
    flags_supported: bool,
    failure: Option<String>,
}

impl MockLoader {
    /// Creates a new mock loader with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            unknown_is_problem: true,
            flags_supported: true,
            failure: None,
        }
    }

    /// Adds a name/text pair.
    pub fn with_value(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.values.push((name.into(), Some(text.into())));
        self
    }

    /// Adds a name without text, as a flag would appear.
    pub fn with_flag(mut self, name: impl Into<String>) -> Self {
        self.values.push((name.into(), None));
        self
    }

    /// Sets whether unknown names are a problem.
    pub fn strict(mut self, enabled: bool) -> Self {
        self.unknown_is_problem = enabled;
        self
    }

    /// Makes the loader report an I/O problem after its values.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }
}

impl Loader for MockLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn specific_load_description(&self) -> String {
        format!("{} mock values", self.values.len())
    }

    fn load(&self, ctx: &LoadContext<'_>) -> LoaderValues {
        let mut session = LoadSession::new(ctx, self);
        for (name, text) in &self.values {
            session.attempt_to_add(name, text.as_deref());
        }
        if let Some(message) = &self.failure {
            session.add_problem(LoaderProblem::IoError {
                loader: ctx.info().clone(),
                message: message.clone(),
            });
        }
        session.finish()
    }

    fn is_unknown_property_a_problem(&self) -> bool {
        self.unknown_is_problem
    }

    fn is_flag_value_supported(&self) -> bool {
        self.flags_supported
    }
}

/// Creates a temporary file with the given suffix and content.
///
/// Returns a NamedTempFile that will be automatically deleted when dropped.
pub fn create_temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}
