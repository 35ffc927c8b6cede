// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the property resolution crate.
//!
//! Ordinary misconfiguration never surfaces as an error while the pipeline is
//! running; it is collected as [`Problem`](crate::domain::problem::Problem)s.
//! The only error a misconfigured application sees is the single
//! [`FatalError`] raised at the end of initialization.

use crate::domain::problem::ProblemList;
use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use std::str::ParseBoolError;
use thiserror::Error;

/// The fatal aggregate raised when initialization found any problems.
///
/// The message is fixed; the payload is the complete, ordered list of
/// problems from registry construction, loading and validation.
///
/// # Examples
///
/// ```
/// use hexprop::domain::errors::FatalError;
/// use hexprop::domain::problem::{ProblemList, ValueProblem};
///
/// let mut problems = ProblemList::new();
/// problems.push(ValueProblem::UnresolvedRequiredProperty {
///     property: "app.Config.API_KEY".to_string(),
/// });
/// let fatal = FatalError::new(problems);
/// assert_eq!(fatal.to_string(), FatalError::MESSAGE);
/// assert_eq!(fatal.problems().len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FatalError {
    problems: ProblemList,
}

impl FatalError {
    /// The fixed message of every fatal error.
    pub const MESSAGE: &'static str =
        "Unable to complete configuration due to problems; see the collected problem list";

    /// Creates a fatal error carrying the given problems.
    pub fn new(problems: ProblemList) -> Self {
        Self { problems }
    }

    /// Returns the collected problems.
    pub fn problems(&self) -> &ProblemList {
        &self.problems
    }

    /// Consumes the error, returning the collected problems.
    pub fn into_problems(self) -> ProblemList {
        self.problems
    }

    /// Renders the message and every problem, one per line.
    pub fn report(&self) -> String {
        let mut out = format!("{} ({} found)", Self::MESSAGE, self.problems.len());
        for (i, problem) in self.problems.iter().enumerate() {
            out.push_str(&format!("\n  {}. {}", i + 1, problem));
        }
        out
    }

    /// Logs every problem at error level.
    pub(crate) fn log(&self) {
        tracing::error!("{} ({} found)", Self::MESSAGE, self.problems.len());
        for problem in &self.problems {
            tracing::error!("  {}", problem);
        }
    }
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::MESSAGE)
    }
}

impl std::error::Error for FatalError {}

/// The main error type for the crate.
///
/// # Examples
///
/// ```
/// use hexprop::domain::errors::ConfigError;
///
/// fn start() -> Result<(), ConfigError> {
///     Err(ConfigError::AlreadyInitialized)
/// }
/// assert!(start().is_err());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Initialization found problems; see the payload.
    #[error(transparent)]
    Fatal(#[from] FatalError),

    /// The process-wide configuration was initialized a second time.
    #[error("Configuration is already initialized; call teardown() before initializing again")]
    AlreadyInitialized,

    /// The process-wide configuration was requested before it was
    /// initialized, and no initializer is registered.
    #[error("Configuration is not initialized and no initializer is registered")]
    NotInitialized,

    /// Failed to convert a text value to the requested type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An error occurred in a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a configuration file.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ConfigError {
    /// Creates a TypeConversionError from a ParseIntError.
    pub fn from_parse_int_error(key: String, err: ParseIntError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "integer".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseFloatError.
    pub fn from_parse_float_error(key: String, err: ParseFloatError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "float".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseBoolError.
    pub fn from_parse_bool_error(key: String, err: ParseBoolError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "boolean".to_string(),
            source: Box::new(err),
        }
    }

    /// Returns the collected problems if this is a fatal error.
    pub fn problems(&self) -> Option<&ProblemList> {
        match self {
            ConfigError::Fatal(fatal) => Some(fatal.problems()),
            _ => None,
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
