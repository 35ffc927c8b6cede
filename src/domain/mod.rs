// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module contains the property model, the registry, the resolution
//! pipeline and the problem model. It depends on the ports layer only for the
//! traits loaders and naming strategies implement.

pub mod environment;
pub mod errors;
pub mod group;
pub mod name;
pub mod problem;
pub mod property;
pub mod registry;
pub mod resolver;
pub mod service;
pub mod snapshot;
pub mod validation;
pub mod validator;
pub mod value;
pub mod values;

// Re-export commonly used types
pub use environment::Environment;
pub use errors::{ConfigError, FatalError, Result};
pub use group::Group;
pub use problem::{ConstructionProblem, LoaderProblem, Problem, ProblemList, ValueProblem};
pub use property::{Property, PropertyDef, PropertyType};
pub use registry::PropertyRegistry;
pub use service::ConfigurationService;
pub use snapshot::{ExportPolicy, Snapshot};
pub use value::{Trimmer, Value, ValueType};
pub use values::{LoadContext, LoadSession, LoaderInfo, LoaderValues, ValuesSoFar};
