// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal architecture crate for typed, multi-source property resolution.
//!
//! Applications declare typed properties, register them in named groups and
//! hand an ordered list of loaders (command line, system properties,
//! environment variables, directory lookups, files) to a configuration
//! builder. The first loader to supply a value for a property wins; the
//! property's default applies when none does. Every value is parsed and
//! validated, and any problem makes initialization fail with the complete
//! list of problems, so a configuration is either fully valid or absent.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Properties, groups, the registry, the resolver and the
//!   problem model
//! - **Ports**: Trait definitions for the pluggable parts (`Loader`,
//!   `NamingStrategy`, `ConfigParser`, `DirectoryContext`, `Exporter`)
//! - **Adapters**: Loaders, parsers, naming strategies and exporters
//! - **Service**: The `Configuration` context object and the process-wide
//!   handle
//!
//! # Feature Flags
//!
//! - `cli`: Command line loader (default)
//! - `env`: Environment variable loader (default)
//! - `directory`: Directory lookup loader (default)
//! - `properties`: File loader and properties file parser (default)
//! - `yaml`: YAML file parser (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use hexprop::prelude::*;
//! use hexprop::domain::validator::NumberBound;
//!
//! # fn main() -> Result<()> {
//! let port: Property<i32> = Property::builder()
//!     .default_value(8080)
//!     .validator(NumberBound::greater_than(0))
//!     .alias("port")
//!     .build();
//! let verbose = Property::<bool>::flag().build();
//!
//! let config = Configuration::builder()
//!     .with_group(Group::new("app.Server").with("PORT", &port).with("VERBOSE", &verbose))
//!     .with_environment(Environment::empty())
//!     .with_cmd_line_args(vec!["--port=9000", "app.Server.VERBOSE"])
//!     .with_standard_loaders()
//!     .build()?;
//!
//! assert_eq!(config.get(&port), Some(9000));
//! assert_eq!(config.get(&verbose), Some(true));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ConfigError, ConfigurationService, Environment, ExportPolicy, FatalError, Group,
        Problem, ProblemList, Property, PropertyType, Result, Snapshot, Value, ValueType,
    };
    pub use crate::ports::{ConfigParser, DirectoryContext, Exporter, Loader, NamingStrategy};
    pub use crate::service::{Configuration, ConfigurationBuilder};

    // Re-export adapters based on feature flags
    pub use crate::adapters::{
        CaseInsensitiveNaming, CaseSensitiveNaming, EnvVarExporter, FixedValueLoader,
        SystemPropertyLoader,
    };
    #[cfg(feature = "cli")]
    pub use crate::adapters::CommandLineLoader;
    #[cfg(feature = "directory")]
    pub use crate::adapters::DirectoryLoader;
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvVarLoader;
    #[cfg(feature = "properties")]
    pub use crate::adapters::{FileLoader, PropertiesParser};
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlParser;
}
