// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing loader, parser and naming implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer. Each loader implements the `Loader` trait to provide values
//! from a specific source.

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "directory")]
pub mod directory;
pub mod env_exporter;
#[cfg(feature = "env")]
pub mod env_var;
#[cfg(feature = "properties")]
pub mod file;
pub mod fixed_value;
pub mod naming;
#[cfg(feature = "properties")]
pub mod properties;
pub mod sys_prop;
#[cfg(feature = "yaml")]
pub mod yaml;

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::CommandLineLoader;
#[cfg(feature = "directory")]
pub use directory::{DirectoryLoader, MapDirectoryContext};
pub use env_exporter::EnvVarExporter;
#[cfg(feature = "env")]
pub use env_var::EnvVarLoader;
#[cfg(feature = "properties")]
pub use file::FileLoader;
pub use fixed_value::FixedValueLoader;
pub use naming::{CaseInsensitiveNaming, CaseSensitiveNaming};
#[cfg(feature = "properties")]
pub use properties::PropertiesParser;
pub use sys_prop::SystemPropertyLoader;
#[cfg(feature = "yaml")]
pub use yaml::YamlParser;
