// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! for the pluggable parts of the engine. These traits are implemented by
//! adapters in the adapters layer.

pub mod directory;
pub mod exporter;
pub mod loader;
pub mod naming;
pub mod parser;

// Re-export commonly used types
pub use directory::DirectoryContext;
pub use exporter::Exporter;
pub use loader::Loader;
pub use naming::NamingStrategy;
pub use parser::ConfigParser;
