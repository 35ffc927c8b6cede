// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the configuration context and its process-wide
//! handle.
//!
//! This module wires the registry, the resolver and the loaders together into
//! a [`Configuration`] that implements the `ConfigurationService` trait.

pub mod configuration;
pub mod global;

// Re-export commonly used types
pub use configuration::{Configuration, ConfigurationBuilder};
