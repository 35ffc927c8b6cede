// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration context object.
//!
//! A [`Configuration`] owns everything one resolution needs: the groups to
//! register, the loaders in precedence order, the naming strategy and the
//! external environment. Building it runs the whole pipeline and either
//! yields a complete snapshot or fails with every problem found.

use crate::adapters::{CaseInsensitiveNaming, FixedValueLoader, SystemPropertyLoader};
use crate::domain::environment::Environment;
use crate::domain::errors::{ConfigError, FatalError, Result};
use crate::domain::group::Group;
use crate::domain::property::{Property, PropertyDef, PropertyType};
use crate::domain::registry::PropertyRegistry;
use crate::domain::resolver;
use crate::domain::service::ConfigurationService;
use crate::domain::snapshot::{ExportPolicy, Snapshot};
use crate::domain::value::Value;
use crate::ports::{Exporter, Loader, NamingStrategy};
use std::fmt;
use std::sync::Arc;

/// A resolved configuration.
///
/// # Examples
///
/// ```rust
/// use hexprop::prelude::*;
///
/// # fn main() -> Result<()> {
/// let port: Property<i32> = Property::builder().default_value(8080).build();
/// let host: Property<String> = Property::builder().required().build();
///
/// let config = Configuration::builder()
///     .with_group(Group::new("app.Server").with("PORT", &port).with("HOST", &host))
///     .with_cmd_line_args(vec!["app.Server.HOST=example.org"])
///     .with_standard_loaders()
///     .build()?;
///
/// assert_eq!(config.get(&port), Some(8080));
/// assert_eq!(config.get(&host), Some("example.org".to_string()));
/// # Ok(())
/// # }
/// ```
pub struct Configuration {
    groups: Vec<Group>,
    loaders: Vec<Box<dyn Loader>>,
    naming: Arc<dyn NamingStrategy>,
    environment: Environment,
    snapshot: Arc<Snapshot>,
}

impl Configuration {
    /// Creates a new configuration builder.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Creates a configuration with the standard loaders and a properties
    /// file from the default OS-appropriate location.
    ///
    /// If no home directory can be determined, the file is skipped. A file
    /// that does not exist is not a problem. The process command line is not
    /// read; use [`builder`](Self::builder) with
    /// [`with_cmd_line_args`](ConfigurationBuilder::with_cmd_line_args) for
    /// that.
    ///
    /// # Arguments
    ///
    /// * `groups` - The groups to register
    /// * `app_name` - The application name
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    #[cfg(feature = "properties")]
    pub fn with_defaults(groups: Vec<Group>, app_name: &str, qualifier: &str) -> Result<Self> {
        use crate::adapters::FileLoader;

        let mut builder = Self::builder().with_groups(groups).with_standard_loaders();
        match FileLoader::from_default_location(app_name, qualifier, "application.properties") {
            Ok(loader) => builder = builder.with_loader(Box::new(loader)),
            Err(e) => tracing::warn!("Skipping the default properties file: {}", e),
        }
        builder.build()
    }

    /// Runs the pipeline once.
    fn resolve(
        groups: &[Group],
        loaders: &[Box<dyn Loader>],
        naming: &Arc<dyn NamingStrategy>,
        environment: &Environment,
    ) -> Result<Snapshot> {
        tracing::debug!("Building the property registry ({})", naming.description());
        let (registry, construction_problems) =
            PropertyRegistry::build(groups.to_vec(), loaders, Arc::clone(naming));

        let result = if construction_problems.is_empty() {
            let registry = Arc::new(registry);
            resolver::resolve(&registry, loaders, environment)
                .into_snapshot(registry, construction_problems)
        } else {
            Err(FatalError::new(construction_problems).into())
        };

        match result {
            Ok(snapshot) => {
                tracing::info!(
                    "Configuration resolved: {} properties from {} loaders",
                    snapshot.registry().len(),
                    loaders.len()
                );
                Ok(snapshot)
            }
            Err(ConfigError::Fatal(fatal)) => {
                fatal.log();
                Err(ConfigError::Fatal(fatal))
            }
            Err(e) => Err(e),
        }
    }

    /// Rebuilds the registry and snapshot from the same inputs.
    ///
    /// On failure the previous snapshot stays in place.
    pub fn reinitialize(&mut self) -> Result<()> {
        let snapshot = Self::resolve(&self.groups, &self.loaders, &self.naming, &self.environment)?;
        self.snapshot = Arc::new(snapshot);
        Ok(())
    }

    /// Replaces the environment and rebuilds.
    ///
    /// On failure the previous environment and snapshot stay in place.
    pub fn reinitialize_with(&mut self, environment: Environment) -> Result<()> {
        let snapshot = Self::resolve(&self.groups, &self.loaders, &self.naming, &environment)?;
        self.environment = environment;
        self.snapshot = Arc::new(snapshot);
        Ok(())
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Returns the registry the current snapshot was built from.
    pub fn registry(&self) -> &Arc<PropertyRegistry> {
        self.snapshot.registry()
    }

    /// Returns the environment the loaders read.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Returns the loader names, in precedence order.
    pub fn loader_names(&self) -> Vec<&str> {
        self.loaders.iter().map(|l| l.name()).collect()
    }

    /// Writes every resolved value to an exporter.
    ///
    /// # Returns
    ///
    /// The number of pairs written.
    pub fn export(&self, policy: ExportPolicy, exporter: &mut dyn Exporter) -> Result<usize> {
        let pairs = self.snapshot.export_pairs(policy);
        for (name, value) in &pairs {
            exporter.export(name, value)?;
        }
        tracing::debug!("Exported {} values ({:?})", pairs.len(), policy);
        Ok(pairs.len())
    }
}

impl ConfigurationService for Configuration {
    fn value<'a>(&'a self, property: &'a PropertyDef) -> Option<&'a Value> {
        self.snapshot.value(property)
    }

    fn explicit_value(&self, property: &PropertyDef) -> Option<&Value> {
        self.snapshot.explicit_value(property)
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("groups", &self.groups.iter().map(Group::name).collect::<Vec<_>>())
            .field("loaders", &self.loader_names())
            .field("naming", &self.naming)
            .field("snapshot", &self.snapshot)
            .finish()
    }
}

/// Builder for constructing a [`Configuration`].
///
/// Loaders run in the order they are added, except that values fixed with
/// [`with_fixed_value`](Self::with_fixed_value) always come first.
///
/// # Examples
///
/// ```rust
/// use hexprop::prelude::*;
///
/// # fn main() -> Result<()> {
/// let count: Property<i32> = Property::builder().default_value(3).build();
/// let config = ConfigurationBuilder::new()
///     .with_group(Group::new("app.Config").with("COUNT", &count))
///     .with_environment(Environment::empty())
///     .with_fixed_value(&count, 10)
///     .build()?;
/// assert_eq!(config.get(&count), Some(10));
/// # Ok(())
/// # }
/// ```
pub struct ConfigurationBuilder {
    groups: Vec<Group>,
    fixed: FixedValueLoader,
    loaders: Vec<Box<dyn Loader>>,
    naming: Arc<dyn NamingStrategy>,
    environment: Option<Environment>,
}

impl ConfigurationBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            fixed: FixedValueLoader::new(),
            loaders: Vec::new(),
            naming: Arc::new(CaseInsensitiveNaming),
            environment: None,
        }
    }

    /// Adds a group of properties.
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Adds groups of properties.
    pub fn with_groups(mut self, groups: impl IntoIterator<Item = Group>) -> Self {
        self.groups.extend(groups);
        self
    }

    /// Adds a loader after the ones already added.
    pub fn with_loader(mut self, loader: Box<dyn Loader>) -> Self {
        self.loaders.push(loader);
        self
    }

    /// Replaces the naming strategy. The default matches names
    /// case-insensitively.
    pub fn with_naming_strategy(mut self, naming: impl NamingStrategy + 'static) -> Self {
        self.naming = Arc::new(naming);
        self
    }

    /// Sets the environment loaders read. Without one, the environment of
    /// the current process is captured at build time.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Replaces the command line arguments in the environment.
    pub fn with_cmd_line_args<S: AsRef<str>>(mut self, args: Vec<S>) -> Self {
        let environment = self.environment.take().unwrap_or_else(Environment::from_process);
        self.environment = Some(
            environment.with_cmd_line_args(args.iter().map(|a| a.as_ref().to_string())),
        );
        self
    }

    /// Fixes the value of a property, ahead of every loader.
    pub fn with_fixed_value<T: PropertyType>(mut self, property: &Property<T>, value: T) -> Self {
        self.fixed = self.fixed.with_value(property, value);
        self
    }

    /// Fixes the text value of a name, ahead of every loader.
    pub fn with_fixed_named_value(
        mut self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.fixed = self.fixed.with_named_value(name, text);
        self
    }

    /// Adds the standard loaders in their usual precedence: command line,
    /// system properties, environment variables, then directory lookups.
    ///
    /// Loaders for disabled features are left out.
    pub fn with_standard_loaders(mut self) -> Self {
        #[cfg(feature = "cli")]
        {
            self = self.with_loader(Box::new(crate::adapters::CommandLineLoader::new()));
        }
        self = self.with_loader(Box::new(SystemPropertyLoader::new()));
        #[cfg(feature = "env")]
        {
            self = self.with_loader(Box::new(crate::adapters::EnvVarLoader::new()));
        }
        #[cfg(feature = "directory")]
        {
            self = self.with_loader(Box::new(crate::adapters::DirectoryLoader::new()));
        }
        self
    }

    /// Adds a file loader for a specific path.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use hexprop::service::ConfigurationBuilder;
    ///
    /// # fn main() -> hexprop::domain::Result<()> {
    /// let config = ConfigurationBuilder::new()
    ///     .with_standard_loaders()
    ///     .with_properties_file("/etc/myapp/app.properties")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[cfg(feature = "properties")]
    pub fn with_properties_file(self, path: impl AsRef<std::path::Path>) -> Self {
        self.with_loader(Box::new(crate::adapters::FileLoader::from_path(path)))
    }

    /// Adds a file loader reading its path from a property.
    ///
    /// The property must be registered in one of the groups.
    #[cfg(feature = "properties")]
    pub fn with_properties_file_from(self, property: &Property<String>) -> Self {
        self.with_loader(Box::new(crate::adapters::FileLoader::from_property(property)))
    }

    /// Builds and resolves the configuration.
    ///
    /// Without an explicit environment the process environment variables are
    /// read; command line arguments are only seen if passed with
    /// [`with_cmd_line_args`](Self::with_cmd_line_args).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Fatal` with every problem found if any property
    /// cannot be registered, loaded or validated.
    pub fn build(self) -> Result<Configuration> {
        let mut loaders: Vec<Box<dyn Loader>> = Vec::with_capacity(self.loaders.len() + 1);
        if !self.fixed.is_empty() {
            loaders.push(Box::new(self.fixed));
        }
        loaders.extend(self.loaders);

        let environment = self.environment.unwrap_or_else(Environment::from_process);
        let snapshot = Configuration::resolve(&self.groups, &loaders, &self.naming, &environment)?;

        Ok(Configuration {
            groups: self.groups,
            loaders,
            naming: self.naming,
            environment,
            snapshot: Arc::new(snapshot),
        })
    }
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
