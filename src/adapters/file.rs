// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file loader.
//!
//! This module provides a loader that reads property values from a file,
//! using a [`ConfigParser`] to turn the file content into name/text pairs.

use crate::adapters::PropertiesParser;
use crate::domain::problem::LoaderProblem;
use crate::domain::property::{Property, PropertyDef};
use crate::domain::value::Value;
use crate::domain::values::{LoadContext, LoadSession, LoaderValues};
use crate::domain::{ConfigError, Result};
use crate::ports::{ConfigParser, Loader};
use directories::ProjectDirs;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maximum allowed file size for configuration files (10MB)
/// This prevents denial of service attacks via extremely large files
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Where the loader finds its file.
#[derive(Debug, Clone)]
enum FileLocation {
    /// A fixed path
    Path(PathBuf),
    /// A path read from a property resolved by an earlier loader
    FromProperty(Arc<PropertyDef>),
}

/// Loader for configuration files.
///
/// The file is read once per initialization. A file that does not exist is
/// not a problem unless [`missing_file_is_problem`](Self::missing_file_is_problem)
/// is set; a file that exists but cannot be read or parsed always is. Names
/// in the file that match no property are a problem unless
/// [`ignore_unknown`](Self::ignore_unknown) is set.
///
/// The format is chosen from the file extension (`.yaml` and `.yml` when the
/// `yaml` feature is enabled, the properties format otherwise) and can be
/// overridden with [`with_parser`](Self::with_parser).
///
/// # Examples
///
/// ```rust,no_run
/// use hexprop::adapters::FileLoader;
/// use hexprop::domain::property::Property;
///
/// // Load from a specific file
/// let loader = FileLoader::from_path("/etc/myapp/app.properties");
///
/// // Load from the path held by a property
/// let path: Property<String> = Property::builder()
///     .default_value("/etc/myapp/app.properties".to_string())
///     .build();
/// let loader = FileLoader::from_property(&path);
///
/// // Load from the default OS location
/// let loader = FileLoader::from_default_location("myapp", "com.example", "app.properties").unwrap();
/// ```
pub struct FileLoader {
    location: FileLocation,
    /// Explicit parser; `None` picks one from the file extension
    parser: Option<Box<dyn ConfigParser>>,
    missing_file_is_problem: bool,
    ignore_unknown: bool,
}

impl FileLoader {
    fn with_location(location: FileLocation) -> Self {
        Self {
            location,
            parser: None,
            missing_file_is_problem: false,
            ignore_unknown: false,
        }
    }

    /// Creates a loader for a specific file path.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::with_location(FileLocation::Path(path.as_ref().to_path_buf()))
    }

    /// Creates a loader reading the path from a string property.
    ///
    /// The property must be registered in some group and gets its value from
    /// a loader earlier in the list, or from its default. With no value, there
    /// is no file to read.
    pub fn from_property(property: &Property<String>) -> Self {
        Self::with_location(FileLocation::FromProperty(Arc::clone(property.def())))
    }

    /// Creates a loader for a file in the OS-appropriate configuration directory.
    ///
    /// This method uses the `directories` crate to determine the appropriate
    /// configuration directory for the current operating system.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    /// * `filename` - The configuration file name (e.g., "app.properties")
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::SourceError` if no home directory can be found.
    pub fn from_default_location(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
                source_name: "file".to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Ok(Self::from_path(proj_dirs.config_dir().join(filename)))
    }

    /// Replaces the parser chosen for the file.
    pub fn with_parser(mut self, parser: Box<dyn ConfigParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Sets whether a file that does not exist is a problem.
    pub fn missing_file_is_problem(mut self, enabled: bool) -> Self {
        self.missing_file_is_problem = enabled;
        self
    }

    /// Sets whether names that match no property are silently skipped.
    pub fn ignore_unknown(mut self, enabled: bool) -> Self {
        self.ignore_unknown = enabled;
        self
    }

    /// Returns the file path, if it is fixed.
    pub fn file_path(&self) -> Option<&Path> {
        match &self.location {
            FileLocation::Path(path) => Some(path.as_path()),
            FileLocation::FromProperty(_) => None,
        }
    }

    fn resolve_path(&self, ctx: &LoadContext<'_>) -> Option<PathBuf> {
        match &self.location {
            FileLocation::Path(path) => Some(path.clone()),
            FileLocation::FromProperty(def) => match ctx.values_so_far().value_or_default(def) {
                Some(Value::Str(path)) if !path.trim().is_empty() => Some(PathBuf::from(path.trim())),
                _ => None,
            },
        }
    }

    fn missing(&self, session: &mut LoadSession<'_, '_>, message: String) {
        if self.missing_file_is_problem {
            session.add_problem(LoaderProblem::MissingEnvironment {
                loader: session.context().info().clone(),
                message,
            });
        } else {
            tracing::debug!("{}; file values skipped", message);
        }
    }

    /// Reads the file, enforcing the size limit.
    fn read(path: &Path) -> std::io::Result<String> {
        // Check file size before reading to prevent DoS via large files
        let metadata = fs::metadata(path)?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(std::io::Error::new(
                ErrorKind::InvalidData,
                format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_FILE_SIZE
                ),
            ));
        }
        fs::read_to_string(path)
    }
}

/// Picks a parser from the file extension.
fn parser_for_path(path: &Path) -> Box<dyn ConfigParser> {
    #[cfg(feature = "yaml")]
    {
        let yaml = crate::adapters::YamlParser::new();
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| yaml.supported_extensions().contains(&ext))
            .unwrap_or(false);
        if is_yaml {
            return Box::new(yaml);
        }
    }
    #[cfg(not(feature = "yaml"))]
    let _ = path;
    Box::new(PropertiesParser::new())
}

impl fmt::Debug for FileLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLoader")
            .field("location", &self.location)
            .field(
                "extensions",
                &self.parser.as_ref().map(|p| p.supported_extensions()),
            )
            .field("missing_file_is_problem", &self.missing_file_is_problem)
            .field("ignore_unknown", &self.ignore_unknown)
            .finish()
    }
}

impl Loader for FileLoader {
    fn name(&self) -> &str {
        "file"
    }

    fn specific_load_description(&self) -> String {
        match &self.location {
            FileLocation::Path(path) => format!("file at {}", path.display()),
            FileLocation::FromProperty(def) => format!("file at the path in {}", def.label()),
        }
    }

    fn load(&self, ctx: &LoadContext<'_>) -> LoaderValues {
        let mut session = LoadSession::new(ctx, self);

        let Some(path) = self.resolve_path(ctx) else {
            self.missing(&mut session, "No configuration file path is set".to_string());
            return session.finish();
        };

        let content = match Self::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.missing(
                    &mut session,
                    format!("Configuration file {} does not exist", path.display()),
                );
                return session.finish();
            }
            Err(e) => {
                session.add_problem(LoaderProblem::IoError {
                    loader: ctx.info().clone(),
                    message: format!("Failed to read {}: {}", path.display(), e),
                });
                return session.finish();
            }
        };

        let chosen;
        let parser: &dyn ConfigParser = match &self.parser {
            Some(parser) => parser.as_ref(),
            None => {
                chosen = parser_for_path(&path);
                chosen.as_ref()
            }
        };

        let entries = match parser.parse(&content) {
            Ok(entries) => entries,
            Err(e) => {
                session.add_problem(LoaderProblem::MalformedSource {
                    loader: ctx.info().clone(),
                    message: format!("{} is malformed: {}", path.display(), e),
                });
                return session.finish();
            }
        };

        tracing::debug!("Read {} entries from {}", entries.len(), path.display());
        for (name, text) in &entries {
            session.attempt_to_add(name, Some(text.as_str()));
        }
        session.finish()
    }

    fn is_unknown_property_a_problem(&self) -> bool {
        !self.ignore_unknown
    }

    fn is_missing_environment_a_problem(&self) -> bool {
        self.missing_file_is_problem
    }

    fn instance_config(&self) -> Vec<Arc<PropertyDef>> {
        match &self.location {
            FileLocation::FromProperty(def) => vec![Arc::clone(def)],
            FileLocation::Path(_) => Vec::new(),
        }
    }
}
