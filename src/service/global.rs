// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide configuration handle.
//!
//! Applications either [`initialize`] the handle explicitly at startup, or
//! [`register_initializer`] a function that builds the configuration the
//! first time [`instance`] is called. [`teardown`] resets the handle so tests
//! can initialize it again.
//!
//! # Examples
//!
//! ```rust
//! use hexprop::prelude::*;
//! use hexprop::service::global;
//!
//! # fn main() -> Result<()> {
//! let port: Property<i32> = Property::builder().default_value(8080).build();
//! let config = Configuration::builder()
//!     .with_group(Group::new("app.Server").with("PORT", &port))
//!     .with_environment(Environment::empty())
//!     .build()?;
//!
//! global::initialize(config)?;
//! assert_eq!(global::instance()?.get(&port), Some(8080));
//! global::teardown();
//! # Ok(())
//! # }
//! ```

use crate::domain::errors::{ConfigError, FatalError, Result};
use crate::domain::problem::{ConstructionProblem, ProblemList};
use crate::service::configuration::Configuration;
use once_cell::sync::Lazy;
use std::cell::Cell;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// A function building the process-wide configuration.
pub type Initializer = fn() -> Result<Configuration>;

static INSTANCE: Lazy<RwLock<Option<Arc<Configuration>>>> = Lazy::new(|| RwLock::new(None));

static INITIALIZERS: Lazy<Mutex<Vec<(String, Initializer)>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Serializes initializer runs.
static INIT_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

thread_local! {
    static IN_INITIALIZER: Cell<bool> = Cell::new(false);
}

/// Registers a function that builds the configuration on first use.
///
/// At most one initializer may be registered when [`instance`] first runs.
pub fn register_initializer(name: impl Into<String>, initializer: Initializer) {
    let name = name.into();
    tracing::debug!("Registering configuration initializer '{}'", name);
    INITIALIZERS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push((name, initializer));
}

/// Removes every registered initializer.
pub fn clear_initializers() {
    INITIALIZERS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}

/// Installs a configuration as the process-wide one.
///
/// # Errors
///
/// Returns `ConfigError::AlreadyInitialized` if a configuration is already
/// installed.
pub fn initialize(configuration: Configuration) -> Result<Arc<Configuration>> {
    let mut slot = INSTANCE.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Err(ConfigError::AlreadyInitialized);
    }
    let configuration = Arc::new(configuration);
    *slot = Some(Arc::clone(&configuration));
    tracing::info!("Process-wide configuration initialized");
    Ok(configuration)
}

/// Returns the process-wide configuration, building it with the registered
/// initializer if needed.
///
/// # Errors
///
/// - `ConfigError::NotInitialized` if nothing is installed and no initializer
///   is registered, or if called from inside the running initializer
/// - `ConfigError::Fatal` with a `TooManyInitializers` problem if more than
///   one initializer is registered
/// - whatever the initializer returns
pub fn instance() -> Result<Arc<Configuration>> {
    if let Some(configuration) = installed() {
        return Ok(configuration);
    }
    if IN_INITIALIZER.with(Cell::get) {
        return Err(ConfigError::NotInitialized);
    }

    let _running = INIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(configuration) = installed() {
        return Ok(configuration);
    }

    let initializers = INITIALIZERS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    let initializer = match initializers.as_slice() {
        [] => return Err(ConfigError::NotInitialized),
        [(name, initializer)] => {
            tracing::debug!("Running configuration initializer '{}'", name);
            *initializer
        }
        _ => {
            let mut problems = ProblemList::new();
            problems.push(ConstructionProblem::TooManyInitializers {
                names: initializers.into_iter().map(|(name, _)| name).collect(),
            });
            let fatal = FatalError::new(problems);
            fatal.log();
            return Err(fatal.into());
        }
    };

    // INSTANCE is not locked while the initializer runs
    let built = {
        let _marker = InitializerMarker::set();
        initializer()
    };
    let configuration = Arc::new(built?);

    let mut slot = INSTANCE.write().unwrap_or_else(PoisonError::into_inner);
    match slot.as_ref() {
        Some(existing) => {
            tracing::debug!("Configuration installed while the initializer ran; keeping it");
            Ok(Arc::clone(existing))
        }
        None => {
            *slot = Some(Arc::clone(&configuration));
            Ok(configuration)
        }
    }
}

/// Marks the current thread as running an initializer until dropped.
struct InitializerMarker;

impl InitializerMarker {
    fn set() -> Self {
        IN_INITIALIZER.with(|flag| flag.set(true));
        InitializerMarker
    }
}

impl Drop for InitializerMarker {
    fn drop(&mut self) {
        IN_INITIALIZER.with(|flag| flag.set(false));
    }
}

fn installed() -> Option<Arc<Configuration>> {
    INSTANCE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(Arc::clone)
}

/// Returns true if a process-wide configuration is installed.
pub fn is_initialized() -> bool {
    INSTANCE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

/// Removes the process-wide configuration.
pub fn teardown() {
    if INSTANCE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
        .is_some()
    {
        tracing::debug!("Process-wide configuration torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::environment::Environment;
    use crate::domain::group::Group;
    use crate::domain::problem::Problem;
    use crate::domain::property::Property;
    use crate::domain::service::ConfigurationService;

    // The handle is process-wide, so tests touching it take this lock.
    static SERIAL: Mutex<()> = Mutex::new(());

    #[test]
    fn test_global_lifecycle() {
        let _serial = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        teardown();
        clear_initializers();

        assert!(!is_initialized());
        assert!(matches!(instance(), Err(ConfigError::NotInitialized)));

        fn build() -> Result<Configuration> {
            Configuration::builder()
                .with_environment(Environment::empty())
                .build()
        }

        register_initializer("first", build);
        let first = instance().unwrap();
        assert!(is_initialized());
        assert!(Arc::ptr_eq(&first, &instance().unwrap()));

        assert!(matches!(
            initialize(build().unwrap()),
            Err(ConfigError::AlreadyInitialized)
        ));

        teardown();
        register_initializer("second", build);
        let err = instance().unwrap_err();
        match err.problems().and_then(|p| p.iter().next()) {
            Some(Problem::Construction(ConstructionProblem::TooManyInitializers { names })) => {
                assert_eq!(names, &vec!["first".to_string(), "second".to_string()]);
            }
            other => panic!("unexpected problem: {:?}", other),
        }
        assert!(!is_initialized());

        clear_initializers();
        let count: Property<i32> = Property::builder().default_value(3).build();
        let config = Configuration::builder()
            .with_group(Group::new("app").with("COUNT", &count))
            .with_environment(Environment::empty())
            .build()
            .unwrap();
        initialize(config).unwrap();
        assert_eq!(instance().unwrap().get(&count), Some(3));

        teardown();
        assert!(!is_initialized());
    }

    fn build_observing_handle() -> Result<Configuration> {
        assert!(!is_initialized());
        assert!(matches!(instance(), Err(ConfigError::NotInitialized)));
        Configuration::builder()
            .with_environment(Environment::empty())
            .build()
    }

    #[test]
    fn test_initializer_may_query_the_handle() {
        let _serial = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
        teardown();
        clear_initializers();
        register_initializer("observing", build_observing_handle);

        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let _ = tx.send(instance().map(|_| ()));
        });
        let result = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("instance() did not return");
        assert!(result.is_ok());
        assert!(is_initialized());

        teardown();
        clear_initializers();
    }
}
