// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line argument loader.
//!
//! This module provides a loader that reads property values from command-line
//! arguments.

use crate::domain::values::{LoadContext, LoadSession, LoaderValues};
use crate::ports::Loader;

/// Loader for command-line arguments.
///
/// Each argument names one property, optionally prefixed with `--` or `-`:
/// - `name=value`: sets the property from the text after the first `=`
/// - `name`: a bare name; sets a flag property to true
///
/// A lone `--` ends the arguments this loader reads. Names that match no
/// property are a problem unless [`ignore_unknown`](Self::ignore_unknown) is
/// set. When no arguments are given explicitly, the loader reads the command
/// line captured in the [`Environment`](crate::domain::Environment).
///
/// # Examples
///
/// ```rust
/// use hexprop::adapters::CommandLineLoader;
///
/// let loader = CommandLineLoader::from_args(vec!["--app.Server.PORT=8080", "app.Server.VERBOSE"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandLineLoader {
    /// Explicit arguments; `None` reads the environment's command line
    args: Option<Vec<String>>,
    /// Whether unknown names are silently skipped
    ignore_unknown: bool,
}

impl CommandLineLoader {
    /// Creates a loader reading the environment's command line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader reading the given arguments.
    ///
    /// # Arguments
    ///
    /// * `args` - The arguments, without the program name
    pub fn from_args<S: AsRef<str>>(args: Vec<S>) -> Self {
        Self {
            args: Some(args.iter().map(|a| a.as_ref().to_string()).collect()),
            ignore_unknown: false,
        }
    }

    /// Sets whether names that match no property are silently skipped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hexprop::adapters::CommandLineLoader;
    ///
    /// let loader = CommandLineLoader::new().ignore_unknown(true);
    /// ```
    pub fn ignore_unknown(mut self, enabled: bool) -> Self {
        self.ignore_unknown = enabled;
        self
    }

    /// Splits one argument into a name and optional text.
    fn split_arg(arg: &str) -> Option<(&str, Option<&str>)> {
        let arg = arg
            .strip_prefix("--")
            .or_else(|| arg.strip_prefix('-'))
            .unwrap_or(arg);
        let (name, text) = match arg.split_once('=') {
            Some((name, text)) => (name, Some(text)),
            None => (arg, None),
        };
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some((name, text))
        }
    }
}

impl Loader for CommandLineLoader {
    fn name(&self) -> &str {
        "cli"
    }

    fn specific_load_description(&self) -> String {
        "command line arguments".to_string()
    }

    fn load(&self, ctx: &LoadContext<'_>) -> LoaderValues {
        let args = self
            .args
            .as_deref()
            .unwrap_or_else(|| ctx.environment().cmd_line_args());
        let mut session = LoadSession::new(ctx, self);

        for arg in args {
            if arg == "--" {
                break;
            }
            match Self::split_arg(arg) {
                Some((name, text)) => session.attempt_to_add(name, text),
                None => tracing::debug!("Skipping command line argument '{}' with no name", arg),
            }
        }
        session.finish()
    }

    fn is_unknown_property_a_problem(&self) -> bool {
        !self.ignore_unknown
    }

    fn is_flag_value_supported(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::CaseInsensitiveNaming;
    use crate::domain::environment::Environment;
    use crate::domain::group::Group;
    use crate::domain::problem::{LoaderProblem, Problem};
    use crate::domain::property::Property;
    use crate::domain::registry::PropertyRegistry;
    use crate::domain::value::Value;
    use crate::domain::values::{LoaderInfo, ValuesSoFar};
    use std::sync::Arc;

    struct Fixture {
        registry: PropertyRegistry,
        host: Property<String>,
        port: Property<i32>,
        verbose: Property<bool>,
    }

    fn fixture() -> Fixture {
        let host: Property<String> = Property::new();
        let port: Property<i32> = Property::builder().alias_in("port").build();
        let verbose = Property::<bool>::flag().build();
        let group = Group::new("app.Server")
            .with("HOST", &host)
            .with("PORT", &port)
            .with("VERBOSE", &verbose);
        let (registry, _) =
            PropertyRegistry::build(vec![group], &[], Arc::new(CaseInsensitiveNaming));
        Fixture {
            registry,
            host,
            port,
            verbose,
        }
    }

    fn load(f: &Fixture, loader: &CommandLineLoader, env: &Environment) -> LoaderValues {
        let so_far = ValuesSoFar::new();
        let ctx = LoadContext::new(LoaderInfo::new(0, "cli", "test"), env, &f.registry, &so_far);
        loader.load(&ctx)
    }

    fn value(lv: &LoaderValues, def: &crate::domain::PropertyDef) -> Option<Value> {
        lv.value_for(def).map(|v| v.value().clone())
    }

    #[test]
    fn test_cli_loader_name() {
        assert_eq!(CommandLineLoader::new().name(), "cli");
        assert!(CommandLineLoader::new().is_flag_value_supported());
    }

    #[test]
    fn test_cli_loader_prefix_forms() {
        let f = fixture();
        let loader = CommandLineLoader::from_args(vec![
            "--app.Server.HOST=localhost",
            "-port=8080",
        ]);
        let lv = load(&f, &loader, &Environment::empty());
        assert!(lv.problems().is_empty());
        assert_eq!(value(&lv, &f.host), Some(Value::from("localhost")));
        assert_eq!(value(&lv, &f.port), Some(Value::Int(8080)));
    }

    #[test]
    fn test_cli_loader_bare_flag() {
        let f = fixture();
        let loader = CommandLineLoader::from_args(vec!["app.server.verbose"]);
        let lv = load(&f, &loader, &Environment::empty());
        assert_eq!(value(&lv, &f.verbose), Some(Value::Bool(true)));
    }

    #[test]
    fn test_cli_loader_equals_in_value() {
        let f = fixture();
        let loader = CommandLineLoader::from_args(vec!["app.Server.HOST=host=localhost;port=5432"]);
        let lv = load(&f, &loader, &Environment::empty());
        assert_eq!(
            value(&lv, &f.host),
            Some(Value::from("host=localhost;port=5432"))
        );
    }

    #[test]
    fn test_cli_loader_empty_value_is_no_value() {
        let f = fixture();
        let loader = CommandLineLoader::from_args(vec!["app.Server.HOST="]);
        let lv = load(&f, &loader, &Environment::empty());
        assert!(lv.values().is_empty());
        assert!(lv.problems().is_empty());
    }

    #[test]
    fn test_cli_loader_unknown_name() {
        let f = fixture();
        let loader = CommandLineLoader::from_args(vec!["positional"]);
        let lv = load(&f, &loader, &Environment::empty());
        assert!(matches!(
            lv.problems().iter().next(),
            Some(Problem::Loader(LoaderProblem::UnknownProperty { name, .. })) if name == "positional"
        ));

        let lenient = CommandLineLoader::from_args(vec!["positional"]).ignore_unknown(true);
        assert!(load(&f, &lenient, &Environment::empty()).problems().is_empty());
    }

    #[test]
    fn test_cli_loader_repeated_name_is_a_problem() {
        let f = fixture();
        let loader = CommandLineLoader::from_args(vec!["port=1", "PORT=2"]);
        let lv = load(&f, &loader, &Environment::empty());
        assert_eq!(value(&lv, &f.port), Some(Value::Int(1)));
        assert!(matches!(
            lv.problems().iter().next(),
            Some(Problem::Loader(LoaderProblem::DuplicateValue { .. }))
        ));
    }

    #[test]
    fn test_cli_loader_stops_at_double_dash() {
        let f = fixture();
        let loader = CommandLineLoader::from_args(vec!["port=1", "--", "whatever", "--x=y"]);
        let lv = load(&f, &loader, &Environment::empty());
        assert!(lv.problems().is_empty());
        assert_eq!(lv.values().len(), 1);
    }

    #[test]
    fn test_cli_loader_reads_environment_command_line() {
        let f = fixture();
        let env = Environment::empty().with_cmd_line_args(["app.Server.PORT=9"]);
        let lv = load(&f, &CommandLineLoader::new(), &env);
        assert_eq!(value(&lv, &f.port), Some(Value::Int(9)));
    }

    #[test]
    fn test_split_arg() {
        assert_eq!(CommandLineLoader::split_arg("--a=b"), Some(("a", Some("b"))));
        assert_eq!(CommandLineLoader::split_arg("-a"), Some(("a", None)));
        assert_eq!(CommandLineLoader::split_arg("a="), Some(("a", Some(""))));
        assert_eq!(CommandLineLoader::split_arg("--=x"), None);
        assert_eq!(CommandLineLoader::split_arg("-"), None);
    }
}
