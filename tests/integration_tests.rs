// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for basic configuration operations.
//!
//! These tests verify that a configuration resolves values from each kind of
//! source and handles common use cases.

mod common;

use common::create_temp_file;
use hexprop::adapters::MapDirectoryContext;
use hexprop::domain::problem::LoaderProblem;
use hexprop::domain::validator::{Matches, NumberBound};
use hexprop::prelude::*;
use hexprop::service::global;
use std::collections::BTreeMap;
use std::sync::Arc;

fn server_group(port: &Property<i32>, host: &Property<String>) -> Group {
    Group::new("app.Server").with("PORT", port).with("HOST", host)
}

#[test]
fn test_properties_file_source() {
    let port: Property<i32> = Property::new();
    let host: Property<String> = Property::new();
    let file = create_temp_file(
        ".properties",
        "# server settings\napp.Server.PORT = 8080\napp.Server.HOST : example.com\n",
    );

    let config = Configuration::builder()
        .with_group(server_group(&port, &host))
        .with_environment(Environment::empty())
        .with_properties_file(file.path())
        .build()
        .unwrap();

    assert_eq!(config.get(&port), Some(8080));
    assert_eq!(config.get(&host), Some("example.com".to_string()));
    assert_eq!(config.snapshot().source_of(&port).map(|l| l.name()), Some("file"));
}

#[cfg(feature = "yaml")]
#[test]
fn test_yaml_file_source() {
    let port: Property<i32> = Property::new();
    let host: Property<String> = Property::new();
    let file = create_temp_file(
        ".yaml",
        "app:\n  Server:\n    PORT: 9090\n    HOST: yaml.example.com\n",
    );

    let config = Configuration::builder()
        .with_group(server_group(&port, &host))
        .with_environment(Environment::empty())
        .with_properties_file(file.path())
        .build()
        .unwrap();

    assert_eq!(config.get(&port), Some(9090));
    assert_eq!(config.get(&host), Some("yaml.example.com".to_string()));
}

#[test]
fn test_malformed_file_fails() {
    let port: Property<i32> = Property::new();
    let file = create_temp_file(".properties", "app.Server.PORT=\\u12\n");

    let err = Configuration::builder()
        .with_group(Group::new("app.Server").with("PORT", &port))
        .with_environment(Environment::empty())
        .with_properties_file(file.path())
        .build()
        .unwrap_err();

    assert!(err
        .problems()
        .unwrap()
        .loader_problems()
        .any(|p| matches!(p, LoaderProblem::MalformedSource { .. })));
}

#[test]
fn test_missing_file_is_skipped() {
    let port: Property<i32> = Property::builder().default_value(1).build();
    let dir = tempfile::tempdir().unwrap();

    let config = Configuration::builder()
        .with_group(Group::new("app.Server").with("PORT", &port))
        .with_environment(Environment::empty())
        .with_properties_file(dir.path().join("absent.properties"))
        .build()
        .unwrap();

    assert_eq!(config.get(&port), Some(1));
}

#[test]
fn test_unreadable_file_is_a_loader_problem() {
    let port: Property<i32> = Property::new();
    let dir = tempfile::tempdir().unwrap();

    let err = Configuration::builder()
        .with_group(Group::new("app.Server").with("PORT", &port))
        .with_environment(Environment::empty())
        .with_properties_file(dir.path())
        .build()
        .unwrap_err();

    assert!(matches!(err, ConfigError::Fatal(_)));
    assert!(err
        .problems()
        .unwrap()
        .loader_problems()
        .any(|p| matches!(p, LoaderProblem::IoError { .. })));
}

#[test]
fn test_file_path_from_property() {
    let path: Property<String> = Property::new();
    let port: Property<i32> = Property::new();
    let file = create_temp_file(".properties", "app.Server.PORT=7070\n");

    let config = Configuration::builder()
        .with_group(Group::new("app.Files").with("CONFIG", &path))
        .with_group(Group::new("app.Server").with("PORT", &port))
        .with_environment(Environment::empty().with_system_property(
            "app.Files.CONFIG",
            file.path().to_string_lossy(),
        ))
        .with_standard_loaders()
        .with_properties_file_from(&path)
        .build()
        .unwrap();

    assert_eq!(config.get(&port), Some(7070));
    assert_eq!(config.snapshot().source_of(&path).map(|l| l.name()), Some("sysprop"));
}

#[test]
fn test_unregistered_path_property_fails() {
    let path: Property<String> = Property::new();

    let err = Configuration::builder()
        .with_environment(Environment::empty())
        .with_properties_file_from(&path)
        .build()
        .unwrap_err();

    assert!(err.problems().unwrap().construction_problems().count() > 0);
}

#[test]
fn test_env_var_with_prefix() {
    let port: Property<i32> = Property::new();
    let host: Property<String> = Property::new();
    let env = Environment::empty()
        .with_env_var("MYAPP_app_Server_PORT", "3000")
        .with_env_var("OTHER_app_Server_HOST", "ignored");

    let config = Configuration::builder()
        .with_group(server_group(&port, &host))
        .with_environment(env)
        .with_loader(Box::new(
            EnvVarLoader::with_prefix("MYAPP_").replace_underscores(true),
        ))
        .build()
        .unwrap();

    assert_eq!(config.get(&port), Some(3000));
    assert_eq!(config.get(&host), None);
}

#[test]
fn test_directory_lookup() {
    let port: Property<i32> = Property::new();
    let host: Property<String> = Property::new();
    let directory = MapDirectoryContext::new()
        .with_binding("comp/env/app/Server/HOST", "db.internal")
        .with_binding("app.Server.PORT", "5432");

    let config = Configuration::builder()
        .with_group(server_group(&port, &host))
        .with_environment(Environment::empty().with_directory(Arc::new(directory)))
        .with_standard_loaders()
        .build()
        .unwrap();

    assert_eq!(config.get(&host), Some("db.internal".to_string()));
    assert_eq!(config.get(&port), Some(5432));
    assert_eq!(config.snapshot().source_of(&host).map(|l| l.name()), Some("directory"));
}

#[test]
fn test_ambiguous_directory_value_fails() {
    let port: Property<i32> = Property::new();
    let directory = MapDirectoryContext::new()
        .with_binding("comp/env/app.Server.PORT", "1")
        .with_binding("app/Server/PORT", "2");

    let err = Configuration::builder()
        .with_group(Group::new("app.Server").with("PORT", &port))
        .with_environment(Environment::empty().with_directory(Arc::new(directory)))
        .with_loader(Box::new(DirectoryLoader::new()))
        .build()
        .unwrap_err();

    assert!(err
        .problems()
        .unwrap()
        .loader_problems()
        .any(|p| matches!(p, LoaderProblem::AmbiguousDirectoryValue { .. })));
}

#[test]
fn test_system_properties_keep_whitespace() {
    let banner: Property<String> = Property::new();

    let config = Configuration::builder()
        .with_group(Group::new("app.Ui").with("BANNER", &banner))
        .with_environment(Environment::empty().with_system_property("app.Ui.BANNER", "  hi  "))
        .with_loader(Box::new(SystemPropertyLoader::new()))
        .build()
        .unwrap();

    assert_eq!(config.get(&banner), Some("  hi  ".to_string()));
}

#[test]
fn test_command_line_flag_and_value() {
    let verbose = Property::<bool>::flag().build();
    let name: Property<String> = Property::builder()
        .validator(Matches::new("^[a-z]+$"))
        .build();

    let config = Configuration::builder()
        .with_group(Group::new("app").with("VERBOSE", &verbose).with("NAME", &name))
        .with_environment(Environment::empty())
        .with_cmd_line_args(vec!["--app.VERBOSE", "--app.NAME=demo"])
        .with_standard_loaders()
        .build()
        .unwrap();

    assert_eq!(config.get(&verbose), Some(true));
    assert_eq!(config.get(&name), Some("demo".to_string()));
}

#[test]
fn test_export_to_map() {
    let port: Property<i32> = Property::builder()
        .alias_out("SERVER_PORT")
        .validator(NumberBound::greater_than(0))
        .build();
    let host: Property<String> = Property::new();

    let config = Configuration::builder()
        .with_group(server_group(&port, &host))
        .with_environment(Environment::empty())
        .with_fixed_value(&port, 8080)
        .build()
        .unwrap();

    let mut canonical: BTreeMap<String, String> = BTreeMap::new();
    assert_eq!(config.export(ExportPolicy::CanonicalOnly, &mut canonical).unwrap(), 1);
    assert_eq!(canonical.get("app.Server.PORT").map(String::as_str), Some("8080"));

    let mut all: BTreeMap<String, String> = BTreeMap::new();
    assert_eq!(config.export(ExportPolicy::CanonicalAndAliases, &mut all).unwrap(), 2);
    assert_eq!(all.get("SERVER_PORT").map(String::as_str), Some("8080"));

    let mut aliases: BTreeMap<String, String> = BTreeMap::new();
    config.export(ExportPolicy::AliasesOnly, &mut aliases).unwrap();
    assert_eq!(aliases.keys().collect::<Vec<_>>(), vec!["SERVER_PORT"]);
}

#[test]
fn test_export_to_environment() {
    let port: Property<i32> = Property::new();

    let config = Configuration::builder()
        .with_group(Group::new("itest.Export").with("PORT", &port))
        .with_environment(Environment::empty())
        .with_fixed_value(&port, 4242)
        .build()
        .unwrap();

    let mut exporter = EnvVarExporter::with_prefix("HEXPROP_ITEST_").replace_dots(true);
    config.export(ExportPolicy::CanonicalOnly, &mut exporter).unwrap();

    assert_eq!(exporter.exported(), ["HEXPROP_ITEST_itest_Export_PORT".to_string()]);
    assert_eq!(
        std::env::var("HEXPROP_ITEST_itest_Export_PORT").unwrap(),
        "4242"
    );
}

fn build_global() -> Result<Configuration> {
    Configuration::builder()
        .with_environment(Environment::empty())
        .build()
}

#[test]
fn test_global_lifecycle() {
    assert!(matches!(global::instance(), Err(ConfigError::NotInitialized)));

    global::register_initializer("integration", build_global);
    let first = global::instance().unwrap();
    let second = global::instance().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(global::is_initialized());

    let other = build_global().unwrap();
    assert!(matches!(global::initialize(other), Err(ConfigError::AlreadyInitialized)));

    global::teardown();
    global::register_initializer("second", build_global);
    let err = global::instance().unwrap_err();
    assert!(err.problems().is_some());

    global::clear_initializers();
    let installed = global::initialize(build_global().unwrap()).unwrap();
    assert!(Arc::ptr_eq(&installed, &global::instance().unwrap()));
    global::teardown();
}
