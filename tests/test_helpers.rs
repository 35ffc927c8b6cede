// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the shared mock loader.

mod common;

use common::{create_temp_file, MockLoader};
use hexprop::prelude::*;
use hexprop::domain::problem::LoaderProblem;

fn config_with(loader: MockLoader, group: Group) -> Result<Configuration> {
    Configuration::builder()
        .with_group(group)
        .with_environment(Environment::empty())
        .with_loader(Box::new(loader))
        .build()
}

#[test]
fn test_mock_loader_basic() {
    let port: Property<i32> = Property::new();
    let loader = MockLoader::new("mock").with_value("app.PORT", "8080");
    assert_eq!(loader.name(), "mock");

    let config = config_with(loader, Group::new("app").with("PORT", &port)).unwrap();
    assert_eq!(config.get(&port), Some(8080));
    assert_eq!(config.snapshot().source_of(&port).map(|l| l.name()), Some("mock"));
}

#[test]
fn test_mock_loader_flag() {
    let verbose = Property::<bool>::flag().build();
    let loader = MockLoader::new("mock").with_flag("app.VERBOSE");

    let config = config_with(loader, Group::new("app").with("VERBOSE", &verbose)).unwrap();
    assert_eq!(config.get(&verbose), Some(true));
}

#[test]
fn test_mock_loader_unknown_policy() {
    let port: Property<i32> = Property::new();
    let group = Group::new("app").with("PORT", &port);

    let strict = MockLoader::new("mock").with_value("nope", "1");
    assert!(config_with(strict, group.clone()).is_err());

    let lenient = MockLoader::new("mock").with_value("nope", "1").strict(false);
    assert!(config_with(lenient, group).is_ok());
}

#[test]
fn test_mock_loader_failure() {
    let port: Property<i32> = Property::new();
    let loader = MockLoader::new("mock").failing("disk on fire");

    let err = config_with(loader, Group::new("app").with("PORT", &port)).unwrap_err();
    let problems = err.problems().unwrap();
    assert!(matches!(
        problems.iter().next(),
        Some(Problem::Loader(LoaderProblem::IoError { message, .. })) if message == "disk on fire"
    ));
}

#[test]
fn test_create_temp_file() {
    let file = create_temp_file(".properties", "a=1\n");
    assert!(file.path().to_string_lossy().ends_with(".properties"));
    assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "a=1\n");
}
