// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the hexprop crate.
//!
//! This example demonstrates:
//! - Declaring typed properties with defaults, aliases and validators
//! - Resolving them from the command line, environment and a properties file
//! - Reporting every problem when resolution fails
//! - Exporting the resolved values
//!
//! To run this example:
//! ```bash
//! export APP_SERVER_PORT=5432
//! cargo run --example basic_usage -- --app.Server.HOST=db.local --verbose
//! ```

use hexprop::domain::validator::{NumberBound, OneOf};
use hexprop::prelude::*;
use std::collections::BTreeMap;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== hexprop: Basic Usage ===\n");

    let port: Property<i32> = Property::builder()
        .default_value(8080)
        .validator(NumberBound::greater_than(0))
        .alias_in("APP_SERVER_PORT")
        .description("Port the server listens on")
        .build();
    let host: Property<String> = Property::builder()
        .default_value("localhost".to_string())
        .build();
    let level: Property<String> = Property::builder()
        .default_value("info".to_string())
        .validator(OneOf::new(["trace", "debug", "info", "warn", "error"]))
        .build();
    let verbose = Property::<bool>::flag().alias("verbose").build();

    let server = Group::new("app.Server")
        .with("PORT", &port)
        .with("HOST", &host)
        .with("VERBOSE", &verbose);
    let logging = Group::new("app.Logging").with("LEVEL", &level);

    let config = match Configuration::builder()
        .with_groups([server, logging])
        .with_cmd_line_args(std::env::args().skip(1).collect::<Vec<_>>())
        .with_standard_loaders()
        .with_properties_file("application.properties")
        .build()
    {
        Ok(config) => config,
        Err(e) => {
            println!("✗ Configuration failed:\n{}", e);
            return Err(e);
        }
    };

    println!("--- Resolved Values ---");
    println!("port    = {:?}", config.get(&port));
    println!("host    = {:?}", config.get(&host));
    println!("level   = {:?}", config.get(&level));
    println!("verbose = {:?}", config.get(&verbose));

    println!("\n--- Provenance ---");
    let snapshot = config.snapshot();
    for (label, def) in [("port", &*port), ("host", &*host), ("verbose", &*verbose)] {
        match snapshot.source_of(def) {
            Some(loader) => println!("{} came from {}", label, loader),
            None => println!("{} uses its default", label),
        }
    }

    println!("\n--- Export ---");
    let mut exported: BTreeMap<String, String> = BTreeMap::new();
    config.export(ExportPolicy::CanonicalAndAliases, &mut exported)?;
    for (name, value) in &exported {
        println!("{}={}", name, value);
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
