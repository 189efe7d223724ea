//! Shared test utilities.
//!
//! Provides an in-memory sample catalog, small record builders, and a
//! fixture copier for tests that need a real data directory on disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let catalog = sample_catalog();
//! let joined = catalog.join("drywall-repair", "frederick").unwrap();
//!
//! let tmp = setup_fixtures();
//! let catalog = Catalog::load(tmp.path()).unwrap();
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::catalog::Catalog;
use crate::types::{City, LocationTables, Service, ServiceTable, State};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/data/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/data");
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

// =========================================================================
// Record builders
// =========================================================================

pub fn sample_service(name: &str) -> Service {
    Service {
        name: name.to_string(),
        short_description: format!("{name} done right."),
        long_description: format!("Our crews handle **{name}** start to finish."),
        price_range: "$100-$1,000".to_string(),
        timeline: "1-3 days".to_string(),
        warranty: "1 Year".to_string(),
        process: vec!["Inspect".to_string(), "Repair".to_string()],
        benefits: vec!["Licensed and insured".to_string()],
    }
}

pub fn sample_state(name: &str, abbreviation: &str, cities: &[&str]) -> State {
    State {
        name: name.to_string(),
        abbreviation: abbreviation.to_string(),
        cities: cities.iter().map(|c| c.to_string()).collect(),
    }
}

pub fn sample_city(name: &str, state: &str) -> City {
    City {
        name: name.to_string(),
        state: state.to_string(),
        headquarters: false,
        response_time: "Next-day".to_string(),
        emergency_service: false,
        population: "10,000".to_string(),
        neighborhoods: None,
        zip_codes: None,
    }
}

// =========================================================================
// Sample catalog
// =========================================================================

/// Three services, four cities in two states. Frederick is headquarters.
pub fn sample_tables() -> (ServiceTable, LocationTables) {
    let mut services = ServiceTable::new();
    services.insert(
        "drywall-repair".to_string(),
        Service {
            price_range: "$150-$500".to_string(),
            warranty: "3 Years".to_string(),
            process: vec![
                "Inspect the damage".to_string(),
                "Replace the board".to_string(),
                "Tape, mud and sand".to_string(),
            ],
            benefits: vec![
                "Invisible seams".to_string(),
                "Dust containment".to_string(),
            ],
            ..sample_service("Drywall Repair")
        },
    );
    services.insert(
        "water-damage-repair".to_string(),
        sample_service("Water Damage Repair"),
    );
    services.insert(
        "interior-painting".to_string(),
        sample_service("Interior Painting"),
    );

    let mut locations = LocationTables::default();
    locations.states.insert(
        "maryland".to_string(),
        sample_state("Maryland", "MD", &["frederick", "hagerstown", "mount-airy"]),
    );
    locations.states.insert(
        "west-virginia".to_string(),
        sample_state("West Virginia", "WV", &["martinsburg"]),
    );
    locations.cities.insert(
        "frederick".to_string(),
        City {
            headquarters: true,
            response_time: "Same-day".to_string(),
            emergency_service: true,
            population: "78,000".to_string(),
            neighborhoods: Some(vec!["Baker Park".to_string(), "Ballenger Creek".to_string()]),
            zip_codes: Some(vec!["21701".to_string(), "21702".to_string()]),
            ..sample_city("Frederick", "maryland")
        },
    );
    locations
        .cities
        .insert("hagerstown".to_string(), sample_city("Hagerstown", "maryland"));
    locations
        .cities
        .insert("mount-airy".to_string(), sample_city("Mount Airy", "maryland"));
    locations.cities.insert(
        "martinsburg".to_string(),
        sample_city("Martinsburg", "west-virginia"),
    );

    (services, locations)
}

pub fn sample_catalog() -> Catalog {
    let (services, locations) = sample_tables();
    Catalog::from_tables(services, locations)
}
