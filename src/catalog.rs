//! Catalog loading, integrity validation, and the shared join.
//!
//! The catalog is the immutable in-memory view of the two data files. It is
//! built once at startup and then handed by reference to the enumerator,
//! the materializer and the resolver.
//!
//! ## Validation
//!
//! [`Catalog::load`] rejects data that would break page generation or URL
//! decomposition, reporting every problem at once:
//!
//! - slugs that are not kebab-case
//! - cities naming a state that does not exist, states listing cities that
//!   do not exist, and cities listed by a state other than their own
//! - cities missing from their state's list (they would get service-first
//!   pages but no location-first pages)
//! - a slug used both as a service and as a city
//! - compound slugs that split more than one way
//!
//! ## Join
//!
//! [`Catalog::join`] is the one place a (service, city) pair is expanded
//! into the service, city and parent state records. Both URL topologies and
//! both front ends (static files and runtime resolution) go through it.

use crate::slug::{self, DecomposeError, Topology, Vocabulary};
use crate::types::{City, LocationTables, Service, ServiceTable, State};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SERVICES_FILE: &str = "services.json";
pub const LOCATIONS_FILE: &str = "locations.json";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} data integrity issue(s):\n{}", .0.len(), format_issues(.0))]
    Integrity(Vec<IntegrityIssue>),
}

fn format_issues(issues: &[IntegrityIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  - {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A single data problem, naming the offending slug(s).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    #[error("{kind} slug '{slug}' is not kebab-case")]
    InvalidSlug { kind: &'static str, slug: String },
    #[error("{kind} '{slug}' has an empty {field}")]
    EmptyField {
        kind: &'static str,
        slug: String,
        field: &'static str,
    },
    #[error("state '{state}' has abbreviation '{abbreviation}', expected two uppercase letters")]
    InvalidAbbreviation { state: String, abbreviation: String },
    #[error("city '{city}' references unknown state '{state}'")]
    UnknownState { city: String, state: String },
    #[error("state '{state}' lists unknown city '{city}'")]
    UnknownCity { state: String, city: String },
    #[error("state '{listed_in}' lists city '{city}', which belongs to '{declared}'")]
    CityStateMismatch {
        city: String,
        listed_in: String,
        declared: String,
    },
    #[error("state '{state}' lists city '{city}' more than once")]
    DuplicateCityListing { state: String, city: String },
    #[error("city '{city}' is not listed by its state '{state}'")]
    CityNotListed { city: String, state: String },
    #[error("'{slug}' is both a service slug and a city slug")]
    SharedSlug { slug: String },
    #[error("{topology} compound for {service} + {city}: {error}")]
    Compound {
        topology: Topology,
        service: String,
        city: String,
        error: DecomposeError,
    },
}

/// Dangling reference hit while joining a (service, city) pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    #[error("unknown service '{0}'")]
    UnknownService(String),
    #[error("unknown city '{0}'")]
    UnknownCity(String),
    #[error("city '{city}' references unknown state '{state}'")]
    UnknownState { city: String, state: String },
}

/// The fully joined record behind one page.
#[derive(Debug, Clone, Copy)]
pub struct Joined<'a> {
    pub service_slug: &'a str,
    pub service: &'a Service,
    pub city_slug: &'a str,
    pub city: &'a City,
    pub state_slug: &'a str,
    pub state: &'a State,
}

/// Immutable service and location tables.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    services: ServiceTable,
    states: BTreeMap<String, State>,
    cities: BTreeMap<String, City>,
}

impl Catalog {
    /// Build a catalog from already-parsed tables without validating them.
    pub fn from_tables(services: ServiceTable, locations: LocationTables) -> Self {
        Self {
            services,
            states: locations.states,
            cities: locations.cities,
        }
    }

    /// Read `services.json` and `locations.json` from `dir` without validating.
    pub fn read(dir: &Path) -> Result<Self, CatalogError> {
        let services: ServiceTable = read_json(&dir.join(SERVICES_FILE))?;
        let locations: LocationTables = read_json(&dir.join(LOCATIONS_FILE))?;
        Ok(Self::from_tables(services, locations))
    }

    /// Read and validate the data directory.
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        let catalog = Self::read(dir)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let issues = self.integrity_issues();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Integrity(issues))
        }
    }

    /// Every data problem in the catalog, in a stable order.
    pub fn integrity_issues(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        self.check_fields(&mut issues);
        self.check_references(&mut issues);
        self.check_vocabularies(&mut issues);
        issues
    }

    fn check_fields(&self, issues: &mut Vec<IntegrityIssue>) {
        let mut check_slug = |kind: &'static str, slug: &str| {
            if !slug::is_valid_slug(slug) {
                issues.push(IntegrityIssue::InvalidSlug {
                    kind,
                    slug: slug.to_string(),
                });
            }
        };
        for slug in self.services.keys() {
            check_slug("service", slug);
        }
        for slug in self.states.keys() {
            check_slug("state", slug);
        }
        for slug in self.cities.keys() {
            check_slug("city", slug);
        }

        let empty = |kind: &'static str, slug: &str, field: &'static str| {
            IntegrityIssue::EmptyField {
                kind,
                slug: slug.to_string(),
                field,
            }
        };
        for (slug, service) in &self.services {
            if service.name.trim().is_empty() {
                issues.push(empty("service", slug, "name"));
            }
        }
        for (slug, state) in &self.states {
            if state.name.trim().is_empty() {
                issues.push(empty("state", slug, "name"));
            }
            let abbr = &state.abbreviation;
            if abbr.len() != 2 || !abbr.bytes().all(|b| b.is_ascii_uppercase()) {
                issues.push(IntegrityIssue::InvalidAbbreviation {
                    state: slug.clone(),
                    abbreviation: abbr.clone(),
                });
            }
        }
        for (slug, city) in &self.cities {
            if city.name.trim().is_empty() {
                issues.push(empty("city", slug, "name"));
            }
        }
    }

    fn check_references(&self, issues: &mut Vec<IntegrityIssue>) {
        for (city_slug, city) in &self.cities {
            match self.states.get(&city.state) {
                None => issues.push(IntegrityIssue::UnknownState {
                    city: city_slug.clone(),
                    state: city.state.clone(),
                }),
                Some(state) if !state.cities.contains(city_slug) => {
                    issues.push(IntegrityIssue::CityNotListed {
                        city: city_slug.clone(),
                        state: city.state.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        for (state_slug, state) in &self.states {
            let mut seen = BTreeSet::new();
            for city_slug in &state.cities {
                if !seen.insert(city_slug.as_str()) {
                    issues.push(IntegrityIssue::DuplicateCityListing {
                        state: state_slug.clone(),
                        city: city_slug.clone(),
                    });
                    continue;
                }
                match self.cities.get(city_slug) {
                    None => issues.push(IntegrityIssue::UnknownCity {
                        state: state_slug.clone(),
                        city: city_slug.clone(),
                    }),
                    Some(city) if city.state != *state_slug => {
                        issues.push(IntegrityIssue::CityStateMismatch {
                            city: city_slug.clone(),
                            listed_in: state_slug.clone(),
                            declared: city.state.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }
    }

    /// Service and city slugs must be disjoint, and every compound slug must
    /// split back into exactly the pair it was built from.
    fn check_vocabularies(&self, issues: &mut Vec<IntegrityIssue>) {
        for slug in self.services.keys() {
            if self.cities.contains_key(slug) {
                issues.push(IntegrityIssue::SharedSlug { slug: slug.clone() });
            }
        }

        for topology in Topology::ALL {
            for service in self.services.keys() {
                for city in self.cities.keys() {
                    let compound = slug::compose(topology, service, city);
                    if let Err(error) = slug::decompose(&compound, topology, self) {
                        issues.push(IntegrityIssue::Compound {
                            topology,
                            service: service.clone(),
                            city: city.clone(),
                            error,
                        });
                    }
                }
            }
        }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn service(&self, slug: &str) -> Option<&Service> {
        self.services.get(slug)
    }

    pub fn city(&self, slug: &str) -> Option<&City> {
        self.cities.get(slug)
    }

    pub fn state(&self, slug: &str) -> Option<&State> {
        self.states.get(slug)
    }

    /// Services in slug order.
    pub fn services(&self) -> impl Iterator<Item = (&str, &Service)> {
        self.services.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Cities in slug order.
    pub fn cities(&self) -> impl Iterator<Item = (&str, &City)> {
        self.cities.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// States in slug order.
    pub fn states(&self) -> impl Iterator<Item = (&str, &State)> {
        self.states.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Expand a (service, city) pair into its service, city and state records.
    pub fn join<'a>(&'a self, service: &str, city: &str) -> Result<Joined<'a>, JoinError> {
        let (service_slug, service_rec) = self
            .services
            .get_key_value(service)
            .ok_or_else(|| JoinError::UnknownService(service.to_string()))?;
        let (city_slug, city_rec) = self
            .cities
            .get_key_value(city)
            .ok_or_else(|| JoinError::UnknownCity(city.to_string()))?;
        let (state_slug, state_rec) =
            self.states
                .get_key_value(&city_rec.state)
                .ok_or_else(|| JoinError::UnknownState {
                    city: city_slug.clone(),
                    state: city_rec.state.clone(),
                })?;
        Ok(Joined {
            service_slug,
            service: service_rec,
            city_slug,
            city: city_rec,
            state_slug,
            state: state_rec,
        })
    }
}

impl Vocabulary for Catalog {
    fn is_service(&self, slug: &str) -> bool {
        self.services.contains_key(slug)
    }

    fn is_city(&self, slug: &str) -> bool {
        self.cities.contains_key(slug)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}
