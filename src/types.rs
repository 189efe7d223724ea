//! Entity tables read from the data directory.
//!
//! These mirror `services.json` and `locations.json` field for field. They are
//! plain reference data: loaded once, never mutated, and joined by slug.
//! Relations are foreign keys (a state lists city slugs, a city names its
//! state slug), not nested objects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A repair service offered in every city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Service {
    /// Display name, e.g. "Drywall Repair"
    pub name: String,
    /// One or two sentences used in the page intro and meta description
    pub short_description: String,
    /// Markdown body for the intro section
    pub long_description: String,
    /// Free-form price range, e.g. "$150-$500"
    pub price_range: String,
    /// Typical job duration, e.g. "1-2 days"
    pub timeline: String,
    /// Warranty terms, e.g. "3 Years"
    pub warranty: String,
    /// Ordered process steps
    pub process: Vec<String>,
    pub benefits: Vec<String>,
}

/// A state grouping cities in the location-first hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct State {
    pub name: String,
    /// Two-letter postal abbreviation
    pub abbreviation: String,
    /// Member city slugs, in display order
    pub cities: Vec<String>,
}

/// A city in the service area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct City {
    pub name: String,
    /// Parent state slug
    pub state: String,
    /// Marks the city the business operates from
    #[serde(default)]
    pub headquarters: bool,
    /// e.g. "Same-day"
    pub response_time: String,
    #[serde(default)]
    pub emergency_service: bool,
    /// Free-form population figure, e.g. "78,000"
    pub population: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhoods: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_codes: Option<Vec<String>>,
}

/// Contents of `locations.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationTables {
    pub states: BTreeMap<String, State>,
    pub cities: BTreeMap<String, City>,
}

/// Contents of `services.json`, keyed by service slug.
pub type ServiceTable = BTreeMap<String, Service>;
