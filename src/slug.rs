//! Compound slug codec.
//!
//! Every generated page lives under a single URL segment that glues a service
//! slug and a city slug together with a hyphen. Both slugs may themselves
//! contain hyphens (`water-damage-repair`, `mount-airy`), so splitting the
//! compound back apart needs to know which tokens are valid.
//!
//! ## Token Order
//!
//! The order depends on the [`Topology`]:
//!
//! - service-first: `/services/drywall-repair/frederick-drywall-repair`
//!   → `{city}-{service}`
//! - location-first: `/locations/maryland/frederick/drywall-repair-frederick`
//!   → `{service}-{city}`
//!
//! In both cases the token that is *also* present as the parent directory
//! (the anchor) is the suffix of the compound.
//!
//! ## Splitting
//!
//! [`split_anchored`] strips the known suffix by exact length. Substring
//! replacement would also remove copies of the anchor embedded in the other
//! token (`bay-repair-town-repair` with anchor `repair` must yield
//! `bay-repair-town`, not `bay-town`).
//!
//! [`decompose`] works from the string alone and tries every hyphen as a split
//! point. It reports ambiguity instead of guessing.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One of the two URL layouts exposing the same service × city content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topology {
    /// `/services/{service}/{city}-{service}/`
    ServiceFirst,
    /// `/locations/{state}/{city}/{service}-{city}/`
    LocationFirst,
}

impl Topology {
    pub const ALL: [Topology; 2] = [Topology::ServiceFirst, Topology::LocationFirst];

    pub fn as_str(self) -> &'static str {
        match self {
            Topology::ServiceFirst => "service-first",
            Topology::LocationFirst => "location-first",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decomposed compound slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlugPair<'a> {
    pub service: &'a str,
    pub city: &'a str,
}

/// The known-valid token sets used to validate a split.
pub trait Vocabulary {
    fn is_service(&self, slug: &str) -> bool;
    fn is_city(&self, slug: &str) -> bool;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecomposeError {
    #[error("no service/city split matches '{0}'")]
    NotFound(String),
    #[error("'{compound}' splits {} ways: {}", .candidates.len(), format_candidates(.candidates))]
    Ambiguous {
        compound: String,
        /// `(service, city)` pairs that all validate.
        candidates: Vec<(String, String)>,
    },
}

fn format_candidates(candidates: &[(String, String)]) -> String {
    candidates
        .iter()
        .map(|(s, c)| format!("{s} + {c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the compound segment for a (service, city) pair.
///
/// Callers pass slugs that already passed [`is_valid_slug`]; the catalog
/// loader guarantees this for every table key.
pub fn compose(topology: Topology, service: &str, city: &str) -> String {
    debug_assert!(!service.is_empty() && !city.is_empty());
    match topology {
        Topology::ServiceFirst => format!("{city}-{service}"),
        Topology::LocationFirst => format!("{service}-{city}"),
    }
}

/// Recover the other token of a compound whose suffix is already known.
///
/// The anchor is the service for [`Topology::ServiceFirst`] and the city for
/// [`Topology::LocationFirst`]. Returns `None` unless the compound is exactly
/// `{other}-{anchor}` with a non-empty `other`. The recovered token is not
/// checked against any vocabulary here.
pub fn split_anchored<'a>(
    compound: &'a str,
    topology: Topology,
    anchor: &'a str,
) -> Option<SlugPair<'a>> {
    if anchor.is_empty() {
        return None;
    }
    let other = compound.strip_suffix(anchor)?.strip_suffix('-')?;
    if other.is_empty() {
        return None;
    }
    Some(match topology {
        Topology::ServiceFirst => SlugPair {
            service: anchor,
            city: other,
        },
        Topology::LocationFirst => SlugPair {
            service: other,
            city: anchor,
        },
    })
}

/// Split a compound using only the vocabularies.
///
/// Exactly one valid split is required. Zero splits is
/// [`DecomposeError::NotFound`], more than one is [`DecomposeError::Ambiguous`].
pub fn decompose<'a, V: Vocabulary + ?Sized>(
    compound: &'a str,
    topology: Topology,
    vocabulary: &V,
) -> Result<SlugPair<'a>, DecomposeError> {
    let matches: Vec<SlugPair<'a>> = candidate_splits(compound, topology)
        .filter(|pair| vocabulary.is_service(pair.service) && vocabulary.is_city(pair.city))
        .collect();

    match matches.as_slice() {
        [] => Err(DecomposeError::NotFound(compound.to_string())),
        [only] => Ok(*only),
        many => Err(DecomposeError::Ambiguous {
            compound: compound.to_string(),
            candidates: many
                .iter()
                .map(|p| (p.service.to_string(), p.city.to_string()))
                .collect(),
        }),
    }
}

/// Every way of cutting the compound at a hyphen, in left-to-right order.
fn candidate_splits(compound: &str, topology: Topology) -> impl Iterator<Item = SlugPair<'_>> {
    compound.match_indices('-').filter_map(move |(i, _)| {
        let (left, right) = (&compound[..i], &compound[i + 1..]);
        if left.is_empty() || right.is_empty() {
            return None;
        }
        Some(match topology {
            Topology::ServiceFirst => SlugPair {
                service: right,
                city: left,
            },
            Topology::LocationFirst => SlugPair {
                service: left,
                city: right,
            },
        })
    })
}

/// Kebab-case check: lowercase ASCII letters and digits in hyphen-separated
/// runs, no leading, trailing or doubled hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.split('-').all(|part| {
            !part.is_empty()
                && part
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

/// Readable label for a slug: `water-damage-repair` → "Water Damage Repair".
pub fn display_title(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
