//! Runtime route resolution.
//!
//! Maps a request path back to a page without anything materialized on disk.
//! The route shape selects the topology and the parent directory supplies the
//! anchor token, so decomposition is a single exact-length suffix strip:
//!
//! ```text
//! /services/{service}/{compound}/           anchor = service, compound = {city}-{service}
//! /locations/{state}/{city}/{compound}/     anchor = city,    compound = {service}-{city}
//! ```
//!
//! Anything that does not decompose or join cleanly is [`Resolution::NotFound`].
//! Resolution only reads the catalog, so it is safe to call from any number of
//! request handlers at once.

use crate::catalog::Catalog;
use crate::config::SiteInfo;
use crate::page::{self, PageContext};
use crate::slug::{self, Topology};

/// A request path matched against one of the two page shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Service {
        service: &'a str,
        compound: &'a str,
    },
    Location {
        state: &'a str,
        city: &'a str,
        compound: &'a str,
    },
}

impl Route<'_> {
    pub fn topology(&self) -> Topology {
        match self {
            Route::Service { .. } => Topology::ServiceFirst,
            Route::Location { .. } => Topology::LocationFirst,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(Box<PageContext>),
    NotFound,
}

/// Match a path against the page shapes.
///
/// Accepts the path with or without a trailing slash or a trailing
/// `/index.html` segment. `index.html` glued onto another segment is not a
/// route.
pub fn parse_route(path: &str) -> Option<Route<'_>> {
    let path = match path.strip_suffix("index.html") {
        Some(rest) if rest.is_empty() || rest.ends_with('/') => rest,
        Some(_) => return None,
        None => path,
    };
    let trimmed = path.trim_matches('/');
    let segments: Vec<&str> = trimmed.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }

    match segments[..] {
        ["services", service, compound] => Some(Route::Service { service, compound }),
        ["locations", state, city, compound] => Some(Route::Location {
            state,
            city,
            compound,
        }),
        _ => None,
    }
}

/// Resolve a request path to its page.
pub fn resolve(catalog: &Catalog, site: &SiteInfo, path: &str) -> Resolution {
    match resolve_route(catalog, site, path) {
        Some(page) => Resolution::Found(Box::new(page)),
        None => Resolution::NotFound,
    }
}

fn resolve_route(catalog: &Catalog, site: &SiteInfo, path: &str) -> Option<PageContext> {
    let route = parse_route(path)?;
    let topology = route.topology();
    let (pair, state) = match route {
        Route::Service { service, compound } => {
            (slug::split_anchored(compound, topology, service)?, None)
        }
        Route::Location {
            state,
            city,
            compound,
        } => (slug::split_anchored(compound, topology, city)?, Some(state)),
    };

    let joined = catalog.join(pair.service, pair.city).ok()?;
    if state.is_some_and(|s| s != joined.state_slug) {
        return None;
    }
    Some(page::build(&joined, topology, site))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::enumerate;
    use crate::test_helpers::*;
    use crate::types::{LocationTables, ServiceTable};

    fn found(resolution: Resolution) -> PageContext {
        match resolution {
            Resolution::Found(page) => *page,
            Resolution::NotFound => panic!("expected a page, got NotFound"),
        }
    }

    #[test]
    fn parse_service_route() {
        assert_eq!(
            parse_route("/services/drywall-repair/frederick-drywall-repair/"),
            Some(Route::Service {
                service: "drywall-repair",
                compound: "frederick-drywall-repair",
            })
        );
    }

    #[test]
    fn parse_location_route_with_index_html() {
        assert_eq!(
            parse_route("/locations/maryland/frederick/drywall-repair-frederick/index.html"),
            Some(Route::Location {
                state: "maryland",
                city: "frederick",
                compound: "drywall-repair-frederick",
            })
        );
    }

    #[test]
    fn parse_relative_output_path() {
        assert_eq!(
            parse_route("services/drywall-repair/frederick-drywall-repair/index.html"),
            Some(Route::Service {
                service: "drywall-repair",
                compound: "frederick-drywall-repair",
            })
        );
    }

    #[test]
    fn index_html_must_be_its_own_segment() {
        assert_eq!(
            parse_route("/services/drywall-repair/frederick-drywall-repairindex.html"),
            None
        );
        assert_eq!(
            resolve(
                &sample_catalog(),
                &SiteInfo::default(),
                "/services/drywall-repair/frederick-drywall-repairindex.html"
            ),
            Resolution::NotFound
        );
    }

    #[test]
    fn parse_rejects_other_shapes() {
        assert_eq!(parse_route("/"), None);
        assert_eq!(parse_route("/services/drywall-repair/"), None);
        assert_eq!(parse_route("/services//frederick-drywall-repair"), None);
        assert_eq!(parse_route("/blog/a/b"), None);
        assert_eq!(parse_route("/locations/maryland/frederick/x/y"), None);
    }

    #[test]
    fn every_enumerated_page_resolves() {
        let catalog = sample_catalog();
        let site = SiteInfo::default();
        for record in enumerate(&catalog) {
            let page = found(resolve(&catalog, &site, &record.url_path()));
            assert_eq!(page.topology, record.topology);
            assert_eq!(page.facts.service_slug, record.service);
            assert_eq!(page.facts.city_slug, record.city);
            assert_eq!(page.url_path, record.url_path());
        }
    }

    #[test]
    fn trailing_slash_optional() {
        let catalog = sample_catalog();
        let site = SiteInfo::default();
        let page = found(resolve(
            &catalog,
            &site,
            "/services/drywall-repair/frederick-drywall-repair",
        ));
        assert_eq!(page.facts.city_name, "Frederick");
    }

    #[test]
    fn cross_topology_content_is_equal() {
        let catalog = sample_catalog();
        let site = SiteInfo::default();
        let a = found(resolve(
            &catalog,
            &site,
            "/services/drywall-repair/frederick-drywall-repair",
        ));
        let b = found(resolve(
            &catalog,
            &site,
            "/locations/maryland/frederick/drywall-repair-frederick",
        ));
        assert_eq!(a.facts, b.facts);
        assert_eq!(a.facts.state_name, "Maryland");
        assert_ne!(a.breadcrumbs, b.breadcrumbs);
    }

    #[test]
    fn unknown_entities_are_not_found() {
        let catalog = sample_catalog();
        let site = SiteInfo::default();
        for path in [
            "/services/plumbing/frederick-plumbing/",
            "/services/drywall-repair/baltimore-drywall-repair/",
            "/locations/maryland/baltimore/drywall-repair-baltimore/",
            "/locations/maryland/frederick/plumbing-frederick/",
        ] {
            assert_eq!(resolve(&catalog, &site, path), Resolution::NotFound, "{path}");
        }
    }

    #[test]
    fn compound_must_end_with_directory_token() {
        let catalog = sample_catalog();
        let site = SiteInfo::default();
        // Valid pair, but filed under the wrong service directory
        assert_eq!(
            resolve(
                &catalog,
                &site,
                "/services/interior-painting/frederick-drywall-repair/"
            ),
            Resolution::NotFound
        );
        // Compound in location-first order under a service-first route
        assert_eq!(
            resolve(
                &catalog,
                &site,
                "/services/drywall-repair/drywall-repair-frederick/"
            ),
            Resolution::NotFound
        );
    }

    #[test]
    fn wrong_state_segment_is_not_found() {
        let catalog = sample_catalog();
        let site = SiteInfo::default();
        assert_eq!(
            resolve(
                &catalog,
                &site,
                "/locations/west-virginia/frederick/drywall-repair-frederick/"
            ),
            Resolution::NotFound
        );
    }

    #[test]
    fn anchor_embedded_in_other_token_resolves_exactly() {
        // The city slug contains the service slug; stripping by substring
        // replacement would recover "bay-town".
        let mut services = ServiceTable::new();
        services.insert("repair".to_string(), sample_service("Repair"));
        let mut locations = LocationTables::default();
        locations.states.insert(
            "maryland".to_string(),
            sample_state("Maryland", "MD", &["bay-repair-town"]),
        );
        locations.cities.insert(
            "bay-repair-town".to_string(),
            sample_city("Bay Repair Town", "maryland"),
        );
        let catalog = Catalog::from_tables(services, locations);
        catalog.validate().unwrap();

        let site = SiteInfo::default();
        let page = found(resolve(
            &catalog,
            &site,
            "/services/repair/bay-repair-town-repair/",
        ));
        assert_eq!(page.facts.city_slug, "bay-repair-town");

        let page = found(resolve(
            &catalog,
            &site,
            "/locations/maryland/bay-repair-town/repair-bay-repair-town/",
        ));
        assert_eq!(page.facts.service_slug, "repair");
    }

    #[test]
    fn dangling_state_is_not_found() {
        let (services, mut locations) = sample_tables();
        locations.cities.get_mut("martinsburg").unwrap().state = "virginia".to_string();
        let catalog = Catalog::from_tables(services, locations);
        assert_eq!(
            resolve(
                &catalog,
                &SiteInfo::default(),
                "/services/drywall-repair/martinsburg-drywall-repair/"
            ),
            Resolution::NotFound
        );
    }
}
