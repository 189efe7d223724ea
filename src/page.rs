//! Page model shared by static generation and runtime resolution.
//!
//! [`build`] turns a joined (service, city, state) record into a
//! [`PageContext`]. The topology only changes the URL, the canonical link
//! and the breadcrumb trail; everything a visitor reads about the service in
//! that city lives in [`PageFacts`], which is identical for both topologies.

use crate::catalog::Joined;
use crate::config::SiteInfo;
use crate::enumerate::PageRecord;
use crate::slug::Topology;
use serde::Serialize;

/// Topology-independent content for one (service, city) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFacts {
    pub service_slug: String,
    pub service_name: String,
    pub short_description: String,
    /// Markdown
    pub long_description: String,
    pub price_range: String,
    pub timeline: String,
    pub warranty: String,
    pub process: Vec<String>,
    pub benefits: Vec<String>,

    pub city_slug: String,
    pub city_name: String,
    pub headquarters: bool,
    pub emergency_service: bool,
    pub response_time: String,
    pub population: String,
    pub neighborhoods: Vec<String>,
    pub zip_codes: Vec<String>,

    pub state_slug: String,
    pub state_name: String,
    pub state_abbreviation: String,
}

impl PageFacts {
    pub fn from_joined(joined: &Joined<'_>) -> Self {
        let Joined {
            service,
            city,
            state,
            ..
        } = joined;
        Self {
            service_slug: joined.service_slug.to_string(),
            service_name: service.name.clone(),
            short_description: service.short_description.clone(),
            long_description: service.long_description.clone(),
            price_range: service.price_range.clone(),
            timeline: service.timeline.clone(),
            warranty: service.warranty.clone(),
            process: service.process.clone(),
            benefits: service.benefits.clone(),
            city_slug: joined.city_slug.to_string(),
            city_name: city.name.clone(),
            headquarters: city.headquarters,
            emergency_service: city.emergency_service,
            response_time: city.response_time.clone(),
            population: city.population.clone(),
            neighborhoods: city.neighborhoods.clone().unwrap_or_default(),
            zip_codes: city.zip_codes.clone().unwrap_or_default(),
            state_slug: joined.state_slug.to_string(),
            state_name: state.name.clone(),
            state_abbreviation: state.abbreviation.clone(),
        }
    }

    /// "Drywall Repair in Frederick, MD"
    pub fn headline(&self) -> String {
        format!(
            "{} in {}, {}",
            self.service_name, self.city_name, self.state_abbreviation
        )
    }
}

/// One breadcrumb entry. The last entry (current page) has no link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub href: Option<String>,
}

impl Breadcrumb {
    fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: Some(href.into()),
        }
    }

    fn current(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: None,
        }
    }
}

/// Everything needed to render one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContext {
    pub topology: Topology,
    /// Site-absolute path with trailing slash
    pub url_path: String,
    pub canonical_url: String,
    pub title: String,
    pub meta_description: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub facts: PageFacts,
    pub site: SiteInfo,
}

/// Build the page for a joined record under the given topology.
pub fn build(joined: &Joined<'_>, topology: Topology, site: &SiteInfo) -> PageContext {
    let facts = PageFacts::from_joined(joined);
    let url_path = PageRecord {
        topology,
        service: joined.service_slug,
        city: joined.city_slug,
        state: joined.state_slug,
    }
    .url_path();

    let title = format!("{} | {}", facts.headline(), site.name);
    let meta_description = format!(
        "{}. {} {} response, {} warranty. Call {}.",
        facts.headline(),
        facts.short_description,
        facts.response_time,
        facts.warranty,
        site.phone
    );

    PageContext {
        topology,
        canonical_url: format!("{}{}", site.base_url, url_path),
        url_path,
        title,
        meta_description,
        breadcrumbs: breadcrumbs(&facts, topology),
        facts,
        site: site.clone(),
    }
}

fn breadcrumbs(facts: &PageFacts, topology: Topology) -> Vec<Breadcrumb> {
    match topology {
        Topology::ServiceFirst => vec![
            Breadcrumb::link("Home", "/"),
            Breadcrumb::link("Services", "/services/"),
            Breadcrumb::link(
                &facts.service_name,
                format!("/services/{}/", facts.service_slug),
            ),
            Breadcrumb::current(&facts.city_name),
        ],
        Topology::LocationFirst => vec![
            Breadcrumb::link("Home", "/"),
            Breadcrumb::link("Locations", "/locations/"),
            Breadcrumb::link(
                &facts.state_name,
                format!("/locations/{}/", facts.state_slug),
            ),
            Breadcrumb::link(
                &facts.city_name,
                format!("/locations/{}/{}/", facts.state_slug, facts.city_slug),
            ),
            Breadcrumb::current(&facts.service_name),
        ],
    }
}
