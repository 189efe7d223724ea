//! Page-set enumeration.
//!
//! Produces one [`PageRecord`] per (service, city, topology). The sequence is
//! lazy, borrows everything from the catalog, and is a pure function of it:
//! calling [`enumerate`] twice over the same catalog yields the same records
//! in the same order.
//!
//! ## Order
//!
//! ```text
//! service-first   services (slug order) × cities (slug order)
//! location-first  states (slug order) × state's listed cities × services (slug order)
//! ```
//!
//! For a valid catalog the total is `2 × services × cities`.

use crate::catalog::Catalog;
use crate::slug::{self, Topology};
use std::path::PathBuf;

/// One page to generate or resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageRecord<'a> {
    pub topology: Topology,
    pub service: &'a str,
    pub city: &'a str,
    /// Parent state slug as referenced by the data. May dangle in an
    /// unvalidated catalog; the join reports it.
    pub state: &'a str,
}

impl PageRecord<'_> {
    /// The compound URL segment for this record.
    pub fn compound(&self) -> String {
        slug::compose(self.topology, self.service, self.city)
    }

    /// Site-absolute URL path with a trailing slash.
    pub fn url_path(&self) -> String {
        match self.topology {
            Topology::ServiceFirst => {
                format!("/services/{}/{}/", self.service, self.compound())
            }
            Topology::LocationFirst => {
                format!("/locations/{}/{}/{}/", self.state, self.city, self.compound())
            }
        }
    }

    /// Output file path relative to the output directory.
    pub fn output_path(&self) -> PathBuf {
        let dir = match self.topology {
            Topology::ServiceFirst => PathBuf::from("services").join(self.service),
            Topology::LocationFirst => PathBuf::from("locations")
                .join(self.state)
                .join(self.city),
        };
        dir.join(self.compound()).join("index.html")
    }
}

/// Every page record for the catalog, service-first pages first.
pub fn enumerate(catalog: &Catalog) -> impl Iterator<Item = PageRecord<'_>> {
    let service_first = catalog.services().flat_map(move |(service, _)| {
        catalog.cities().map(move |(city, record)| PageRecord {
            topology: Topology::ServiceFirst,
            service,
            city,
            state: record.state.as_str(),
        })
    });

    let location_first = catalog.states().flat_map(move |(state, record)| {
        record.cities.iter().flat_map(move |city| {
            catalog.services().map(move |(service, _)| PageRecord {
                topology: Topology::LocationFirst,
                service,
                city: city.as_str(),
                state,
            })
        })
    });

    service_first.chain(location_first)
}
