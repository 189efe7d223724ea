//! # Service Pages
//!
//! Generates one landing page for every (service, city) pair a home repair
//! business covers, under two URL layouts at once:
//!
//! ```text
//! /services/{service}/{city}-{service}/               service-first
//! /locations/{state}/{city}/{service}-{city}/         location-first
//! ```
//!
//! The same pages can be written to disk as static files or resolved per
//! request by a small HTTP server. Both front ends go through one join and one
//! page builder, so a pair renders identical content under either layout.
//!
//! # Pipeline
//!
//! ```text
//! data/services.json ─┐
//! data/locations.json ┼─ Catalog::load ─ enumerate ─ materialize ─ dist/
//! data/config.toml ───┘        │
//!                              └──────── resolve ─── serve (HTTP)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Serde records for services, states and cities |
//! | [`catalog`] | Loads the data files, validates integrity, joins a pair to its records |
//! | [`slug`] | Compound slug codec: compose, anchored split, vocabulary decompose |
//! | [`enumerate`] | Lazy, deterministic page set over both topologies |
//! | [`page`] | Topology-independent page facts plus per-topology URL and breadcrumbs |
//! | [`render`] | Maud HTML for pages and the not-found page |
//! | [`generate`] | Writes pages to disk, idempotently, with a `pages.json` manifest |
//! | [`resolve`] | Maps a request path back to its page |
//! | [`serve`] | Axum server over [`resolve`] |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting for the batch commands |
//!
//! # Design Decisions
//!
//! ## Exact-Length Anchored Splits
//!
//! A route always knows one half of its compound slug from the enclosing
//! directory. [`slug::split_anchored`] strips exactly that token plus its
//! hyphen from the end, so a city like `bay-repair-town` under the `repair`
//! service splits correctly where substring replacement would not.
//!
//! ## Validate Once, Then Trust
//!
//! Slug vocabularies must be disjoint and every compound must split back to
//! the pair it came from. [`catalog::Catalog::load`] checks this up front and
//! reports every problem together, so enumeration and resolution never meet
//! an ambiguous slug in practice.
//!
//! ## Deterministic Output
//!
//! Tables are `BTreeMap`s and rendering embeds nothing time-dependent.
//! Regenerating over unchanged data writes nothing and leaves `pages.json`
//! byte-identical.

pub mod catalog;
pub mod config;
pub mod enumerate;
pub mod generate;
pub mod output;
pub mod page;
pub mod render;
pub mod resolve;
pub mod serve;
pub mod slug;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
