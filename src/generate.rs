//! Static page generation.
//!
//! Walks the page set from [`enumerate`](crate::enumerate::enumerate) and
//! writes one self-contained HTML file per record.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── pages.json                                   # Build manifest (path + SHA-256)
//! ├── services/
//! │   └── drywall-repair/
//! │       └── frederick-drywall-repair/
//! │           └── index.html
//! └── locations/
//!     └── maryland/
//!         └── frederick/
//!             └── drywall-repair-frederick/
//!                 └── index.html
//! ```
//!
//! ## Idempotence
//!
//! Rendering is a pure function of the catalog and config, so a rerun over
//! unchanged inputs produces byte-identical files. Files whose bytes already
//! match are left untouched and reported as unchanged.
//!
//! ## Failures
//!
//! A record whose join fails (dangling service, city or state reference) is
//! skipped and collected in [`GenerateReport::failures`]; the remaining
//! records are still written. IO errors abort the whole run. Any previous
//! file at a failed record's path is left in place rather than pruned, and is
//! left out of `pages.json`.
//!
//! ## Pruning
//!
//! With `generate.prune` enabled, page-shaped `index.html` files under
//! `services/` and `locations/` that are not part of the current page set are
//! deleted, together with directories left empty. Page-shaped means
//! `services/{service}/{city}-{service}/index.html` or
//! `locations/{state}/{city}/{service}-{city}/index.html`; listing pages and
//! anything else in those trees are left alone.

use crate::catalog::{Catalog, JoinError};
use crate::config::{SiteConfig, SiteInfo};
use crate::enumerate::{PageRecord, enumerate};
use crate::page;
use crate::render;
use crate::resolve::{self, Route};
use crate::slug::{self, Topology};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

/// Name of the build manifest within the output directory.
pub const MANIFEST_FILENAME: &str = "pages.json";

/// Output roots holding generated pages, with the walk depth of a page's
/// `index.html` below each root.
const PAGE_ROOTS: [(&str, usize); 2] = [("services", 3), ("locations", 4)];

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Why a single record could not be materialized.
#[derive(Error, Debug)]
pub enum MaterializeError {
    #[error(transparent)]
    Join(#[from] JoinError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Unchanged,
}

/// Progress events for CLI output. `index` is 1-based and strictly increasing.
#[derive(Debug, Clone)]
pub enum GenerateEvent {
    Started {
        total: usize,
    },
    PageWritten {
        index: usize,
        total: usize,
        url_path: String,
        status: WriteStatus,
    },
    PageFailed {
        index: usize,
        total: usize,
        url_path: String,
        error: String,
    },
    Pruned {
        path: String,
    },
}

/// A record that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub url_path: String,
    pub topology: Topology,
    pub service: String,
    pub city: String,
    pub error: JoinError,
}

/// One written page in `pages.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Output path relative to the output directory, `/`-separated
    pub path: String,
    pub url: String,
    pub topology: Topology,
    pub sha256: String,
}

/// Contents of `pages.json`, sorted by path.
///
/// Lists the pages written or confirmed unchanged by the last run. A record
/// that failed keeps whatever file an earlier run left at its path, and that
/// file is not listed here; [`GenerateReport::failures`] names those paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagesManifest {
    pub pages: Vec<ManifestEntry>,
}

impl PagesManifest {
    pub fn load(output_dir: &Path) -> Result<Self, GenerateError> {
        let content = fs::read_to_string(output_dir.join(MANIFEST_FILENAME))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, output_dir: &Path) -> Result<(), GenerateError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(output_dir.join(MANIFEST_FILENAME), json)?;
        Ok(())
    }
}

/// Outcome of a generation run.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub written: usize,
    pub unchanged: usize,
    pub pruned: usize,
    pub failures: Vec<PageFailure>,
    pub manifest: PagesManifest,
}

impl GenerateReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Records attempted, including failures.
    pub fn total(&self) -> usize {
        self.written + self.unchanged + self.failures.len()
    }
}

/// A materialized page.
#[derive(Debug, Clone)]
pub struct Materialized {
    pub entry: ManifestEntry,
    pub status: WriteStatus,
}

/// Output path of a record relative to the output directory, `/`-separated.
fn relative_path(record: &PageRecord<'_>) -> String {
    format!("{}index.html", record.url_path().trim_start_matches('/'))
}

/// Join, render and write a single record.
pub fn materialize(
    catalog: &Catalog,
    site: &SiteInfo,
    css: &str,
    record: &PageRecord<'_>,
    output_dir: &Path,
) -> Result<Materialized, MaterializeError> {
    let joined = catalog.join(record.service, record.city)?;
    let ctx = page::build(&joined, record.topology, site);
    let html = render::render_page(&ctx, css).into_string();

    let path = output_dir.join(record.output_path());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let status = write_if_changed(&path, html.as_bytes())?;

    Ok(Materialized {
        entry: ManifestEntry {
            path: relative_path(record),
            url: ctx.url_path,
            topology: record.topology,
            sha256: format!("{:x}", Sha256::digest(html.as_bytes())),
        },
        status,
    })
}

fn write_if_changed(path: &Path, bytes: &[u8]) -> io::Result<WriteStatus> {
    match fs::read(path) {
        Ok(existing) if existing == bytes => Ok(WriteStatus::Unchanged),
        _ => {
            fs::write(path, bytes)?;
            Ok(WriteStatus::Written)
        }
    }
}

/// Generate every page for the catalog into `output_dir`.
///
/// Returns `Err` only for IO problems. Records that fail to join are listed
/// in the report; callers must check [`GenerateReport::is_success`].
pub fn generate(
    catalog: &Catalog,
    config: &SiteConfig,
    output_dir: &Path,
    progress: Option<Sender<GenerateEvent>>,
) -> Result<GenerateReport, GenerateError> {
    let send = |event: GenerateEvent| {
        if let Some(tx) = &progress {
            tx.send(event).ok();
        }
    };

    fs::create_dir_all(output_dir)?;
    let css = render::stylesheet(&config.colors);
    let total = enumerate(catalog).count();
    send(GenerateEvent::Started { total });

    let mut report = GenerateReport::default();
    let mut keep: BTreeSet<String> = BTreeSet::new();

    for (i, record) in enumerate(catalog).enumerate() {
        let index = i + 1;
        let url_path = record.url_path();
        keep.insert(relative_path(&record));

        match materialize(catalog, &config.site, &css, &record, output_dir) {
            Ok(done) => {
                match done.status {
                    WriteStatus::Written => report.written += 1,
                    WriteStatus::Unchanged => report.unchanged += 1,
                }
                send(GenerateEvent::PageWritten {
                    index,
                    total,
                    url_path,
                    status: done.status,
                });
                report.manifest.pages.push(done.entry);
            }
            Err(MaterializeError::Join(error)) => {
                send(GenerateEvent::PageFailed {
                    index,
                    total,
                    url_path: url_path.clone(),
                    error: error.to_string(),
                });
                report.failures.push(PageFailure {
                    url_path,
                    topology: record.topology,
                    service: record.service.to_string(),
                    city: record.city.to_string(),
                    error,
                });
            }
            Err(MaterializeError::Io(e)) => return Err(e.into()),
        }
    }

    if config.generate.prune {
        for path in prune_stale(output_dir, &keep)? {
            report.pruned += 1;
            send(GenerateEvent::Pruned { path });
        }
    }

    report.manifest.pages.sort_by(|a, b| a.path.cmp(&b.path));
    report.manifest.save(output_dir)?;
    Ok(report)
}

/// Whether `rel` has the shape of a generated page: the compound directory
/// sits under its anchor and ends in `-{anchor}`. Listing pages such as
/// `services/index.html` or `services/{service}/index.html` never match.
fn is_page_path(rel: &str) -> bool {
    match resolve::parse_route(rel) {
        Some(Route::Service { service, compound }) => {
            slug::split_anchored(compound, Topology::ServiceFirst, service).is_some()
        }
        Some(Route::Location { city, compound, .. }) => {
            slug::split_anchored(compound, Topology::LocationFirst, city).is_some()
        }
        None => false,
    }
}

/// Remove page-shaped `index.html` files not in `keep`, then the directories
/// their removal left empty.
///
/// Returns the removed page paths, `/`-separated and sorted.
fn prune_stale(output_dir: &Path, keep: &BTreeSet<String>) -> Result<Vec<String>, GenerateError> {
    let mut stale = Vec::new();
    let mut removed = Vec::new();

    for (root, depth) in PAGE_ROOTS {
        let root_dir = output_dir.join(root);
        if !root_dir.is_dir() {
            continue;
        }

        let walker = WalkDir::new(&root_dir)
            .min_depth(depth)
            .max_depth(depth)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || entry.file_name() != "index.html" {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(output_dir)
                .unwrap_or(entry.path())
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if !keep.contains(&rel) && is_page_path(&rel) {
                stale.push((entry.into_path(), rel));
            }
        }
    }

    for (path, rel) in stale {
        fs::remove_file(&path)?;
        remove_empty_parents(&path, output_dir)?;
        removed.push(rel);
    }

    removed.sort();
    Ok(removed)
}

/// Walk up from a removed file, deleting directories until one is non-empty
/// or the output directory is reached.
fn remove_empty_parents(file: &Path, output_dir: &Path) -> io::Result<()> {
    let mut dir = file.parent();
    while let Some(current) = dir {
        if current == output_dir || fs::read_dir(current)?.next().is_some() {
            break;
        }
        fs::remove_dir(current)?;
        dir = current.parent();
    }
    Ok(())
}
