//! CLI output formatting for the batch commands.
//!
//! # Information-First Display
//!
//! Output leads with what an entity *is* (its display name and positional
//! index) and shows slugs and file paths as indented context lines. The check
//! output reads as an inventory of the catalog; generate output reads as a
//! list of URLs with their write status.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Services
//! 001 Drywall Repair
//!     Slug: drywall-repair
//!     $150-$500, 1-2 days, 3 Years warranty
//!
//! Locations
//! 001 Maryland (MD, 3 cities)
//!     001 Frederick [headquarters, emergency]
//!         Slug: frederick
//!
//! Pages
//!     9 service-first
//!     9 location-first
//!     18 total
//! ```
//!
//! ## Generate
//!
//! ```text
//! [001/030] /services/drywall-repair/frederick-drywall-repair/ → written
//! [002/030] /services/drywall-repair/hagerstown-drywall-repair/ → unchanged
//! [003/030] /locations/maryland/annapolis/drywall-repair-annapolis/ → FAILED
//!     unknown city 'annapolis'
//! Pruned services/old-service/frederick-old-service/index.html
//!
//! Generated 30 pages: 1 written, 28 unchanged, 1 failed, 1 pruned
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::catalog::{Catalog, IntegrityIssue};
use crate::enumerate::enumerate;
use crate::generate::{GenerateEvent, GenerateReport, WriteStatus};
use crate::slug::{self, Topology};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `[007/120]` progress counter, padded to the width of the total.
fn progress_counter(index: usize, total: usize) -> String {
    let width = total.to_string().len().max(3);
    format!("[{:0>width$}/{:0>width$}]", index, total, width = width)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the catalog inventory shown by `check`.
pub fn format_check_output(catalog: &Catalog) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Services".to_string());
    for (i, (service_slug, service)) in catalog.services().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), service.name));
        lines.push(format!("{}Slug: {}", indent(1), service_slug));
        lines.push(format!(
            "{}{}, {}, {} warranty",
            indent(1),
            service.price_range,
            service.timeline,
            service.warranty
        ));
    }

    lines.push(String::new());
    lines.push("Locations".to_string());
    for (i, (_, state)) in catalog.states().enumerate() {
        lines.push(format!(
            "{} {} ({}, {})",
            format_index(i + 1),
            state.name,
            state.abbreviation,
            plural(state.cities.len(), "city", "cities")
        ));
        for (j, city_slug) in state.cities.iter().enumerate() {
            let Some(city) = catalog.city(city_slug) else {
                lines.push(format!(
                    "{}{} {} (missing from cities)",
                    indent(1),
                    format_index(j + 1),
                    slug::display_title(city_slug)
                ));
                continue;
            };
            let mut flags = Vec::new();
            if city.headquarters {
                flags.push("headquarters");
            }
            if city.emergency_service {
                flags.push("emergency");
            }
            let marker = if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            };
            lines.push(format!(
                "{}{} {}{}",
                indent(1),
                format_index(j + 1),
                city.name,
                marker
            ));
            lines.push(format!("{}Slug: {}", indent(2), city_slug));
        }
    }

    let (service_first, location_first) =
        enumerate(catalog).fold((0, 0), |(s, l), record| match record.topology {
            Topology::ServiceFirst => (s + 1, l),
            Topology::LocationFirst => (s, l + 1),
        });
    lines.push(String::new());
    lines.push("Pages".to_string());
    lines.push(format!("{}{} service-first", indent(1), service_first));
    lines.push(format!("{}{} location-first", indent(1), location_first));
    lines.push(format!("{}{} total", indent(1), service_first + location_first));

    lines
}

/// Print the catalog inventory to stdout.
pub fn print_check_output(catalog: &Catalog) {
    for line in format_check_output(catalog) {
        println!("{}", line);
    }
}

/// Format integrity issues, one per line.
pub fn format_integrity_issues(issues: &[IntegrityIssue]) -> Vec<String> {
    let mut lines = vec![format!(
        "Found {}:",
        plural(issues.len(), "data integrity issue", "data integrity issues")
    )];
    lines.extend(issues.iter().map(|issue| format!("{}{}", indent(1), issue)));
    lines
}

/// Print integrity issues to stderr.
pub fn print_integrity_issues(issues: &[IntegrityIssue]) {
    for line in format_integrity_issues(issues) {
        eprintln!("{}", line);
    }
}

// ============================================================================
// List
// ============================================================================

/// Every URL path in enumeration order.
pub fn format_list_output(catalog: &Catalog) -> Vec<String> {
    enumerate(catalog).map(|record| record.url_path()).collect()
}

pub fn print_list_output(catalog: &Catalog) {
    for line in format_list_output(catalog) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format a single generate progress event as display lines.
pub fn format_generate_event(event: &GenerateEvent) -> Vec<String> {
    match event {
        GenerateEvent::Started { total } => {
            vec![format!("Generating {}", plural(*total, "page", "pages"))]
        }
        GenerateEvent::PageWritten {
            index,
            total,
            url_path,
            status,
        } => {
            let status = match status {
                WriteStatus::Written => "written",
                WriteStatus::Unchanged => "unchanged",
            };
            vec![format!(
                "{} {} \u{2192} {}",
                progress_counter(*index, *total),
                url_path,
                status
            )]
        }
        GenerateEvent::PageFailed {
            index,
            total,
            url_path,
            error,
        } => vec![
            format!(
                "{} {} \u{2192} FAILED",
                progress_counter(*index, *total),
                url_path
            ),
            format!("{}{}", indent(1), error),
        ],
        GenerateEvent::Pruned { path } => vec![format!("Pruned {}", path)],
    }
}

/// Format the closing summary of a generate run.
pub fn format_generate_summary(report: &GenerateReport) -> Vec<String> {
    let mut parts = vec![
        format!("{} written", report.written),
        format!("{} unchanged", report.unchanged),
    ];
    if !report.failures.is_empty() {
        parts.push(format!("{} failed", report.failures.len()));
    }
    if report.pruned > 0 {
        parts.push(format!("{} pruned", report.pruned));
    }

    let mut lines = vec![
        String::new(),
        format!(
            "Generated {}: {}",
            plural(report.total(), "page", "pages"),
            parts.join(", ")
        ),
    ];
    if !report.failures.is_empty() {
        lines.push("Failed pages:".to_string());
        for failure in &report.failures {
            lines.push(format!(
                "{}{} ({})",
                indent(1),
                failure.url_path,
                failure.error
            ));
        }
    }
    lines
}

pub fn print_generate_summary(report: &GenerateReport) {
    for line in format_generate_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::JoinError;
    use crate::generate::PageFailure;
    use crate::test_helpers::*;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_single_digit() {
        assert_eq!(format_index(1), "001");
    }

    #[test]
    fn format_index_triple_digit() {
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn progress_counter_pads_to_three() {
        assert_eq!(progress_counter(7, 30), "[007/030]");
    }

    #[test]
    fn progress_counter_widens_for_large_totals() {
        assert_eq!(progress_counter(42, 1200), "[0042/1200]");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "city", "cities"), "1 city");
        assert_eq!(plural(0, "city", "cities"), "0 cities");
    }

    // =========================================================================
    // Check / list tests
    // =========================================================================

    #[test]
    fn check_output_lists_services_and_locations() {
        let lines = format_check_output(&sample_catalog());
        assert_eq!(lines[0], "Services");
        assert_eq!(lines[1], "001 Drywall Repair");
        assert_eq!(lines[2], "    Slug: drywall-repair");
        assert_eq!(lines[3], "    $150-$500, 1-2 days, 3 Years warranty");
        assert!(lines.contains(&"001 Maryland (MD, 3 cities)".to_string()));
        assert!(lines.contains(&"    001 Frederick [headquarters, emergency]".to_string()));
        assert!(lines.contains(&"    002 Hagerstown".to_string()));
        assert!(lines.contains(&"002 West Virginia (WV, 1 city)".to_string()));
    }

    #[test]
    fn check_output_counts_pages() {
        let catalog = sample_catalog();
        let lines = format_check_output(&catalog);
        let per_topology = catalog.service_count() * catalog.city_count();
        assert!(lines.contains(&format!("    {} service-first", per_topology)));
        assert!(lines.contains(&format!("    {} location-first", per_topology)));
        assert_eq!(
            lines.last().unwrap(),
            &format!("    {} total", 2 * per_topology)
        );
    }

    #[test]
    fn check_output_marks_dangling_listing() {
        let (services, mut locations) = sample_tables();
        locations
            .states
            .get_mut("west-virginia")
            .unwrap()
            .cities
            .push("charles-town".to_string());
        let catalog = Catalog::from_tables(services, locations);
        let lines = format_check_output(&catalog);
        assert!(lines.contains(&"    002 Charles Town (missing from cities)".to_string()));
    }

    #[test]
    fn integrity_issues_one_per_line() {
        let issues = vec![
            IntegrityIssue::SharedSlug {
                slug: "frederick".to_string(),
            },
            IntegrityIssue::CityNotListed {
                city: "hagerstown".to_string(),
                state: "maryland".to_string(),
            },
        ];
        let lines = format_integrity_issues(&issues);
        assert_eq!(lines[0], "Found 2 data integrity issues:");
        assert_eq!(
            lines[1],
            "    'frederick' is both a service slug and a city slug"
        );
        assert_eq!(
            lines[2],
            "    city 'hagerstown' is not listed by its state 'maryland'"
        );
    }

    #[test]
    fn list_output_is_enumeration_order() {
        let catalog = sample_catalog();
        let lines = format_list_output(&catalog);
        assert_eq!(lines.len(), enumerate(&catalog).count());
        assert_eq!(lines[0], "/services/drywall-repair/frederick-drywall-repair/");
        assert!(lines.last().unwrap().starts_with("/locations/west-virginia/"));
    }

    // =========================================================================
    // Generate event formatting tests
    // =========================================================================

    #[test]
    fn format_started() {
        let lines = format_generate_event(&GenerateEvent::Started { total: 30 });
        assert_eq!(lines, vec!["Generating 30 pages"]);
    }

    #[test]
    fn format_page_written() {
        let event = GenerateEvent::PageWritten {
            index: 1,
            total: 30,
            url_path: "/services/drywall-repair/frederick-drywall-repair/".to_string(),
            status: WriteStatus::Written,
        };
        assert_eq!(
            format_generate_event(&event),
            vec!["[001/030] /services/drywall-repair/frederick-drywall-repair/ \u{2192} written"]
        );
    }

    #[test]
    fn format_page_unchanged() {
        let event = GenerateEvent::PageWritten {
            index: 12,
            total: 30,
            url_path: "/locations/maryland/frederick/drywall-repair-frederick/".to_string(),
            status: WriteStatus::Unchanged,
        };
        assert!(format_generate_event(&event)[0].ends_with("\u{2192} unchanged"));
    }

    #[test]
    fn format_page_failed() {
        let event = GenerateEvent::PageFailed {
            index: 3,
            total: 30,
            url_path: "/locations/maryland/annapolis/drywall-repair-annapolis/".to_string(),
            error: "unknown city 'annapolis'".to_string(),
        };
        let lines = format_generate_event(&event);
        assert_eq!(
            lines[0],
            "[003/030] /locations/maryland/annapolis/drywall-repair-annapolis/ \u{2192} FAILED"
        );
        assert_eq!(lines[1], "    unknown city 'annapolis'");
    }

    #[test]
    fn summary_without_failures() {
        let report = GenerateReport {
            written: 2,
            unchanged: 28,
            ..GenerateReport::default()
        };
        let lines = format_generate_summary(&report);
        assert_eq!(lines[1], "Generated 30 pages: 2 written, 28 unchanged");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn summary_with_failures_and_pruning() {
        let report = GenerateReport {
            written: 28,
            unchanged: 0,
            pruned: 1,
            failures: vec![PageFailure {
                url_path: "/locations/maryland/annapolis/drywall-repair-annapolis/".to_string(),
                topology: Topology::LocationFirst,
                service: "drywall-repair".to_string(),
                city: "annapolis".to_string(),
                error: JoinError::UnknownCity("annapolis".to_string()),
            }],
            ..GenerateReport::default()
        };
        let lines = format_generate_summary(&report);
        assert_eq!(
            lines[1],
            "Generated 29 pages: 28 written, 0 unchanged, 1 failed, 1 pruned"
        );
        assert_eq!(lines[2], "Failed pages:");
        assert_eq!(
            lines[3],
            "    /locations/maryland/annapolis/drywall-repair-annapolis/ (unknown city 'annapolis')"
        );
    }
}
