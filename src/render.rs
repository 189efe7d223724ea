//! HTML rendering.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating;
//! all interpolation is escaped. The stylesheet is embedded at compile time
//! and inlined into every page, so each generated file is self-contained.
//!
//! Output depends only on its inputs. No timestamps, build ids or random
//! values are rendered, which keeps regenerated files byte-identical.

use crate::config::{self, ColorConfig, SiteInfo};
use crate::page::{Breadcrumb, PageContext};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Full stylesheet: color variables from config followed by the static rules.
pub fn stylesheet(colors: &ColorConfig) -> String {
    format!("{}\n\n{}", config::generate_color_css(colors), CSS_STATIC)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    title: &str,
    description: Option<&str>,
    canonical: Option<&str>,
    css: &str,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @if let Some(description) = description {
                    meta name="description" content=(description);
                }
                @if let Some(canonical) = canonical {
                    link rel="canonical" href=(canonical);
                }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header with business name, phone and breadcrumb trail
fn site_header(site: &SiteInfo, breadcrumbs: &[Breadcrumb]) -> Markup {
    html! {
        header.site-header {
            a.site-name href="/" { (site.name) }
            a.site-phone href=(tel_href(&site.phone)) { (site.phone) }
        }
        @if !breadcrumbs.is_empty() {
            nav.breadcrumb aria-label="Breadcrumb" {
                @for (idx, crumb) in breadcrumbs.iter().enumerate() {
                    @if idx > 0 { " › " }
                    @match &crumb.href {
                        Some(href) => a href=(href) { (crumb.label) },
                        None => span aria-current="page" { (crumb.label) },
                    }
                }
            }
        }
    }
}

fn site_footer(site: &SiteInfo) -> Markup {
    html! {
        footer.site-footer {
            p { (site.name) " · " (site.phone) }
        }
    }
}

/// `tel:` link target: digits and a leading plus only.
fn tel_href(phone: &str) -> String {
    let digits: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    format!("tel:{digits}")
}

fn markdown(source: &str) -> PreEscaped<String> {
    let parser = Parser::new(source);
    let mut body = String::new();
    md_html::push_html(&mut body, parser);
    PreEscaped(body)
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders a service × city landing page
pub fn render_page(page: &PageContext, css: &str) -> Markup {
    let facts = &page.facts;
    let site = &page.site;

    let content = html! {
        (site_header(site, &page.breadcrumbs))
        main.service-page {
            header.page-header {
                h1 { (facts.headline()) }
                p.lead { (facts.short_description) }
            }

            @if facts.headquarters {
                aside.hq-banner {
                    strong { "Headquartered in " (facts.city_name) "." }
                    " Our crews start the day here, so "
                    (facts.city_name)
                    " customers get priority scheduling."
                }
            }
            @if facts.emergency_service {
                p.emergency {
                    "24/7 emergency " (facts.service_name.to_lowercase())
                    " available in " (facts.city_name) ". Call " (site.phone) "."
                }
            }

            section.intro {
                (markdown(&facts.long_description))
            }

            section.facts {
                h2 { "At a glance" }
                dl {
                    dt { "Price range" } dd { (facts.price_range) }
                    dt { "Timeline" } dd { (facts.timeline) }
                    dt { "Warranty" } dd { (facts.warranty) }
                    dt { "Response time in " (facts.city_name) } dd { (facts.response_time) }
                }
            }

            @if !facts.benefits.is_empty() {
                section.benefits {
                    h2 { "Why " (facts.city_name) " homeowners choose us" }
                    ul {
                        @for benefit in &facts.benefits {
                            li { (benefit) }
                        }
                    }
                }
            }

            @if !facts.process.is_empty() {
                section.process {
                    h2 { "Our " (facts.service_name.to_lowercase()) " process" }
                    ol {
                        @for step in &facts.process {
                            li { (step) }
                        }
                    }
                }
            }

            @if !facts.neighborhoods.is_empty() {
                section.neighborhoods {
                    h2 { "Neighborhoods we serve in " (facts.city_name) }
                    ul {
                        @for neighborhood in &facts.neighborhoods {
                            li { (neighborhood) }
                        }
                    }
                }
            }

            @if !facts.zip_codes.is_empty() {
                p.zip-codes {
                    "Serving ZIP codes " (facts.zip_codes.join(", "))
                    " in " (facts.city_name) ", " (facts.state_name) "."
                }
            }

            section.cta {
                h2 { "Get a free estimate in " (facts.city_name) }
                a.button href=(site.contact_path) { "Request an estimate" }
                " or call "
                a href=(tel_href(&site.phone)) { (site.phone) }
            }
        }
        (site_footer(site))
    };

    base_document(
        &page.title,
        Some(page.meta_description.as_str()),
        Some(page.canonical_url.as_str()),
        css,
        content,
    )
}

/// Renders the generic not-found page
pub fn render_not_found(site: &SiteInfo, css: &str) -> Markup {
    let content = html! {
        (site_header(site, &[]))
        main.not-found {
            h1 { "Page not found" }
            p { "We couldn't find that service area page." }
            p { a href="/services/" { "Browse all services" } }
        }
        (site_footer(site))
    };

    base_document(&format!("Page not found | {}", site.name), None, None, css, content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page;
    use crate::slug::Topology;
    use crate::test_helpers::*;

    fn render(service: &str, city: &str, topology: Topology) -> String {
        let catalog = sample_catalog();
        let joined = catalog.join(service, city).unwrap();
        let ctx = page::build(&joined, topology, &SiteInfo::default());
        render_page(&ctx, "").into_string()
    }

    #[test]
    fn base_document_includes_doctype() {
        let content = html! { p { "test" } };
        let doc = base_document("Test", None, None, "body {}", content).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Test</title>"));
    }

    #[test]
    fn page_embeds_joined_facts() {
        let html = render("drywall-repair", "frederick", Topology::ServiceFirst);
        assert!(html.contains("<h1>Drywall Repair in Frederick, MD</h1>"));
        assert!(html.contains("$150-$500"));
        assert!(html.contains("3 Years"));
        assert!(html.contains("Same-day"));
        assert!(html.contains("Invisible seams"));
        assert!(html.contains("<ol><li>Inspect the damage</li>"));
    }

    #[test]
    fn headquarters_banner_only_for_headquarters() {
        let hq = render("drywall-repair", "frederick", Topology::ServiceFirst);
        assert!(hq.contains("hq-banner"));
        assert!(hq.contains("Headquartered in Frederick"));

        let other = render("drywall-repair", "hagerstown", Topology::ServiceFirst);
        assert!(!other.contains("hq-banner"));
    }

    #[test]
    fn emergency_note_follows_flag() {
        let frederick = render("drywall-repair", "frederick", Topology::LocationFirst);
        assert!(frederick.contains("24/7 emergency drywall repair"));

        let martinsburg = render("drywall-repair", "martinsburg", Topology::LocationFirst);
        assert!(!martinsburg.contains("24/7 emergency"));
    }

    #[test]
    fn neighborhoods_and_zip_codes_when_present() {
        let frederick = render("interior-painting", "frederick", Topology::ServiceFirst);
        assert!(frederick.contains("Neighborhoods we serve in Frederick"));
        assert!(frederick.contains("<li>Baker Park</li>"));
        assert!(frederick.contains("21701, 21702"));

        let mount_airy = render("interior-painting", "mount-airy", Topology::ServiceFirst);
        assert!(!mount_airy.contains("Neighborhoods we serve"));
        assert!(!mount_airy.contains("ZIP codes"));
    }

    #[test]
    fn long_description_rendered_as_markdown() {
        let html = render("water-damage-repair", "hagerstown", Topology::ServiceFirst);
        assert!(html.contains("<strong>Water Damage Repair</strong>"));
    }

    #[test]
    fn breadcrumb_current_item_is_not_a_link() {
        let html = render("drywall-repair", "frederick", Topology::LocationFirst);
        assert!(html.contains(r#"<a href="/locations/maryland/">Maryland</a>"#));
        assert!(html.contains(r#"<span aria-current="page">Drywall Repair</span>"#));
    }

    #[test]
    fn meta_and_canonical_in_head() {
        let html = render("drywall-repair", "frederick", Topology::ServiceFirst);
        assert!(html.contains(r#"<meta name="description""#));
        let canonical = "https://www.example.com/services/drywall-repair/frederick-drywall-repair/";
        assert!(html.contains(&format!(r#"<link rel="canonical" href="{canonical}">"#)));
    }

    #[test]
    fn call_to_action_uses_site_info() {
        let html = render("drywall-repair", "frederick", Topology::ServiceFirst);
        assert!(html.contains(r#"href="/contact/""#));
        assert!(html.contains(r#"href="tel:5555550100""#));
    }

    #[test]
    fn not_found_links_to_services_index() {
        let html = render_not_found(&SiteInfo::default(), "").into_string();
        assert!(html.contains("Page not found"));
        assert!(html.contains(r#"href="/services/""#));
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = render("drywall-repair", "frederick", Topology::ServiceFirst);
        let b = render("drywall-repair", "frederick", Topology::ServiceFirst);
        assert_eq!(a, b);
    }

    #[test]
    fn stylesheet_prepends_color_variables() {
        let css = stylesheet(&ColorConfig::default());
        assert!(css.starts_with(":root {"));
        assert!(css.contains("--color-accent"));
    }

    #[test]
    fn html_escape_in_maud() {
        let mut ctx = {
            let catalog = sample_catalog();
            let joined = catalog.join("drywall-repair", "frederick").unwrap();
            page::build(&joined, Topology::ServiceFirst, &SiteInfo::default())
        };
        ctx.facts.city_name = "<script>alert('xss')</script>".to_string();
        let html = render_page(&ctx, "").into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
