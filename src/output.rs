//! CLI output formatting for every command.
//!
//! Output is information-first: each line leads with a positional index and
//! the page's human identity (its title or slug pair), with file paths as
//! secondary context.
//!
//! ```text
//! Service pages
//! 001 web-design/faro
//! 002 web-design/lagos
//!
//! Industry pages
//! 001 hotelaria/faro
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::catalog::Catalog;
use crate::paths::PageKey;
use crate::site::{BuildReport, CheckReport, Issue};
use std::collections::BTreeSet;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn pair(key: &PageKey) -> String {
    match key {
        PageKey::Service(p) => format!("{}/{}", p.service, p.location),
        PageKey::Industry(p) => format!("{}/{}", p.industry, p.location),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// paths
// ============================================================================

pub fn format_paths_output(keys: &[PageKey]) -> Vec<String> {
    let services: Vec<&PageKey> = keys
        .iter()
        .filter(|k| matches!(k, PageKey::Service(_)))
        .collect();
    let industries: Vec<&PageKey> = keys
        .iter()
        .filter(|k| matches!(k, PageKey::Industry(_)))
        .collect();

    let mut lines = vec!["Service pages".to_string()];
    lines.extend(
        services
            .iter()
            .enumerate()
            .map(|(i, k)| format!("{} {}", format_index(i + 1), pair(k))),
    );
    if !industries.is_empty() {
        lines.push(String::new());
        lines.push("Industry pages".to_string());
        lines.extend(
            industries
                .iter()
                .enumerate()
                .map(|(i, k)| format!("{} {}", format_index(i + 1), pair(k))),
        );
    }
    lines.push(String::new());
    lines.push(format!(
        "{}, {}",
        plural(services.len(), "service page", "service pages"),
        plural(industries.len(), "industry page", "industry pages")
    ));
    lines
}

pub fn print_paths_output(keys: &[PageKey]) {
    for line in format_paths_output(keys) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

pub fn format_catalog_summary(catalog: &Catalog) -> Vec<String> {
    let regions: BTreeSet<&str> = catalog
        .locations()
        .iter()
        .map(|l| l.region.as_str())
        .collect();
    let without_templates = catalog
        .services()
        .iter()
        .filter(|s| s.seo.is_none())
        .count();

    let mut lines = vec!["Catalog".to_string()];
    let mut services = format!(
        "{}{}",
        indent(1),
        plural(catalog.services().len(), "service", "services")
    );
    if without_templates > 0 {
        services.push_str(&format!(" ({without_templates} using generic copy)"));
    }
    lines.push(services);
    lines.push(format!(
        "{}{} in {}",
        indent(1),
        plural(catalog.locations().len(), "location", "locations"),
        plural(regions.len(), "region", "regions")
    ));
    lines.push(format!(
        "{}{}",
        indent(1),
        plural(catalog.industries().len(), "industry", "industries")
    ));
    lines
}

fn format_issue(issue: &Issue) -> Vec<String> {
    match issue {
        Issue::Unresolvable(key, e) => vec![format!("Unresolvable {}: {}", pair(key), e)],
        Issue::EmptyHero(key) => vec![format!("Empty hero: {}", pair(key))],
        Issue::EmptyIntro(key) => vec![format!("Empty intro: {}", pair(key))],
        Issue::DuplicateTitle { title, pages } => {
            let mut lines = vec![format!("Duplicate title: {title}")];
            lines.extend(pages.iter().map(|k| format!("{}{}", indent(1), pair(k))));
            lines
        }
        Issue::DuplicateDescription { description, pages } => {
            let mut lines = vec![format!("Duplicate description: {description}")];
            lines.extend(pages.iter().map(|k| format!("{}{}", indent(1), pair(k))));
            lines
        }
    }
}

pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();
    for issue in &report.issues {
        lines.extend(format_issue(issue));
    }
    lines.push(format!(
        "Checked {}, {}",
        plural(report.pages, "page", "pages"),
        plural(report.issues.len(), "issue", "issues")
    ));
    lines
}

pub fn print_check_output(catalog: &Catalog, report: &CheckReport) {
    for line in format_catalog_summary(catalog)
        .into_iter()
        .chain(format_check_output(report))
    {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .pages
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "{} {} → {}",
                format_index(i + 1),
                p.title,
                p.file.display()
            )
        })
        .collect();
    lines.push(format!("Sitemap → {}", report.sitemap.display()));
    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}",
        plural(report.service_pages(), "service page", "service pages"),
        plural(report.industry_pages(), "industry page", "industry pages")
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::PageError;
    use crate::paths::{ServicePath, all_pages};
    use crate::site::BuiltPage;
    use crate::test_helpers::*;
    use std::path::PathBuf;

    fn key(service: &str, location: &str) -> PageKey {
        PageKey::Service(ServicePath {
            service: service.to_string(),
            location: location.to_string(),
        })
    }

    #[test]
    fn paths_output_lists_both_sections() {
        let lines = format_paths_output(&all_pages(&small_catalog()));
        assert_eq!(lines[0], "Service pages");
        assert_eq!(lines[1], "001 web-design/faro");
        assert!(lines.contains(&"Industry pages".to_string()));
        assert!(lines.contains(&"001 hotelaria/faro".to_string()));
        assert_eq!(lines.last().unwrap(), "15 service pages, 5 industry pages");
    }

    #[test]
    fn paths_output_without_industries() {
        let lines = format_paths_output(&[key("seo", "faro")]);
        assert!(!lines.contains(&"Industry pages".to_string()));
        assert_eq!(lines.last().unwrap(), "1 service page, 0 industry pages");
    }

    #[test]
    fn catalog_summary_counts_regions_and_generic_services() {
        let lines = format_catalog_summary(&small_catalog());
        assert_eq!(
            lines,
            vec![
                "Catalog",
                "    3 services (1 using generic copy)",
                "    5 locations in 3 regions",
                "    1 industry",
            ]
        );
    }

    #[test]
    fn check_output_lists_issues() {
        let report = CheckReport {
            pages: 2,
            issues: vec![
                Issue::DuplicateTitle {
                    title: "SEO em X".to_string(),
                    pages: vec![key("seo", "x"), key("seo", "x-2")],
                },
                Issue::Unresolvable(key("seo", "y"), PageError::LocationNotFound("y".into())),
            ],
        };
        let lines = format_check_output(&report);
        assert_eq!(lines[0], "Duplicate title: SEO em X");
        assert_eq!(lines[1], "    seo/x");
        assert_eq!(lines[3], "Unresolvable seo/y: Location not found: y");
        assert_eq!(lines.last().unwrap(), "Checked 2 pages, 2 issues");
    }

    #[test]
    fn build_output_shows_titles_and_files() {
        let report = BuildReport {
            pages: vec![BuiltPage {
                key: key("seo", "faro"),
                title: "SEO em Faro, Algarve | Agência Digital".to_string(),
                file: PathBuf::from("servicos/seo/faro/index.html"),
            }],
            sitemap: PathBuf::from("sitemap.xml"),
        };
        let lines = format_build_output(&report);
        assert_eq!(
            lines[0],
            "001 SEO em Faro, Algarve | Agência Digital → servicos/seo/faro/index.html"
        );
        assert_eq!(lines[1], "Sitemap → sitemap.xml");
        assert_eq!(lines.last().unwrap(), "Generated 1 service page, 0 industry pages");
    }
}
