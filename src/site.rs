//! Site build and global checks.
//!
//! `build` renders every enumerated page to HTML and writes a sitemap:
//!
//! ```text
//! dist/
//! ├── sitemap.xml
//! ├── servicos/
//! │   └── web-design/
//! │       ├── faro/index.html
//! │       └── lagos/index.html
//! └── setores/
//!     └── hotelaria/
//!         └── faro/index.html
//! ```
//!
//! `check` composes the same pages without writing anything and verifies
//! the properties that only hold across the whole page set: every hero and
//! intro non-empty, no title or description shared by two pages.
//!
//! ## Parallelism
//!
//! Pages are independent pure functions of the read-only catalog, so both
//! operations fan out with [rayon](https://docs.rs/rayon). Results are
//! collected in enumeration order, which keeps reports and the sitemap
//! stable from run to run.
//!
//! ## HTML
//!
//! Markup is bare: the head carries the metadata and the
//! JSON-LD block, the body lists the composed content. Styling and layout
//! belong to the site that embeds these pages.

use crate::catalog::Catalog;
use crate::compose::{FaqEntry, IndustryPageModel, LinkRef, PageContentModel, PageError};
use crate::config::SiteConfig;
use crate::page::{PageBundle, PageContent, render_page};
use crate::paths::{PageKey, all_pages};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Page error: {0}")]
    Page(#[from] PageError),
}

/// One written page.
#[derive(Debug, Clone)]
pub struct BuiltPage {
    pub key: PageKey,
    pub title: String,
    /// Output file, relative to the output directory.
    pub file: PathBuf,
}

#[derive(Debug)]
pub struct BuildReport {
    pub pages: Vec<BuiltPage>,
    pub sitemap: PathBuf,
}

impl BuildReport {
    pub fn service_pages(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| matches!(p.key, PageKey::Service(_)))
            .count()
    }

    pub fn industry_pages(&self) -> usize {
        self.pages.len() - self.service_pages()
    }
}

pub fn build_site(
    catalog: &Catalog,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<BuildReport, BuildError> {
    let keys = all_pages(catalog);
    fs::create_dir_all(output_dir)?;

    let pages = keys
        .par_iter()
        .map(|key| -> Result<BuiltPage, BuildError> {
            let bundle = render_page(catalog, config, key)?;
            let markup = render_document(&bundle, config)?;
            let file = PathBuf::from(bundle.content.path().trim_matches('/')).join("index.html");
            let target = output_dir.join(&file);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, markup.into_string())?;
            tracing::debug!(page = %key, file = %file.display(), "page written");
            Ok(BuiltPage {
                key: key.clone(),
                title: bundle.metadata.title,
                file,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let sitemap = PathBuf::from("sitemap.xml");
    fs::write(output_dir.join(&sitemap), render_sitemap(&keys, config))?;

    tracing::info!(pages = pages.len(), output = %output_dir.display(), "site built");
    Ok(BuildReport { pages, sitemap })
}

// ============================================================================
// Global checks
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    Unresolvable(PageKey, PageError),
    EmptyHero(PageKey),
    EmptyIntro(PageKey),
    DuplicateTitle { title: String, pages: Vec<PageKey> },
    DuplicateDescription { description: String, pages: Vec<PageKey> },
}

#[derive(Debug, Default)]
pub struct CheckReport {
    pub pages: usize,
    pub issues: Vec<Issue>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

pub fn check_site(catalog: &Catalog, config: &SiteConfig) -> CheckReport {
    let keys = all_pages(catalog);
    let results: Vec<(PageKey, Result<PageBundle, PageError>)> = keys
        .par_iter()
        .map(|key| (key.clone(), render_page(catalog, config, key)))
        .collect();

    let mut issues = Vec::new();
    let mut titles: BTreeMap<&str, Vec<PageKey>> = BTreeMap::new();
    let mut descriptions: BTreeMap<&str, Vec<PageKey>> = BTreeMap::new();

    for (key, result) in &results {
        let bundle = match result {
            Ok(b) => b,
            Err(e) => {
                issues.push(Issue::Unresolvable(key.clone(), e.clone()));
                continue;
            }
        };
        if bundle.content.hero_title().trim().is_empty() {
            issues.push(Issue::EmptyHero(key.clone()));
        }
        if bundle.content.intro().trim().is_empty() {
            issues.push(Issue::EmptyIntro(key.clone()));
        }
        titles
            .entry(bundle.metadata.title.as_str())
            .or_default()
            .push(key.clone());
        descriptions
            .entry(bundle.metadata.description.as_str())
            .or_default()
            .push(key.clone());
    }

    for (title, pages) in titles {
        if pages.len() > 1 {
            issues.push(Issue::DuplicateTitle {
                title: title.to_string(),
                pages,
            });
        }
    }
    for (description, pages) in descriptions {
        if pages.len() > 1 {
            issues.push(Issue::DuplicateDescription {
                description: description.to_string(),
                pages,
            });
        }
    }

    CheckReport {
        pages: results.len(),
        issues,
    }
}

// ============================================================================
// Sitemap
// ============================================================================

pub fn render_sitemap(keys: &[PageKey], config: &SiteConfig) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for key in keys {
        let url = config.absolute_url(&key.url_path(config));
        xml.push_str("  <url><loc>");
        xml.push_str(&xml_escape(&url));
        xml.push_str("</loc></url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the full HTML document for a bundle.
pub fn render_document(bundle: &PageBundle, config: &SiteConfig) -> Result<Markup, BuildError> {
    let json_ld = bundle.structured_data.to_script_json()?;
    let body = match &bundle.content {
        PageContent::Service(page) => service_body(page),
        PageContent::Industry(page) => industry_body(page),
    };
    Ok(base_document(bundle, config, &json_ld, body))
}

fn base_document(bundle: &PageBundle, config: &SiteConfig, json_ld: &str, body: Markup) -> Markup {
    let page_meta = &bundle.metadata;
    let social = &page_meta.social;
    let lang = config.locale.replace('_', "-");
    html! {
        (DOCTYPE)
        html lang=(lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page_meta.title) }
                meta name="description" content=(page_meta.description);
                @if !page_meta.keywords.is_empty() {
                    meta name="keywords" content=(page_meta.keywords.joined());
                }
                link rel="canonical" href=(page_meta.canonical);
                meta property="og:title" content=(social.og_title);
                meta property="og:description" content=(social.og_description);
                meta property="og:url" content=(social.og_url);
                meta property="og:type" content=(social.og_type);
                meta property="og:locale" content=(social.og_locale);
                meta property="og:site_name" content=(social.og_site_name);
                meta name="twitter:card" content=(social.twitter_card);
                script type="application/ld+json" { (PreEscaped(json_ld)) }
            }
            body {
                (body)
            }
        }
    }
}

fn hero(title: &str, subtitle: &str) -> Markup {
    html! {
        header.hero {
            h1 { (title) }
            p.hero-subtitle { (subtitle) }
        }
    }
}

fn string_list(class: &str, heading: &str, items: &[String]) -> Markup {
    html! {
        @if !items.is_empty() {
            section class=(class) {
                h2 { (heading) }
                ul {
                    @for item in items {
                        li { (item) }
                    }
                }
            }
        }
    }
}

fn link_list(class: &str, heading: &str, links: &[LinkRef]) -> Markup {
    html! {
        @if !links.is_empty() {
            nav class=(class) {
                h2 { (heading) }
                ul {
                    @for link in links {
                        li { a href=(link.href) { (link.label) } }
                    }
                }
            }
        }
    }
}

fn faq_section(faq: &[FaqEntry]) -> Markup {
    html! {
        @if !faq.is_empty() {
            section.faq {
                h2 { "Perguntas frequentes" }
                @for entry in faq {
                    details {
                        summary { (entry.question) }
                        p { (entry.answer) }
                    }
                }
            }
        }
    }
}

fn service_body(page: &PageContentModel) -> Markup {
    html! {
        (hero(&page.hero.title, &page.hero.subtitle))
        main.service-page {
            p.intro { (page.intro) }
            @if !page.benefits.is_empty() {
                section.benefits {
                    @for b in &page.benefits {
                        div.stat {
                            strong { (b.stat) }
                            " "
                            span { (b.label) }
                            @if let Some(d) = &b.description {
                                p { (d) }
                            }
                        }
                    }
                }
            }
            (string_list("local-benefits", &format!("Porquê em {}", page.location_name), &page.local_benefits))
            (string_list("deliverables", "O que inclui", &page.deliverables))
            @if !page.process.is_empty() {
                section.process {
                    h2 { "Como trabalhamos" }
                    ol {
                        @for step in &page.process {
                            li { strong { (step.title) } " " (step.description) }
                        }
                    }
                }
            }
            @if !page.pricing.is_empty() {
                section.pricing {
                    h2 { "Preços" }
                    @for tier in &page.pricing {
                        div class=(if tier.highlighted { "tier highlighted" } else { "tier" }) {
                            h3 { (tier.name) }
                            p.price { (tier.price) }
                            ul {
                                @for f in &tier.features {
                                    li { (f) }
                                }
                            }
                        }
                    }
                }
            }
            (string_list("trust", "Confiança", &page.trust_signals))
            (faq_section(&page.faq))
            @if !page.case_studies.is_empty() {
                section.case-studies {
                    h2 { "Casos de estudo" }
                    ul {
                        @for c in &page.case_studies {
                            li { (c.title) ", " (c.client) }
                        }
                    }
                }
            }
            (string_list("related", "Pesquisas relacionadas", &page.related_searches))
            (link_list("other-services", &format!("Outros serviços em {}", page.location_name), &page.other_services))
            (link_list("nearby", &format!("{} noutras localidades de {}", page.service_name, page.region), &page.nearby_locations))
            (link_list("other-regions", &format!("{} noutras regiões", page.service_name), &page.other_regions))
        }
    }
}

fn industry_body(page: &IndustryPageModel) -> Markup {
    html! {
        (hero(&page.hero.title, &page.hero.subtitle))
        main.industry-page {
            p.intro { (page.intro) }
            p.description { (page.description) }
            @if !page.stats.is_empty() {
                section.stats {
                    @for s in &page.stats {
                        div.stat { strong { (s.stat) } " " span { (s.label) } }
                    }
                }
            }
            (string_list("challenges", "Desafios", &page.challenges))
            (string_list("solutions", "Soluções", &page.solutions))
            (link_list("services", &format!("Serviços em {}", page.location_name), &page.services))
            (string_list("clients", "Clientes", &page.clients))
            (faq_section(&page.faq))
            @if !page.case_studies.is_empty() {
                section.case-studies {
                    h2 { "Casos de estudo" }
                    ul {
                        @for c in &page.case_studies {
                            li { (c.title) ", " (c.client) }
                        }
                    }
                }
            }
            (link_list("nearby", &format!("{} noutras localidades de {}", page.industry_title, page.region), &page.nearby_locations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Service;
    use crate::page::render_service_page;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn build_writes_every_page_and_sitemap() {
        let tmp = TempDir::new().unwrap();
        let catalog = small_catalog();
        let report = build_site(&catalog, &config(), tmp.path()).unwrap();

        assert_eq!(report.pages.len(), 20);
        assert_eq!(report.service_pages(), 15);
        assert_eq!(report.industry_pages(), 5);
        assert!(tmp.path().join("servicos/web-design/faro/index.html").exists());
        assert!(tmp.path().join("setores/hotelaria/porto/index.html").exists());

        let sitemap = fs::read_to_string(tmp.path().join("sitemap.xml")).unwrap();
        assert_eq!(sitemap.matches("<url>").count(), 20);
        assert!(sitemap.contains("<loc>https://www.example.pt/servicos/web-design/faro/</loc>"));
    }

    #[test]
    fn build_report_preserves_enumeration_order() {
        let tmp = TempDir::new().unwrap();
        let catalog = small_catalog();
        let report = build_site(&catalog, &config(), tmp.path()).unwrap();
        let keys: Vec<PageKey> = report.pages.iter().map(|p| p.key.clone()).collect();
        assert_eq!(keys, all_pages(&catalog));
    }

    #[test]
    fn document_carries_metadata_and_json_ld() {
        let catalog = small_catalog();
        let config = config();
        let bundle = render_service_page(&catalog, &config, "web-design", "faro").unwrap();
        let html = render_document(&bundle, &config).unwrap().into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="pt-PT">"#));
        assert!(html.contains("<title>Web Design em Faro, Algarve | Agência Digital</title>"));
        assert!(html.contains(
            r#"<link rel="canonical" href="https://www.example.pt/servicos/web-design/faro/">"#
        ));
        assert!(html.contains(r#"<script type="application/ld+json">{"@context":"https://schema.org""#));
        assert!(html.contains("Perguntas frequentes"));
        assert!(html.contains(r#"href="/servicos/seo/faro/""#));
    }

    #[test]
    fn document_omits_empty_sections() {
        let catalog = small_catalog();
        let config = config();
        let bundle = render_service_page(&catalog, &config, "branding", "lagos").unwrap();
        let html = render_document(&bundle, &config).unwrap().into_string();
        assert!(!html.contains("Perguntas frequentes"));
        assert!(!html.contains("Preços"));
    }

    #[test]
    fn content_is_escaped() {
        let mut catalog_service: Service = seo_service("seo", "SEO <b>");
        catalog_service.short_description = "x".to_string();
        let catalog = crate::catalog::Catalog::new(
            vec![catalog_service],
            vec![location("faro", "Faro", "Algarve")],
            vec![],
        )
        .unwrap();
        let config = config();
        let bundle = render_service_page(&catalog, &config, "seo", "faro").unwrap();
        let html = render_document(&bundle, &config).unwrap().into_string();
        assert!(!html.contains("<h1>SEO <b>"));
        assert!(html.contains("<h1>SEO &lt;b&gt; em Faro, Algarve</h1>"));
    }

    #[test]
    fn check_passes_on_well_formed_catalog() {
        let report = check_site(&small_catalog(), &config());
        assert_eq!(report.pages, 20);
        assert!(report.is_ok(), "{:?}", report.issues);
    }

    #[test]
    fn check_detects_duplicate_titles() {
        // Two locations with the same name and region in different slugs
        let catalog = crate::catalog::Catalog::new(
            vec![service("seo", "SEO")],
            vec![
                location("santa-maria", "Santa Maria", "Açores"),
                location("santa-maria-2", "Santa Maria", "Açores"),
            ],
            vec![],
        )
        .unwrap();
        let report = check_site(&catalog, &config());
        assert!(!report.is_ok());
        assert!(report.issues.iter().any(|i| matches!(
            i,
            Issue::DuplicateTitle { pages, .. } if pages.len() == 2
        )));
        assert!(report
            .issues
            .iter()
            .any(|i| matches!(i, Issue::DuplicateDescription { .. })));
    }

    #[test]
    fn sitemap_escapes_urls() {
        let mut config = config();
        config.base_url = "https://example.pt/?a=1&b=2".to_string();
        let keys = vec![PageKey::Service(crate::paths::ServicePath {
            service: "seo".to_string(),
            location: "faro".to_string(),
        })];
        let xml = render_sitemap(&keys, &config);
        assert!(xml.contains("a=1&amp;b=2"));
    }
}
