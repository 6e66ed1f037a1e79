//! Page metadata: title, description, keywords, canonical URL, social preview.
//!
//! ## Uniqueness
//!
//! A programmatic site publishes hundreds of structurally identical pages.
//! What keeps them from being duplicates in the eyes of a search engine is
//! that both the title and the description are built here, in code, and
//! both always lead with the page subject *and* the location name:
//!
//! ```text
//! title:       {service} em {location}, {region} | {site_name}
//! description: {service} em {location} ({region}): {short description}
//! ```
//!
//! Catalog templates never produce these two fields, so no data edit can
//! break the property. Only the summary after the colon is truncated; the
//! `{service} em {location} ({region})` lead is kept whole even when it alone
//! exceeds `description_max_len`.
//!
//! ## Keywords
//!
//! The keyword list is the service's base keywords followed by its rendered
//! related searches, deduplicated case-insensitively in insertion order
//! (see [`KeywordSet`]).

use crate::catalog::Service;
use crate::compose::{IndustryPageModel, PageContentModel};
use crate::config::SiteConfig;
use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// Insertion-ordered set of keywords.
///
/// Comparison is on the trimmed, lowercased form; the first spelling seen
/// is the one kept. Blank entries are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a keyword. Returns `false` if it was blank or already present.
    pub fn insert(&mut self, keyword: &str) -> bool {
        let trimmed = keyword.trim();
        if trimmed.is_empty() {
            return false;
        }
        if !self.seen.insert(trimmed.to_lowercase()) {
            return false;
        }
        self.items.push(trimmed.to_string());
        true
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Comma-separated form for `<meta name="keywords">`.
    pub fn joined(&self) -> String {
        self.items.join(", ")
    }
}

impl<S: AsRef<str>> Extend<S> for KeywordSet {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        for k in iter {
            self.insert(k.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeywordSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Serialize for KeywordSet {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.items.serialize(serializer)
    }
}

/// Open Graph / Twitter card fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocialPreview {
    pub og_title: String,
    pub og_description: String,
    pub og_url: String,
    pub og_type: String,
    pub og_locale: String,
    pub og_site_name: String,
    pub twitter_card: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: KeywordSet,
    /// Absolute canonical URL.
    pub canonical: String,
    pub social: SocialPreview,
}

pub fn service_metadata(
    page: &PageContentModel,
    service: &Service,
    config: &SiteConfig,
) -> PageMetadata {
    let mut keywords: KeywordSet = service.keywords.iter().collect();
    keywords.extend(&page.related_searches);

    build(
        config,
        Subject {
            name: &page.service_name,
            location: &page.location_name,
            region: &page.region,
            summary: &page.service_description,
            path: &page.path,
        },
        keywords,
    )
}

pub fn industry_metadata(page: &IndustryPageModel, config: &SiteConfig) -> PageMetadata {
    let sector = page.industry_title.to_lowercase();
    let mut keywords = KeywordSet::new();
    keywords.insert(&sector);
    keywords.insert(&format!("{} {}", sector, page.location_name));
    keywords.extend(page.services.iter().map(|s| s.label.as_str()));

    let summary = format!("{}. {}", page.tagline.trim_end_matches('.'), page.description);
    build(
        config,
        Subject {
            name: &page.industry_title,
            location: &page.location_name,
            region: &page.region,
            summary: &summary,
            path: &page.path,
        },
        keywords,
    )
}

struct Subject<'a> {
    name: &'a str,
    location: &'a str,
    region: &'a str,
    summary: &'a str,
    path: &'a str,
}

fn build(config: &SiteConfig, subject: Subject<'_>, keywords: KeywordSet) -> PageMetadata {
    let title = format!(
        "{} em {}, {} | {}",
        subject.name, subject.location, subject.region, config.site_name
    );
    let description = describe(
        &format!(
            "{} em {} ({})",
            subject.name, subject.location, subject.region
        ),
        subject.summary,
        config.metadata.description_max_len,
    );
    let canonical = config.absolute_url(subject.path);

    PageMetadata {
        social: SocialPreview {
            og_title: title.clone(),
            og_description: description.clone(),
            og_url: canonical.clone(),
            og_type: "website".to_string(),
            og_locale: config.locale.clone(),
            og_site_name: config.site_name.clone(),
            twitter_card: "summary_large_image".to_string(),
        },
        title,
        description,
        keywords,
        canonical,
    }
}

/// `"{lead}: {summary}"`, with the summary cut to fit `max`.
///
/// The lead is never cut. When not even one word of the summary fits, the
/// description is the lead alone.
fn describe(lead: &str, summary: &str, max: usize) -> String {
    let summary = summary.trim();
    if summary.is_empty() {
        return lead.to_string();
    }
    let budget = max.saturating_sub(lead.chars().count() + 2);
    if summary.chars().count() <= budget {
        return format!("{lead}: {summary}");
    }
    let first_word = summary
        .split_whitespace()
        .next()
        .map_or(0, |w| w.chars().count());
    if first_word < budget {
        format!("{lead}: {}", truncate_description(summary, budget))
    } else {
        lead.to_string()
    }
}

/// Cut `text` to at most `max` characters at a word boundary, adding `…`.
pub fn truncate_description(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max.saturating_sub(1)).collect();
    let cut = match head.rfind(' ') {
        Some(pos) if pos > 0 => &head[..pos],
        _ => head.as_str(),
    };
    let cut = cut.trim_end_matches(|c: char| c == ',' || c == ';' || c == ':' || c == '.' || c.is_whitespace());
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{compose_industry_page, compose_service_page};
    use crate::test_helpers::*;
    use std::collections::HashSet;

    #[test]
    fn keyword_set_dedupes_case_insensitively_in_order() {
        let mut set = KeywordSet::new();
        assert!(set.insert("Web Design"));
        assert!(set.insert("sites faro"));
        assert!(!set.insert("web design"));
        assert!(!set.insert("  "));
        assert!(set.insert("SEO"));
        assert_eq!(set.as_slice(), ["Web Design", "sites faro", "SEO"]);
        assert_eq!(set.joined(), "Web Design, sites faro, SEO");
    }

    #[test]
    fn keywords_combine_base_and_related_without_duplicates() {
        let catalog = small_catalog();
        let config = config();
        let page = compose_service_page(&catalog, &config, "web-design", "faro").unwrap();
        let service = catalog.service("web-design").unwrap();
        let meta = service_metadata(&page, service, &config);
        assert_eq!(
            meta.keywords.as_slice(),
            ["web design", "Web Design Faro", "empresa Web Design Algarve"]
        );

        let mut dup = page.clone();
        dup.related_searches.push("WEB DESIGN".to_string());
        let meta = service_metadata(&dup, service, &config);
        assert_eq!(meta.keywords.len(), 3);
    }

    #[test]
    fn titles_unique_across_locations_for_a_service() {
        let catalog = small_catalog();
        let config = config();
        for service in catalog.services() {
            let titles: HashSet<String> = catalog
                .locations()
                .iter()
                .map(|l| {
                    let page = compose_service_page(&catalog, &config, &service.slug, &l.slug)
                        .unwrap();
                    service_metadata(&page, service, &config).title
                })
                .collect();
            assert_eq!(titles.len(), catalog.locations().len());
        }
    }

    #[test]
    fn title_and_canonical_shape() {
        let catalog = small_catalog();
        let config = config();
        let page = compose_service_page(&catalog, &config, "seo", "lisboa").unwrap();
        let meta = service_metadata(&page, catalog.service("seo").unwrap(), &config);
        assert_eq!(meta.title, "SEO em Lisboa, Lisboa | Agência Digital");
        assert_eq!(meta.canonical, "https://www.example.pt/servicos/seo/lisboa/");
        assert_eq!(meta.social.og_url, meta.canonical);
        assert_eq!(meta.social.og_locale, "pt_PT");
        assert!(meta.description.starts_with("SEO em Lisboa (Lisboa): "));
    }

    #[test]
    fn long_description_truncated_keeping_location() {
        let catalog = small_catalog();
        let mut config = config();
        config.metadata.description_max_len = 50;
        let mut service = catalog.service("seo").unwrap().clone();
        service.short_description = "palavra ".repeat(40);
        let page = crate::compose::compose_service(
            &catalog,
            &config,
            &service,
            catalog.location("tavira").unwrap(),
        );
        let meta = service_metadata(&page, &service, &config);
        assert!(meta.description.chars().count() <= 50);
        assert!(meta.description.starts_with("SEO em Tavira (Algarve)"));
        assert!(meta.description.ends_with('…'));
    }

    #[test]
    fn tight_limit_never_cuts_into_location() {
        let mut config = config();
        config.metadata.description_max_len = 50;
        let service = service("apps-moveis", "Desenvolvimento de Aplicações Móveis iOS");
        let catalog = crate::catalog::Catalog::new(
            vec![service.clone()],
            vec![
                location("vrsa", "Vila Real de Santo António", "Algarve"),
                location("gaia", "Vila Nova de Gaia", "Algarve"),
            ],
            vec![],
        )
        .unwrap();

        let describe_at = |slug: &str| {
            let page = compose_service_page(&catalog, &config, "apps-moveis", slug).unwrap();
            service_metadata(&page, &service, &config).description
        };
        let vrsa = describe_at("vrsa");
        let gaia = describe_at("gaia");
        assert_ne!(vrsa, gaia);
        assert_eq!(
            vrsa,
            "Desenvolvimento de Aplicações Móveis iOS em Vila Real de Santo António (Algarve)"
        );
        assert!(gaia.starts_with("Desenvolvimento de Aplicações Móveis iOS em Vila Nova de Gaia (Algarve)"));
    }

    #[test]
    fn summary_cut_to_remaining_budget() {
        assert_eq!(
            describe("SEO em Faro (Algarve)", "um dois três quatro cinco seis", 40),
            "SEO em Faro (Algarve): um dois três…"
        );
        assert_eq!(describe("SEO em Faro (Algarve)", "curto", 40), "SEO em Faro (Algarve): curto");
        assert_eq!(describe("SEO em Faro (Algarve)", "   ", 40), "SEO em Faro (Algarve)");
    }

    #[test]
    fn truncate_short_text_untouched() {
        assert_eq!(truncate_description("  curto  ", 160), "curto");
    }

    #[test]
    fn truncate_cuts_at_word_boundary() {
        assert_eq!(
            truncate_description("um dois três, quatro cinco", 16),
            "um dois três…"
        );
    }

    #[test]
    fn industry_metadata_mentions_location() {
        let catalog = small_catalog();
        let config = config();
        let page = compose_industry_page(&catalog, &config, "hotelaria", "tavira").unwrap();
        let meta = industry_metadata(&page, &config);
        assert_eq!(meta.title, "Hotelaria em Tavira, Algarve | Agência Digital");
        assert_eq!(meta.canonical, "https://www.example.pt/setores/hotelaria/tavira/");
        assert_eq!(meta.keywords.as_slice()[..2], ["hotelaria", "hotelaria Tavira"]);
    }
}
