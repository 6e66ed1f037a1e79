//! Static path enumeration.
//!
//! The build renders the full cross-product of the catalog, with no
//! exclusions:
//!
//! ```text
//! services  × locations   →  /<services_path>/<service>/<location>/
//! industries × locations  →  /<industries_path>/<industry>/<location>/
//! ```
//!
//! Enumeration order is catalog order, outer loop first, so two builds of
//! the same catalog list pages identically (this is also sitemap order).

use crate::catalog::Catalog;
use crate::config::SiteConfig;
use serde::Serialize;
use std::fmt;

/// A `{service, location}` slug pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ServicePath {
    pub service: String,
    pub location: String,
}

/// An `{industry, location}` slug pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IndustryPath {
    pub industry: String,
    pub location: String,
}

/// Any page the build produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageKey {
    Service(ServicePath),
    Industry(IndustryPath),
}

impl PageKey {
    /// Site-relative URL path with leading and trailing slash.
    pub fn url_path(&self, config: &SiteConfig) -> String {
        match self {
            Self::Service(p) => service_url(config, &p.service, &p.location),
            Self::Industry(p) => industry_url(config, &p.industry, &p.location),
        }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(p) => write!(f, "service {}/{}", p.service, p.location),
            Self::Industry(p) => write!(f, "industry {}/{}", p.industry, p.location),
        }
    }
}

pub fn service_url(config: &SiteConfig, service: &str, location: &str) -> String {
    format!("/{}/{}/{}/", config.services_path, service, location)
}

pub fn industry_url(config: &SiteConfig, industry: &str, location: &str) -> String {
    format!("/{}/{}/{}/", config.industries_path, industry, location)
}

/// Every service × location pair, service-major.
pub fn service_paths(catalog: &Catalog) -> Vec<ServicePath> {
    catalog
        .services()
        .iter()
        .flat_map(|s| {
            catalog.locations().iter().map(move |l| ServicePath {
                service: s.slug.clone(),
                location: l.slug.clone(),
            })
        })
        .collect()
}

/// Every industry × location pair, industry-major.
pub fn industry_paths(catalog: &Catalog) -> Vec<IndustryPath> {
    catalog
        .industries()
        .iter()
        .flat_map(|i| {
            catalog.locations().iter().map(move |l| IndustryPath {
                industry: i.slug.clone(),
                location: l.slug.clone(),
            })
        })
        .collect()
}

/// All pages: service pages first, then industry pages.
pub fn all_pages(catalog: &Catalog) -> Vec<PageKey> {
    service_paths(catalog)
        .into_iter()
        .map(PageKey::Service)
        .chain(industry_paths(catalog).into_iter().map(PageKey::Industry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose_service_page;
    use crate::test_helpers::*;
    use std::collections::HashSet;

    #[test]
    fn six_by_eight_gives_forty_eight_distinct_resolvable_pairs() {
        let catalog = grid_catalog(6, 8);
        let config = config();
        let paths = service_paths(&catalog);
        assert_eq!(paths.len(), 48);

        let distinct: HashSet<&ServicePath> = paths.iter().collect();
        assert_eq!(distinct.len(), 48);

        for p in &paths {
            compose_service_page(&catalog, &config, &p.service, &p.location).unwrap();
        }
    }

    #[test]
    fn order_is_service_major() {
        let catalog = small_catalog();
        let paths = service_paths(&catalog);
        assert_eq!(paths[0].service, "web-design");
        assert_eq!(paths[0].location, "faro");
        assert_eq!(paths[1].location, "lagos");
        assert_eq!(paths[5].service, "seo");
        assert_eq!(paths[5].location, "faro");
    }

    #[test]
    fn industry_pages_follow_service_pages() {
        let catalog = small_catalog();
        let pages = all_pages(&catalog);
        assert_eq!(pages.len(), 3 * 5 + 5);
        assert!(matches!(pages[14], PageKey::Service(_)));
        assert!(matches!(&pages[15], PageKey::Industry(p) if p.industry == "hotelaria"));
    }

    #[test]
    fn empty_catalog_has_no_pages() {
        let catalog = Catalog::new(vec![], vec![], vec![]).unwrap();
        assert!(all_pages(&catalog).is_empty());
    }

    #[test]
    fn url_paths() {
        let config = config();
        let key = PageKey::Service(ServicePath {
            service: "web-design".to_string(),
            location: "faro".to_string(),
        });
        assert_eq!(key.url_path(&config), "/servicos/web-design/faro/");
        let key = PageKey::Industry(IndustryPath {
            industry: "hotelaria".to_string(),
            location: "faro".to_string(),
        });
        assert_eq!(key.url_path(&config), "/setores/hotelaria/faro/");
        assert_eq!(key.to_string(), "industry hotelaria/faro");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let key = PageKey::Service(ServicePath {
            service: "seo".to_string(),
            location: "faro".to_string(),
        });
        assert_eq!(
            serde_json::to_string(&key).unwrap(),
            r#"{"kind":"service","service":"seo","location":"faro"}"#
        );
    }
}
