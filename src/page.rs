//! The page render contract.
//!
//! Given a [`PageKey`], produce the `{metadata, content, structured_data}`
//! bundle or a [`PageError`]. Bundles are recomputed on every call; nothing
//! is cached between pages or builds.

use crate::catalog::Catalog;
use crate::compose::{
    IndustryPageModel, PageContentModel, PageError, compose_industry_page, compose_service_page,
};
use crate::config::SiteConfig;
use crate::metadata::{PageMetadata, industry_metadata, service_metadata};
use crate::paths::{IndustryPath, PageKey, ServicePath};
use crate::schema::{StructuredDataGraph, industry_graph, service_graph};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageContent {
    Service(PageContentModel),
    Industry(IndustryPageModel),
}

impl PageContent {
    pub fn hero_title(&self) -> &str {
        match self {
            Self::Service(p) => &p.hero.title,
            Self::Industry(p) => &p.hero.title,
        }
    }

    pub fn intro(&self) -> &str {
        match self {
            Self::Service(p) => &p.intro,
            Self::Industry(p) => &p.intro,
        }
    }

    /// Site-relative URL of the page.
    pub fn path(&self) -> &str {
        match self {
            Self::Service(p) => &p.path,
            Self::Industry(p) => &p.path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageBundle {
    pub key: PageKey,
    pub metadata: PageMetadata,
    pub content: PageContent,
    pub structured_data: StructuredDataGraph,
}

pub fn render_page(
    catalog: &Catalog,
    config: &SiteConfig,
    key: &PageKey,
) -> Result<PageBundle, PageError> {
    match key {
        PageKey::Service(ServicePath { service, location }) => {
            let content = compose_service_page(catalog, config, service, location)?;
            let record = catalog
                .service(service)
                .ok_or_else(|| PageError::ServiceNotFound(service.clone()))?;
            let metadata = service_metadata(&content, record, config);
            let structured_data = service_graph(&content, record, &metadata, config);
            Ok(PageBundle {
                key: key.clone(),
                metadata,
                content: PageContent::Service(content),
                structured_data,
            })
        }
        PageKey::Industry(IndustryPath { industry, location }) => {
            let content = compose_industry_page(catalog, config, industry, location)?;
            let metadata = industry_metadata(&content, config);
            let structured_data = industry_graph(&content, &metadata, config);
            Ok(PageBundle {
                key: key.clone(),
                metadata,
                content: PageContent::Industry(content),
                structured_data,
            })
        }
    }
}

/// Convenience for the service × location case.
pub fn render_service_page(
    catalog: &Catalog,
    config: &SiteConfig,
    service: &str,
    location: &str,
) -> Result<PageBundle, PageError> {
    render_page(
        catalog,
        config,
        &PageKey::Service(ServicePath {
            service: service.to_string(),
            location: location.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn service_bundle_is_consistent() {
        let catalog = small_catalog();
        let config = config();
        let bundle = render_service_page(&catalog, &config, "web-design", "faro").unwrap();
        assert_eq!(bundle.content.path(), "/servicos/web-design/faro/");
        assert!(bundle.metadata.canonical.ends_with(bundle.content.path()));
        assert!(bundle.structured_data.has_faq());
        assert!(bundle.content.hero_title().contains("Faro"));
    }

    #[test]
    fn not_found_yields_no_bundle() {
        let catalog = small_catalog();
        let config = config();
        assert_eq!(
            render_service_page(&catalog, &config, "web-design", "atlantida").unwrap_err(),
            PageError::LocationNotFound("atlantida".to_string())
        );
    }

    #[test]
    fn industry_bundle() {
        let catalog = small_catalog();
        let config = config();
        let key = PageKey::Industry(IndustryPath {
            industry: "hotelaria".to_string(),
            location: "lisboa".to_string(),
        });
        let bundle = render_page(&catalog, &config, &key).unwrap();
        assert!(matches!(bundle.content, PageContent::Industry(_)));
        assert!(bundle.content.intro().contains("Lisboa"));
    }

    #[test]
    fn bundle_serializes_with_content_kind() {
        let catalog = small_catalog();
        let bundle = render_service_page(&catalog, &config(), "seo", "porto").unwrap();
        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["content"]["kind"], "service");
        assert_eq!(json["key"]["kind"], "service");
        assert_eq!(json["structured_data"]["@context"], "https://schema.org");
    }

    #[test]
    fn rendering_twice_is_byte_identical() {
        let catalog = small_catalog();
        let config = config();
        for key in crate::paths::all_pages(&catalog) {
            let a = serde_json::to_string(&render_page(&catalog, &config, &key).unwrap()).unwrap();
            let b = serde_json::to_string(&render_page(&catalog, &config, &key).unwrap()).unwrap();
            assert_eq!(a, b, "{key}");
        }
    }
}
