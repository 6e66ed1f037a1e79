//! Content composition: catalog records → a fully resolved page model.
//!
//! A composed page has no optional copy left in it. Every required string is
//! non-empty and every list is present (possibly empty), whatever the
//! service's template set or the location's optional fields look like:
//!
//! | Source missing | Result |
//! |----------------|--------|
//! | service template set | generic hero, empty benefit/pricing/FAQ lists |
//! | local-benefits generator | empty local benefits |
//! | population | intro without the population clause |
//! | business context | intro without the context sentence |
//!
//! The only failure is a slug that doesn't resolve ([`PageError`]); no
//! partial page is ever returned for it.

use crate::catalog::{
    BenefitStat, CaseStudySummary, Catalog, FaqTemplate, Industry, Location, LocationKind,
    PricingTier, ProcessStep, Service,
};
use crate::config::SiteConfig;
use crate::paths::{industry_url, service_url};
use crate::template::{LocationContext, Template, format_population};
use crate::variation::{Hero, local_benefits, select_hero};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("Service not found: {0}")]
    ServiceNotFound(String),
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    #[error("Industry not found: {0}")]
    IndustryNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

/// A cross-link to another generated page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkRef {
    pub slug: String,
    pub label: String,
    /// Site-relative URL.
    pub href: String,
}

/// Everything a service × location page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContentModel {
    pub service_slug: String,
    pub service_name: String,
    pub service_description: String,
    pub location_slug: String,
    pub location_name: String,
    pub region: String,
    /// Site-relative URL of this page.
    pub path: String,
    pub hero: Hero,
    pub intro: String,
    pub benefits: Vec<BenefitStat>,
    pub deliverables: Vec<String>,
    pub process: Vec<ProcessStep>,
    pub pricing: Vec<PricingTier>,
    pub local_benefits: Vec<String>,
    pub trust_signals: Vec<String>,
    pub faq: Vec<FaqEntry>,
    pub related_searches: Vec<String>,
    pub case_studies: Vec<CaseStudySummary>,
    /// Other services at this location.
    pub other_services: Vec<LinkRef>,
    /// This service at other locations in the same region.
    pub nearby_locations: Vec<LinkRef>,
    /// This service at locations outside the region.
    pub other_regions: Vec<LinkRef>,
}

/// Everything an industry × location page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryPageModel {
    pub industry_slug: String,
    pub industry_title: String,
    pub tagline: String,
    pub description: String,
    pub location_slug: String,
    pub location_name: String,
    pub region: String,
    pub path: String,
    pub hero: Hero,
    pub intro: String,
    pub stats: Vec<BenefitStat>,
    pub challenges: Vec<String>,
    pub solutions: Vec<String>,
    /// Applicable services, linked at this location.
    pub services: Vec<LinkRef>,
    pub clients: Vec<String>,
    pub faq: Vec<FaqEntry>,
    pub case_studies: Vec<CaseStudySummary>,
    /// This industry at other locations in the same region.
    pub nearby_locations: Vec<LinkRef>,
}

/// Resolve both slugs and compose the service page.
pub fn compose_service_page(
    catalog: &Catalog,
    config: &SiteConfig,
    service_slug: &str,
    location_slug: &str,
) -> Result<PageContentModel, PageError> {
    let service = catalog
        .service(service_slug)
        .ok_or_else(|| PageError::ServiceNotFound(service_slug.to_string()))?;
    let location = catalog
        .location(location_slug)
        .ok_or_else(|| PageError::LocationNotFound(location_slug.to_string()))?;
    Ok(compose_service(catalog, config, service, location))
}

/// Compose a service page from records that are already resolved.
pub fn compose_service(
    catalog: &Catalog,
    config: &SiteConfig,
    service: &Service,
    location: &Location,
) -> PageContentModel {
    let ctx = LocationContext::new(&service.name, location);
    let seo = service.seo.as_ref();
    let links = &config.links;

    let closing = format!(
        "A {} presta serviços de {} a empresas de {} e arredores.",
        config.site_name, service.name, location.name
    );

    let other_services = catalog
        .services()
        .iter()
        .filter(|s| s.slug != service.slug)
        .take(links.other_services)
        .map(|s| LinkRef {
            slug: s.slug.clone(),
            label: format!("{} em {}", s.name, location.name),
            href: service_url(config, &s.slug, &location.slug),
        })
        .collect();

    let location_link = |l: &Location| LinkRef {
        slug: l.slug.clone(),
        label: format!("{} em {}", service.name, l.name),
        href: service_url(config, &service.slug, &l.slug),
    };

    PageContentModel {
        service_slug: service.slug.clone(),
        service_name: service.name.clone(),
        service_description: service.short_description.clone(),
        location_slug: location.slug.clone(),
        location_name: location.name.clone(),
        region: location.region.clone(),
        path: service_url(config, &service.slug, &location.slug),
        hero: select_hero(service, location, config.variation.strategy),
        intro: local_intro(location, &closing),
        benefits: seo.map(|s| s.benefits.clone()).unwrap_or_default(),
        deliverables: seo.map(|s| s.deliverables.clone()).unwrap_or_default(),
        process: seo.map(|s| s.process.clone()).unwrap_or_default(),
        pricing: seo.map(|s| s.pricing.clone()).unwrap_or_default(),
        local_benefits: local_benefits(seo.and_then(|s| s.local_benefits.as_ref()), &ctx),
        trust_signals: seo.map(|s| s.trust_signals.clone()).unwrap_or_default(),
        faq: seo.map(|s| render_faq(&s.faq, &ctx)).unwrap_or_default(),
        related_searches: seo
            .map(|s| {
                s.related_searches
                    .iter()
                    .map(|t| render_or_source(t, &ctx))
                    .collect()
            })
            .unwrap_or_default(),
        case_studies: catalog
            .cases_by_service(&service.slug)
            .into_iter()
            .take(links.case_studies)
            .collect(),
        other_services,
        nearby_locations: same_region(catalog, location)
            .take(links.nearby_locations)
            .map(location_link)
            .collect(),
        other_regions: other_regions(catalog, location)
            .take(links.other_regions)
            .map(location_link)
            .collect(),
    }
}

/// Resolve both slugs and compose the industry page.
pub fn compose_industry_page(
    catalog: &Catalog,
    config: &SiteConfig,
    industry_slug: &str,
    location_slug: &str,
) -> Result<IndustryPageModel, PageError> {
    let industry = catalog
        .industry(industry_slug)
        .ok_or_else(|| PageError::IndustryNotFound(industry_slug.to_string()))?;
    let location = catalog
        .location(location_slug)
        .ok_or_else(|| PageError::LocationNotFound(location_slug.to_string()))?;
    Ok(compose_industry(catalog, config, industry, location))
}

pub fn compose_industry(
    catalog: &Catalog,
    config: &SiteConfig,
    industry: &Industry,
    location: &Location,
) -> IndustryPageModel {
    let ctx = LocationContext::new(&industry.title, location);
    let sector = industry.title.to_lowercase();

    let hero = Hero {
        title: format!("{} em {}", industry.title, location.name),
        subtitle: format!(
            "{} para negócios de {} em {}, {}.",
            industry.tagline, sector, location.name, location.region
        ),
    };
    let closing = format!(
        "A {} conhece os desafios do setor de {} em {}.",
        config.site_name, sector, location.name
    );

    // Unknown service slugs are catalog drift, not an error
    let services = industry
        .services
        .iter()
        .filter_map(|slug| catalog.service(slug))
        .map(|s| LinkRef {
            slug: s.slug.clone(),
            label: format!("{} em {}", s.name, location.name),
            href: service_url(config, &s.slug, &location.slug),
        })
        .collect();

    IndustryPageModel {
        industry_slug: industry.slug.clone(),
        industry_title: industry.title.clone(),
        tagline: industry.tagline.clone(),
        description: industry.description.clone(),
        location_slug: location.slug.clone(),
        location_name: location.name.clone(),
        region: location.region.clone(),
        path: industry_url(config, &industry.slug, &location.slug),
        hero,
        intro: local_intro(location, &closing),
        stats: industry.stats.clone(),
        challenges: industry.challenges.clone(),
        solutions: industry.solutions.clone(),
        services,
        clients: industry.clients.clone(),
        faq: render_faq(&industry.faq, &ctx),
        case_studies: catalog
            .cases_by_industry(&industry.slug)
            .into_iter()
            .take(config.links.case_studies)
            .collect(),
        nearby_locations: same_region(catalog, location)
            .take(config.links.nearby_locations)
            .map(|l| LinkRef {
                slug: l.slug.clone(),
                label: format!("{} em {}", industry.title, l.name),
                href: industry_url(config, &industry.slug, &l.slug),
            })
            .collect(),
    }
}

/// Build the local intro paragraph.
///
/// The opening clause depends on the location type, followed by an optional
/// population clause, an optional business-context sentence, and `closing`.
pub fn local_intro(location: &Location, closing: &str) -> String {
    let name = &location.name;
    let region = &location.region;
    let mut intro = match location.kind {
        LocationKind::Capital => format!(
            "Enquanto capital de distrito, {name} ({region}) concentra serviços, comércio e decisores da região"
        ),
        LocationKind::MajorCity => {
            format!("{name} ({region}) é um dos grandes centros urbanos e económicos do país")
        }
        LocationKind::City => format!(
            "{name} ({region}) é uma cidade dinâmica, com um tecido empresarial em crescimento"
        ),
        LocationKind::Town => format!(
            "{name} ({region}) é uma localidade onde o comércio de proximidade faz a diferença"
        ),
    };

    if let Some(population) = location.population {
        intro.push_str(&format!(
            ", com cerca de {} habitantes",
            format_population(population)
        ));
    }
    intro.push('.');

    if let Some(context) = location
        .business_context
        .as_deref()
        .map(|s| s.trim().trim_end_matches('.'))
        .filter(|s| !s.is_empty())
    {
        intro.push(' ');
        intro.push_str(&capitalize(context));
        intro.push('.');
    }

    intro.push(' ');
    intro.push_str(closing);
    intro
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn same_region<'a>(catalog: &'a Catalog, location: &'a Location) -> impl Iterator<Item = &'a Location> {
    catalog
        .locations()
        .iter()
        .filter(move |l| l.region == location.region && l.slug != location.slug)
}

fn other_regions<'a>(
    catalog: &'a Catalog,
    location: &'a Location,
) -> impl Iterator<Item = &'a Location> {
    catalog
        .locations()
        .iter()
        .filter(move |l| l.region != location.region)
}

fn render_faq(faq: &[FaqTemplate], ctx: &LocationContext<'_>) -> Vec<FaqEntry> {
    faq.iter()
        .map(|entry| FaqEntry {
            question: render_or_source(&entry.question, ctx),
            answer: render_or_source(&entry.answer, ctx),
        })
        .collect()
}

/// Render a template that the catalog guarantees only uses required slots.
fn render_or_source(template: &Template, ctx: &LocationContext<'_>) -> String {
    template.render(ctx).unwrap_or_else(|e| {
        tracing::warn!(template = template.source(), error = %e, "template failed to render");
        template.source().to_string()
    })
}
