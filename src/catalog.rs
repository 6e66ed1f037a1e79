//! The data catalog: services, locations, industries and case studies.
//!
//! The catalog is read once from TOML files in the content directory and is
//! immutable afterwards. Every composer takes a `&Catalog`; nothing reaches
//! for global tables.
//!
//! ```text
//! content/
//! ├── config.toml        # Site configuration (optional, see config module)
//! ├── services.toml      # [[service]] tables
//! ├── locations.toml     # [[location]] tables
//! ├── industries.toml    # [[industry]] tables (optional)
//! └── cases/             # One TOML file per case study (optional)
//!     └── hotel-mar.toml
//! ```
//!
//! Declared order is preserved by every listing accessor. Downstream code
//! takes "the first N" of these lists for cross-links, so reordering a file
//! is the only way a link set changes.
//!
//! ## Validation
//!
//! Loading rejects data that would later produce broken pages:
//! - slugs that are empty or not in canonical form
//! - duplicate slugs within a table
//! - blank service names, location names and regions, and industry titles
//! - pricing with anything other than three tiers
//! - FAQ and related-search templates that reference optional location
//!   fields (those lists must render for every location)
//!
//! Templates themselves are parsed during deserialization, so an unknown
//! placeholder surfaces as a TOML error pointing at the offending file.

use crate::slug::{is_valid_slug, slugify};
use crate::template::Template;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid {kind} slug {slug:?}")]
    InvalidSlug { kind: &'static str, slug: String },
    #[error("Duplicate {kind} slug {slug:?}")]
    DuplicateSlug { kind: &'static str, slug: String },
    #[error("{kind} {slug:?} has a blank {field}")]
    BlankField {
        kind: &'static str,
        slug: String,
        field: &'static str,
    },
    #[error("Service {service:?} defines {count} pricing tiers, expected 3")]
    PricingTiers { service: String, count: usize },
    #[error("{owner:?}: {field} template {template:?} uses optional location fields")]
    OptionalPlaceholder {
        owner: String,
        field: &'static str,
        template: String,
    },
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Service {
    pub slug: String,
    pub name: String,
    pub short_description: String,
    pub category: String,
    /// Base keywords for the metadata keyword list.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub seo: Option<SeoTemplateSet>,
}

/// Per-service SEO copy. Every list may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeoTemplateSet {
    /// Candidate hero copy, in preference order.
    pub hero: Vec<HeroVariation>,
    pub benefits: Vec<BenefitStat>,
    pub deliverables: Vec<String>,
    pub process: Vec<ProcessStep>,
    pub faq: Vec<FaqTemplate>,
    pub pricing: Vec<PricingTier>,
    pub local_benefits: Option<LocalBenefitsGenerator>,
    pub trust_signals: Vec<String>,
    pub related_searches: Vec<Template>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeroVariation {
    pub title: Template,
    pub subtitle: Template,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenefitStat {
    pub stat: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessStep {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaqTemplate {
    pub question: Template,
    pub answer: Template,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PricingTier {
    pub name: String,
    /// Display price, e.g. `"desde 490€"`.
    pub price: String,
    /// Numeric lower bound in EUR, used for structured data offers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub highlighted: bool,
}

/// Generator for location-specific benefit bullets.
///
/// `base` fragments apply everywhere; `characteristics` and `industries` are
/// keyed by the tags a location carries and are appended in tag order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalBenefitsGenerator {
    pub base: Vec<Template>,
    pub characteristics: BTreeMap<String, Vec<Template>>,
    pub industries: BTreeMap<String, Vec<Template>>,
}

/// Settlement size/role, used to pick the intro's opening clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Capital,
    MajorCity,
    #[default]
    City,
    Town,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Location {
    /// Derived from `name` when omitted in the data file.
    #[serde(default)]
    pub slug: String,
    pub name: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metro_population: Option<u64>,
    #[serde(rename = "type", default)]
    pub kind: LocationKind,
    /// Sentence fragment about the local economy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_context: Option<String>,
    /// Characteristic tags, e.g. `turismo`.
    #[serde(default)]
    pub characteristics: Vec<String>,
    /// Industry tags present in the local economy.
    #[serde(default)]
    pub industries: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Industry {
    pub slug: String,
    pub title: String,
    pub tagline: String,
    pub description: String,
    #[serde(default)]
    pub stats: Vec<BenefitStat>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub solutions: Vec<String>,
    /// Slugs of services that apply to this industry.
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub clients: Vec<String>,
    #[serde(default)]
    pub faq: Vec<FaqTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseStudy {
    pub slug: String,
    pub title: String,
    pub client: String,
    /// Industry slug.
    pub industry: String,
    /// Service slugs this case study demonstrates.
    #[serde(default)]
    pub services: Vec<String>,
}

/// The read-only view of a case study used for cross-links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseStudySummary {
    pub slug: String,
    pub title: String,
    pub client: String,
    pub industry: String,
}

impl From<&CaseStudy> for CaseStudySummary {
    fn from(c: &CaseStudy) -> Self {
        Self {
            slug: c.slug.clone(),
            title: c.title.clone(),
            client: c.client.clone(),
            industry: c.industry.clone(),
        }
    }
}

// ============================================================================
// Case study repository
// ============================================================================

/// Source of case study summaries, in declared order.
pub trait CaseStudyRepository: Send + Sync {
    fn cases_by_service(&self, service_slug: &str) -> Vec<CaseStudySummary>;
    fn cases_by_industry(&self, industry_slug: &str) -> Vec<CaseStudySummary>;
}

/// Case studies held in memory, loaded from `cases/*.toml`.
#[derive(Debug, Clone, Default)]
pub struct CaseLibrary {
    cases: Vec<CaseStudy>,
}

impl CaseLibrary {
    pub fn new(cases: Vec<CaseStudy>) -> Self {
        Self { cases }
    }

    /// Load every `*.toml` under `dir`, sorted by path.
    ///
    /// A missing directory is an empty library.
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        if !dir.is_dir() {
            return Ok(Self::default());
        }
        let mut paths: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "toml"))
            .collect();
        paths.sort();

        let mut cases = Vec::with_capacity(paths.len());
        for path in paths {
            let case: CaseStudy = read_toml(&path)?;
            cases.push(case);
        }
        Ok(Self { cases })
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl CaseStudyRepository for CaseLibrary {
    fn cases_by_service(&self, service_slug: &str) -> Vec<CaseStudySummary> {
        self.cases
            .iter()
            .filter(|c| c.services.iter().any(|s| s == service_slug))
            .map(CaseStudySummary::from)
            .collect()
    }

    fn cases_by_industry(&self, industry_slug: &str) -> Vec<CaseStudySummary> {
        self.cases
            .iter()
            .filter(|c| c.industry == industry_slug)
            .map(CaseStudySummary::from)
            .collect()
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ServicesFile {
    #[serde(default)]
    service: Vec<Service>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LocationsFile {
    #[serde(default)]
    location: Vec<Location>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct IndustriesFile {
    #[serde(default)]
    industry: Vec<Industry>,
}

/// Immutable, slug-indexed tables for one build.
pub struct Catalog {
    services: Vec<Service>,
    locations: Vec<Location>,
    industries: Vec<Industry>,
    service_index: HashMap<String, usize>,
    location_index: HashMap<String, usize>,
    industry_index: HashMap<String, usize>,
    cases: Arc<dyn CaseStudyRepository>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("services", &self.services.len())
            .field("locations", &self.locations.len())
            .field("industries", &self.industries.len())
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// Build a catalog from records, validating and indexing them.
    ///
    /// Locations without a slug get one derived from their name.
    pub fn new(
        services: Vec<Service>,
        mut locations: Vec<Location>,
        industries: Vec<Industry>,
    ) -> Result<Self, CatalogError> {
        for loc in &mut locations {
            if loc.slug.is_empty() {
                loc.slug = slugify(&loc.name);
            }
        }

        for service in &services {
            require_text("service", &service.slug, "name", &service.name)?;
            validate_service(service)?;
        }
        for loc in &locations {
            require_text("location", &loc.slug, "name", &loc.name)?;
            require_text("location", &loc.slug, "region", &loc.region)?;
        }
        for industry in &industries {
            require_text("industry", &industry.slug, "title", &industry.title)?;
            validate_faq(&industry.slug, &industry.faq)?;
        }

        let service_index = index_by_slug("service", services.iter().map(|s| &s.slug))?;
        let location_index = index_by_slug("location", locations.iter().map(|l| &l.slug))?;
        let industry_index = index_by_slug("industry", industries.iter().map(|i| &i.slug))?;

        Ok(Self {
            services,
            locations,
            industries,
            service_index,
            location_index,
            industry_index,
            cases: Arc::new(CaseLibrary::default()),
        })
    }

    /// Replace the case study source.
    pub fn with_cases(mut self, cases: impl CaseStudyRepository + 'static) -> Self {
        self.cases = Arc::new(cases);
        self
    }

    /// Load the catalog from a content directory.
    ///
    /// `services.toml` and `locations.toml` are required; `industries.toml`
    /// and `cases/` are optional.
    pub fn load(root: &Path) -> Result<Self, CatalogError> {
        let services: ServicesFile = read_toml(&root.join("services.toml"))?;
        let locations: LocationsFile = read_toml(&root.join("locations.toml"))?;
        let industries_path = root.join("industries.toml");
        let industries = if industries_path.exists() {
            read_toml::<IndustriesFile>(&industries_path)?.industry
        } else {
            Vec::new()
        };
        let cases = CaseLibrary::load(&root.join("cases"))?;

        tracing::debug!(
            services = services.service.len(),
            locations = locations.location.len(),
            industries = industries.len(),
            cases = cases.len(),
            "catalog loaded"
        );

        Ok(Self::new(services.service, locations.location, industries)?.with_cases(cases))
    }

    pub fn service(&self, slug: &str) -> Option<&Service> {
        self.service_index.get(slug).map(|&i| &self.services[i])
    }

    pub fn location(&self, slug: &str) -> Option<&Location> {
        self.location_index.get(slug).map(|&i| &self.locations[i])
    }

    pub fn industry(&self, slug: &str) -> Option<&Industry> {
        self.industry_index.get(slug).map(|&i| &self.industries[i])
    }

    /// All services in declared order.
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// All locations in declared order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// All industries in declared order.
    pub fn industries(&self) -> &[Industry] {
        &self.industries
    }

    pub fn cases_by_service(&self, service_slug: &str) -> Vec<CaseStudySummary> {
        self.cases.cases_by_service(service_slug)
    }

    pub fn cases_by_industry(&self, industry_slug: &str) -> Vec<CaseStudySummary> {
        self.cases.cases_by_industry(industry_slug)
    }
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| CatalogError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn index_by_slug<'a>(
    kind: &'static str,
    slugs: impl Iterator<Item = &'a String>,
) -> Result<HashMap<String, usize>, CatalogError> {
    let mut index = HashMap::new();
    for (i, slug) in slugs.enumerate() {
        if !is_valid_slug(slug) {
            return Err(CatalogError::InvalidSlug {
                kind,
                slug: slug.clone(),
            });
        }
        if index.insert(slug.clone(), i).is_some() {
            return Err(CatalogError::DuplicateSlug {
                kind,
                slug: slug.clone(),
            });
        }
    }
    Ok(index)
}

fn require_text(
    kind: &'static str,
    slug: &str,
    field: &'static str,
    value: &str,
) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::BlankField {
            kind,
            slug: slug.to_string(),
            field,
        });
    }
    Ok(())
}

fn validate_service(service: &Service) -> Result<(), CatalogError> {
    let Some(seo) = &service.seo else {
        return Ok(());
    };
    if !seo.pricing.is_empty() && seo.pricing.len() != 3 {
        return Err(CatalogError::PricingTiers {
            service: service.slug.clone(),
            count: seo.pricing.len(),
        });
    }
    validate_faq(&service.slug, &seo.faq)?;
    if let Some(t) = seo.related_searches.iter().find(|t| !t.uses_only_required()) {
        return Err(CatalogError::OptionalPlaceholder {
            owner: service.slug.clone(),
            field: "related_searches",
            template: t.source().to_string(),
        });
    }
    Ok(())
}

fn validate_faq(owner: &str, faq: &[FaqTemplate]) -> Result<(), CatalogError> {
    for entry in faq {
        for t in [&entry.question, &entry.answer] {
            if !t.uses_only_required() {
                return Err(CatalogError::OptionalPlaceholder {
                    owner: owner.to_string(),
                    field: "faq",
                    template: t.source().to_string(),
                });
            }
        }
    }
    Ok(())
}
