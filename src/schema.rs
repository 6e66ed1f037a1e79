//! schema.org structured data for generated pages.
//!
//! Each page carries one JSON-LD document:
//!
//! ```json
//! { "@context": "https://schema.org", "@graph": [ ...nodes ] }
//! ```
//!
//! Node order is fixed: breadcrumb trail, organization, service, and then the
//! FAQ page only when the FAQ has entries. Optional sources map to omitted
//! JSON, never to `null` or empty values: no pricing means no `offers`, no
//! configured telephone means no `telephone`, no FAQ means no FAQ node.
//!
//! The graph is derived from the composed page model and metadata; nothing
//! here reads templates or the raw catalog except the service category.

use crate::catalog::{PricingTier, Service};
use crate::compose::{FaqEntry, IndustryPageModel, PageContentModel};
use crate::config::SiteConfig;
use crate::metadata::PageMetadata;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredDataGraph {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@graph")]
    pub graph: Vec<GraphNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "@type")]
pub enum GraphNode {
    BreadcrumbList(BreadcrumbList),
    LocalBusiness(Organization),
    Service(ServiceNode),
    #[serde(rename = "FAQPage")]
    FaqPage(FaqPage),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbList {
    #[serde(rename = "@id")]
    pub id: String,
    pub item_list_element: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub position: u32,
    pub name: String,
    pub item: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Organization {
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<PostalAddress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub address_country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceNode {
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub url: String,
    pub provider: NodeRef,
    pub area_served: City,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRef {
    #[serde(rename = "@id")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub contained_in_place: AdministrativeArea,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdministrativeArea {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_currency: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPage {
    pub main_entity: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub name: String,
    pub accepted_answer: Answer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    #[serde(rename = "@type")]
    pub kind: &'static str,
    pub text: String,
}

impl StructuredDataGraph {
    fn new(graph: Vec<GraphNode>) -> Self {
        Self {
            context: "https://schema.org",
            graph,
        }
    }

    /// JSON safe to embed inside a `<script>` element.
    pub fn to_script_json(&self) -> Result<String, serde_json::Error> {
        Ok(serde_json::to_string(self)?.replace("</", "<\\/"))
    }

    pub fn has_faq(&self) -> bool {
        self.graph.iter().any(|n| matches!(n, GraphNode::FaqPage(_)))
    }
}

pub fn service_graph(
    page: &PageContentModel,
    service: &Service,
    metadata: &PageMetadata,
    config: &SiteConfig,
) -> StructuredDataGraph {
    let section_url = config.absolute_url(&format!("/{}/", config.services_path));
    let subject_url = config.absolute_url(&format!(
        "/{}/{}/",
        config.services_path, page.service_slug
    ));

    let mut graph = vec![
        breadcrumbs(
            config,
            metadata,
            [
                ("Serviços", section_url),
                (page.service_name.as_str(), subject_url),
            ],
            &page.location_name,
        ),
        GraphNode::LocalBusiness(organization(config)),
        GraphNode::Service(ServiceNode {
            id: format!("{}#service", metadata.canonical),
            name: format!("{} em {}", page.service_name, page.location_name),
            description: metadata.description.clone(),
            service_type: service.category.clone(),
            url: metadata.canonical.clone(),
            provider: organization_ref(config),
            area_served: city(&page.location_name, &page.region),
            offers: page.pricing.iter().map(offer).collect(),
        }),
    ];
    if let Some(faq) = faq_node(&page.faq) {
        graph.push(faq);
    }
    StructuredDataGraph::new(graph)
}

pub fn industry_graph(
    page: &IndustryPageModel,
    metadata: &PageMetadata,
    config: &SiteConfig,
) -> StructuredDataGraph {
    let section_url = config.absolute_url(&format!("/{}/", config.industries_path));
    let subject_url = config.absolute_url(&format!(
        "/{}/{}/",
        config.industries_path, page.industry_slug
    ));

    let mut graph = vec![
        breadcrumbs(
            config,
            metadata,
            [
                ("Setores", section_url),
                (page.industry_title.as_str(), subject_url),
            ],
            &page.location_name,
        ),
        GraphNode::LocalBusiness(organization(config)),
        GraphNode::Service(ServiceNode {
            id: format!("{}#service", metadata.canonical),
            name: format!("{} em {}", page.industry_title, page.location_name),
            description: metadata.description.clone(),
            service_type: page.industry_title.clone(),
            url: metadata.canonical.clone(),
            provider: organization_ref(config),
            area_served: city(&page.location_name, &page.region),
            offers: Vec::new(),
        }),
    ];
    if let Some(faq) = faq_node(&page.faq) {
        graph.push(faq);
    }
    StructuredDataGraph::new(graph)
}

/// Home → section → subject → location.
fn breadcrumbs(
    config: &SiteConfig,
    metadata: &PageMetadata,
    middle: [(&str, String); 2],
    location_name: &str,
) -> GraphNode {
    let home = ("Início", config.absolute_url("/"));
    let last = (location_name, metadata.canonical.clone());
    let item_list_element = std::iter::once(home)
        .chain(middle)
        .chain(std::iter::once(last))
        .zip(1..)
        .map(|((name, item), position)| ListItem {
            kind: "ListItem",
            position,
            name: name.to_string(),
            item,
        })
        .collect();
    GraphNode::BreadcrumbList(BreadcrumbList {
        id: format!("{}#breadcrumb", metadata.canonical),
        item_list_element,
    })
}

fn organization_ref(config: &SiteConfig) -> NodeRef {
    NodeRef {
        id: config.absolute_url("/#organization"),
    }
}

fn organization(config: &SiteConfig) -> Organization {
    let org = &config.organization;
    let has_address =
        org.street_address.is_some() || org.locality.is_some() || org.postal_code.is_some();
    let address = has_address.then(|| {
        PostalAddress {
            kind: "PostalAddress",
            street_address: org.street_address.clone(),
            address_locality: org.locality.clone(),
            postal_code: org.postal_code.clone(),
            address_country: org.country.clone(),
        }
    });
    Organization {
        id: organization_ref(config).id,
        name: config.site_name.clone(),
        url: config.absolute_url("/"),
        telephone: org.telephone.clone(),
        email: org.email.clone(),
        address,
    }
}

fn city(name: &str, region: &str) -> City {
    City {
        kind: "City",
        name: name.to_string(),
        contained_in_place: AdministrativeArea {
            kind: "AdministrativeArea",
            name: region.to_string(),
        },
    }
}

fn offer(tier: &PricingTier) -> Offer {
    Offer {
        kind: "Offer",
        name: tier.name.clone(),
        description: tier.price.clone(),
        price: tier.amount,
        price_currency: tier.amount.map(|_| "EUR"),
    }
}

fn faq_node(faq: &[FaqEntry]) -> Option<GraphNode> {
    if faq.is_empty() {
        return None;
    }
    Some(GraphNode::FaqPage(FaqPage {
        main_entity: faq
            .iter()
            .map(|e| Question {
                kind: "Question",
                name: e.question.clone(),
                accepted_answer: Answer {
                    kind: "Answer",
                    text: e.answer.clone(),
                },
            })
            .collect(),
    }))
}
