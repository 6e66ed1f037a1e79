//! Fabricated catalogs for unit tests.
//!
//! `small_catalog()` is the workhorse: three services (two with a template
//! set, one without), five locations over three regions, one industry and
//! four case studies.
//!
//! ```text
//! services:   web-design (seo), seo (seo), branding (none)
//! locations:  faro, lagos, tavira   (Algarve)
//!             lisboa                (Lisboa)
//!             porto                 (Norte)
//! industries: hotelaria
//! ```

use crate::catalog::*;
use crate::config::SiteConfig;
use crate::template::Template;
use std::collections::BTreeMap;

fn t(s: &str) -> Template {
    Template::parse(s).unwrap()
}

/// A location with only the required fields set.
pub fn location(slug: &str, name: &str, region: &str) -> Location {
    Location {
        slug: slug.to_string(),
        name: name.to_string(),
        region: region.to_string(),
        population: None,
        metro_population: None,
        kind: LocationKind::City,
        business_context: None,
        characteristics: Vec::new(),
        industries: Vec::new(),
    }
}

/// A service with no SEO template set.
pub fn service(slug: &str, name: &str) -> Service {
    Service {
        slug: slug.to_string(),
        name: name.to_string(),
        short_description: format!("{name} para pequenas e médias empresas."),
        category: "digital".to_string(),
        keywords: vec![name.to_lowercase()],
        seo: None,
    }
}

/// A service with a fully populated template set.
pub fn seo_service(slug: &str, name: &str) -> Service {
    let mut characteristics = BTreeMap::new();
    characteristics.insert(
        "turismo".to_string(),
        vec![t("Sites multilíngues para os turistas que visitam {name}")],
    );
    let mut industries = BTreeMap::new();
    industries.insert(
        "hotelaria".to_string(),
        vec![t("Experiência com negócios de hotelaria em {name}")],
    );

    Service {
        seo: Some(SeoTemplateSet {
            hero: vec![
                HeroVariation {
                    title: t("{service} em {name}, {region}"),
                    subtitle: t("Projetos à medida para empresas de {name}."),
                },
                HeroVariation {
                    title: t("{service} para negócios de {name}"),
                    subtitle: t("Resultados medidos em todo o {region}."),
                },
            ],
            benefits: vec![BenefitStat {
                stat: "+40%".to_string(),
                label: "contactos".to_string(),
                description: None,
            }],
            deliverables: vec!["Site responsivo".to_string(), "Alojamento".to_string()],
            process: vec![ProcessStep {
                title: "Descoberta".to_string(),
                description: "Reunião inicial.".to_string(),
            }],
            faq: vec![
                FaqTemplate {
                    question: t("Quanto custa {service} em {name}?"),
                    answer: t("Depende do projeto; trabalhamos com empresas de todo o {region}."),
                },
                FaqTemplate {
                    question: t("Fazem reuniões presenciais em {name}?"),
                    answer: t("Sim."),
                },
            ],
            pricing: vec![
                tier("Essencial", "desde 490€", Some(490)),
                tier("Profissional", "desde 990€", Some(990)),
                tier("Empresarial", "sob consulta", None),
            ],
            local_benefits: Some(LocalBenefitsGenerator {
                base: vec![t("Atendimento presencial em {name} e em todo o {region}")],
                characteristics,
                industries,
            }),
            trust_signals: vec!["Google Partner".to_string()],
            related_searches: vec![t("{service} {name}"), t("empresa {service} {region}")],
        }),
        ..service(slug, name)
    }
}

fn tier(name: &str, price: &str, amount: Option<u32>) -> PricingTier {
    PricingTier {
        name: name.to_string(),
        price: price.to_string(),
        amount,
        features: vec!["Suporte".to_string()],
        highlighted: false,
    }
}

fn case(slug: &str, client: &str, industry: &str, services: &[&str]) -> CaseStudy {
    CaseStudy {
        slug: slug.to_string(),
        title: format!("Caso {client}"),
        client: client.to_string(),
        industry: industry.to_string(),
        services: services.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn hotelaria() -> Industry {
    Industry {
        slug: "hotelaria".to_string(),
        title: "Hotelaria".to_string(),
        tagline: "Mais reservas diretas".to_string(),
        description: "Soluções digitais para hotéis e alojamento local.".to_string(),
        stats: vec![BenefitStat {
            stat: "70%".to_string(),
            label: "reservas online".to_string(),
            description: None,
        }],
        challenges: vec!["Dependência de OTAs".to_string()],
        solutions: vec!["Motor de reservas próprio".to_string()],
        services: vec![
            "web-design".to_string(),
            "desconhecido".to_string(),
            "seo".to_string(),
        ],
        clients: vec!["Hotel Mar".to_string()],
        faq: vec![FaqTemplate {
            question: t("Trabalham com hotéis em {name}?"),
            answer: t("Sim, em todo o {region}."),
        }],
    }
}

pub fn small_catalog() -> Catalog {
    let mut faro = location("faro", "Faro", "Algarve");
    faro.population = Some(64_560);
    faro.kind = LocationKind::Capital;
    faro.business_context = Some("O aeroporto internacional liga a cidade à Europa".to_string());
    faro.characteristics = vec!["turismo".to_string()];
    faro.industries = vec!["hotelaria".to_string()];

    let mut lagos = location("lagos", "Lagos", "Algarve");
    lagos.kind = LocationKind::Town;

    let tavira = location("tavira", "Tavira", "Algarve");

    let mut lisboa = location("lisboa", "Lisboa", "Lisboa");
    lisboa.kind = LocationKind::Capital;
    lisboa.population = Some(545_000);
    lisboa.metro_population = Some(2_870_000);

    let mut porto = location("porto", "Porto", "Norte");
    porto.kind = LocationKind::MajorCity;
    porto.population = Some(232_000);

    Catalog::new(
        vec![
            seo_service("web-design", "Web Design"),
            seo_service("seo", "SEO"),
            service("branding", "Branding"),
        ],
        vec![faro, lagos, tavira, lisboa, porto],
        vec![hotelaria()],
    )
    .unwrap()
    .with_cases(CaseLibrary::new(vec![
        case("hotel-mar", "Hotel Mar", "hotelaria", &["web-design", "seo"]),
        case("clinica-sul", "Clínica Sul", "saude", &["web-design"]),
        case("cafe-ria", "Café Ria", "restauracao", &["web-design"]),
        case("loja-porto", "Loja Porto", "retalho", &["web-design"]),
    ]))
}

/// A catalog of `services × locations` plain records, spread over regions
/// of three locations each.
pub fn grid_catalog(services: usize, locations: usize) -> Catalog {
    let services = (0..services)
        .map(|i| {
            if i % 2 == 0 {
                seo_service(&format!("servico-{i}"), &format!("Serviço {i}"))
            } else {
                service(&format!("servico-{i}"), &format!("Serviço {i}"))
            }
        })
        .collect();
    let locations = (0..locations)
        .map(|i| {
            location(
                &format!("local-{i}"),
                &format!("Local {i}"),
                &format!("Região {}", i / 3),
            )
        })
        .collect();
    Catalog::new(services, locations, vec![]).unwrap()
}

pub fn config() -> SiteConfig {
    SiteConfig::default()
}
