//! Variation selection: turning a service's candidate templates into copy.
//!
//! A service may list several hero variations. Which one a page uses is
//! decided by a [`SelectionStrategy`]:
//!
//! - `First` (default) always takes the first candidate. Per-location
//!   differences come entirely from interpolation inside that template.
//! - `Hashed` picks `sha256("{service}/{location}") mod candidates`, which
//!   spreads phrasing across locations while staying stable across builds.
//!
//! Whatever the strategy, a page always gets a hero. When a service has no
//! template set, no candidates, or the chosen candidate cannot render for
//! this location (it needs a population the location doesn't have), the
//! generic hero built only from the service name, location name and region
//! is used instead.

use crate::catalog::{LocalBenefitsGenerator, Location, Service};
use crate::template::{LocationContext, Template};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// How a hero candidate is chosen for a (service, location) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    #[default]
    First,
    Hashed,
}

impl SelectionStrategy {
    /// Index of the candidate to use, or `None` when there are none.
    pub fn pick(self, count: usize, service_slug: &str, location_slug: &str) -> Option<usize> {
        if count == 0 {
            return None;
        }
        match self {
            Self::First => Some(0),
            Self::Hashed => {
                let digest = Sha256::digest(format!("{service_slug}/{location_slug}").as_bytes());
                let mut head = [0u8; 8];
                head.copy_from_slice(&digest[..8]);
                Some((u64::from_be_bytes(head) % count as u64) as usize)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
}

/// Hero copy that renders for any location, even one with no optional fields.
pub fn generic_hero(ctx: &LocationContext<'_>) -> Hero {
    Hero {
        title: format!("{} em {}", ctx.service, ctx.name),
        subtitle: format!(
            "{} profissional para empresas em {}, {}.",
            ctx.service, ctx.name, ctx.region
        ),
    }
}

pub fn select_hero(service: &Service, location: &Location, strategy: SelectionStrategy) -> Hero {
    let ctx = LocationContext::new(&service.name, location);
    let candidates = service
        .seo
        .as_ref()
        .map(|seo| seo.hero.as_slice())
        .unwrap_or_default();

    let Some(idx) = strategy.pick(candidates.len(), &service.slug, &location.slug) else {
        tracing::debug!(
            service = %service.slug,
            location = %location.slug,
            "no hero variations, using generic hero"
        );
        return generic_hero(&ctx);
    };

    let variation = &candidates[idx];
    match (variation.title.render(&ctx), variation.subtitle.render(&ctx)) {
        (Ok(title), Ok(subtitle)) if !title.trim().is_empty() && !subtitle.trim().is_empty() => {
            Hero { title, subtitle }
        }
        (title, subtitle) => {
            let reason = title
                .err()
                .or(subtitle.err())
                .map(|e| e.to_string())
                .unwrap_or_else(|| "rendered empty".to_string());
            tracing::warn!(
                service = %service.slug,
                location = %location.slug,
                variation = idx,
                %reason,
                "hero variation failed, using generic hero"
            );
            generic_hero(&ctx)
        }
    }
}

/// Location-specific benefit bullets.
///
/// Base fragments come first, then fragments for each of the location's
/// characteristic tags, then each industry tag, all in the location's tag
/// order. Fragments that cannot render for this location are dropped.
/// No generator means no bullets.
pub fn local_benefits(
    generator: Option<&LocalBenefitsGenerator>,
    ctx: &LocationContext<'_>,
) -> Vec<String> {
    let Some(generator) = generator else {
        return Vec::new();
    };

    let tagged = |map: &BTreeMap<String, Vec<Template>>, tags: &[String]| {
        tags.iter()
            .filter_map(|tag| map.get(tag))
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
    };

    let templates = generator
        .base
        .iter()
        .cloned()
        .chain(tagged(&generator.characteristics, ctx.characteristics))
        .chain(tagged(&generator.industries, ctx.industries));

    let mut out: Vec<String> = Vec::new();
    for template in templates {
        match template.render(ctx) {
            Ok(text) if !text.trim().is_empty() => {
                if !out.contains(&text) {
                    out.push(text);
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(location = ctx.name, error = %e, "local benefit dropped");
            }
        }
    }
    out
}
