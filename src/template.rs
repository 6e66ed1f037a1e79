//! Text templates with `{placeholder}` slots.
//!
//! Every piece of per-location copy in the catalog is a template: a plain
//! string in which `{name}`, `{region}` and friends are replaced by values
//! from a [`LocationContext`]. Templates are parsed once at catalog load, so
//! a malformed template is a load error rather than a surprise on page 312
//! of the build.
//!
//! ## Placeholders
//!
//! | Slot | Value | Always present |
//! |------|-------|----------------|
//! | `{name}` | location name | yes |
//! | `{region}` | location region | yes |
//! | `{service}` | service name (or industry title) | yes |
//! | `{population}` | formatted population (`65k`, `1.2M`) | no |
//! | `{metro_population}` | formatted metro population | no |
//! | `{business_context}` | business context sentence fragment | no |
//!
//! `{{` and `}}` produce literal braces.
//!
//! Rendering a template whose optional slot has no value fails with
//! [`TemplateError::MissingValue`]. Callers decide what that means: the hero
//! selector falls back to the generic copy, local benefits drop the fragment.

use crate::catalog::Location;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("unbalanced brace at byte {position} in template {template:?}")]
    UnbalancedBrace { template: String, position: usize },
    #[error("unknown placeholder {{{placeholder}}} in template {template:?}")]
    UnknownPlaceholder {
        template: String,
        placeholder: String,
    },
    #[error("no value for {{{0}}}")]
    MissingValue(Placeholder),
}

/// A named slot inside a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Name,
    Region,
    Service,
    Population,
    MetroPopulation,
    BusinessContext,
}

impl Placeholder {
    fn parse(ident: &str) -> Option<Self> {
        match ident {
            "name" => Some(Self::Name),
            "region" => Some(Self::Region),
            "service" => Some(Self::Service),
            "population" => Some(Self::Population),
            "metro_population" => Some(Self::MetroPopulation),
            "business_context" => Some(Self::BusinessContext),
            _ => None,
        }
    }

    /// Whether every location can fill this slot.
    pub fn is_required(self) -> bool {
        matches!(self, Self::Name | Self::Region | Self::Service)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Region => "region",
            Self::Service => "service",
            Self::Population => "population",
            Self::MetroPopulation => "metro_population",
            Self::BusinessContext => "business_context",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Slot(Placeholder),
}

/// A parsed text template.
///
/// Deserializes from a plain string; parsing errors surface as serde errors
/// during catalog load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.peek().map(|(_, n)| *n) == Some('{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek().map(|(_, n)| *n) == Some('}') => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    let mut ident = String::new();
                    let mut closed = false;
                    for (_, n) in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        ident.push(n);
                    }
                    if !closed {
                        return Err(TemplateError::UnbalancedBrace {
                            template: source.to_string(),
                            position: pos,
                        });
                    }
                    let placeholder = Placeholder::parse(ident.trim()).ok_or_else(|| {
                        TemplateError::UnknownPlaceholder {
                            template: source.to_string(),
                            placeholder: ident.clone(),
                        }
                    })?;
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Slot(placeholder));
                }
                '}' => {
                    return Err(TemplateError::UnbalancedBrace {
                        template: source.to_string(),
                        position: pos,
                    });
                }
                _ => text.push(c),
            }
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The template text as written in the catalog.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(p) => Some(*p),
            Segment::Text(_) => None,
        })
    }

    /// True if the template only uses slots every location can fill.
    pub fn uses_only_required(&self) -> bool {
        self.placeholders().all(Placeholder::is_required)
    }

    pub fn mentions(&self, placeholder: Placeholder) -> bool {
        self.placeholders().any(|p| p == placeholder)
    }

    pub fn render(&self, ctx: &LocationContext<'_>) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len() + 32);
        for segment in &self.segments {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Slot(p) => {
                    let value = ctx.value(*p).ok_or(TemplateError::MissingValue(*p))?;
                    out.push_str(&value);
                }
            }
        }
        Ok(out)
    }
}

impl TryFrom<String> for Template {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Template::parse(&value)
    }
}

impl From<Template> for String {
    fn from(value: Template) -> Self {
        value.source
    }
}

/// Everything a template may interpolate about one location.
///
/// Optional location fields stay optional here; a template that needs a
/// missing one fails to render instead of printing an empty gap.
#[derive(Debug, Clone, Copy)]
pub struct LocationContext<'a> {
    pub name: &'a str,
    pub region: &'a str,
    /// Service name for service pages, industry title for industry pages.
    pub service: &'a str,
    pub population: Option<u64>,
    pub metro_population: Option<u64>,
    pub business_context: Option<&'a str>,
    pub characteristics: &'a [String],
    pub industries: &'a [String],
}

impl<'a> LocationContext<'a> {
    pub fn new(subject: &'a str, location: &'a Location) -> Self {
        Self {
            name: &location.name,
            region: &location.region,
            service: subject,
            population: location.population,
            metro_population: location.metro_population,
            business_context: location
                .business_context
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty()),
            characteristics: &location.characteristics,
            industries: &location.industries,
        }
    }

    fn value(&self, placeholder: Placeholder) -> Option<String> {
        match placeholder {
            Placeholder::Name => Some(self.name.to_string()),
            Placeholder::Region => Some(self.region.to_string()),
            Placeholder::Service => Some(self.service.to_string()),
            Placeholder::Population => self.population.map(format_population),
            Placeholder::MetroPopulation => self.metro_population.map(format_population),
            Placeholder::BusinessContext => self.business_context.map(str::to_string),
        }
    }
}

/// Format a head count for display.
///
/// - `>= 1_000_000` → one decimal with `M` (`1_450_000` → `1.4M`)
/// - `>= 1_000` → nearest thousand with `k` (`64_560` → `65k`), promoted to
///   `M` when the rounding reaches a thousand thousands (`999_600` → `1.0M`)
/// - otherwise the plain number
pub fn format_population(n: u64) -> String {
    let thousands = (n + 500) / 1_000;
    if n >= 1_000_000 || thousands >= 1_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{thousands}k")
    } else {
        n.to_string()
    }
}
