//! # localpages
//!
//! A build-time generator for programmatic landing pages. Every service in
//! the catalog is paired with every location (and every industry with every
//! location), and each pair becomes a static page with localized copy,
//! metadata and schema.org structured data.
//!
//! # Architecture: Catalog → Bundle → Site
//!
//! ```text
//! 1. Load      content/*.toml  →  Catalog + SiteConfig   (validated, slug-indexed)
//! 2. Render    PageKey         →  PageBundle             (metadata, content, JSON-LD)
//! 3. Build     all bundles     →  dist/                  (HTML + sitemap.xml)
//! ```
//!
//! Rendering is a pure function of the catalog, the config and the page key.
//! Nothing is cached between pages, so rendering the same key twice yields
//! byte-identical output and pages can be rendered in parallel.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Service, location, industry and case study records; loading and validation |
//! | [`template`] | `{placeholder}` templates and the [`template::LocationContext`] they render against |
//! | [`variation`] | Hero variation selection, generic fallback copy, local benefit bullets |
//! | [`compose`] | Assembles the content model of one page |
//! | [`metadata`] | Title, description, keywords and social preview |
//! | [`schema`] | schema.org `@graph` for a page |
//! | [`page`] | The render contract: page key in, bundle out |
//! | [`paths`] | Page keys and URLs for every page the site contains |
//! | [`site`] | Full-site build and content checks |
//! | [`config`] | `config.toml` loading, defaults and validation |
//! | [`slug`] | Slug derivation and validation |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | Diagnostic logging setup |
//!
//! # Design Decisions
//!
//! ## Templates Are Parsed at Load Time
//!
//! Template strings are parsed into segments when the catalog is
//! deserialized. An unknown placeholder or an unbalanced brace is a load
//! error, not a page that silently ships with `{regoin}` in its title. What
//! can still fail at render time is an optional slot (population, business
//! context) that a location doesn't provide; hero copy then falls back to
//! the generic variant and local benefit fragments are dropped.
//!
//! ## Deterministic Variation
//!
//! Hero selection defaults to the first variation. The `hashed` strategy
//! picks by a SHA-256 of `service/location`, which spreads copy across pages
//! while staying stable between builds and machines.
//!
//! ## Maud for HTML
//!
//! Pages are rendered with [Maud](https://maud.lambda.xyz/): interpolation
//! is escaped by default and the markup is checked at compile time. The JSON-LD
//! block is the only pre-escaped insert, with `</` neutralized.

pub mod catalog;
pub mod compose;
pub mod config;
pub mod logging;
pub mod metadata;
pub mod output;
pub mod page;
pub mod paths;
pub mod schema;
pub mod site;
pub mod slug;
pub mod template;
pub mod variation;

#[cfg(test)]
pub(crate) mod test_helpers;
