//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root next to the catalog tables; stock defaults are the base
//! layer and the user file overrides only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_name = "Agência Digital"   # Brand in titles, intro and structured data
//! base_url = "https://www.example.pt"  # No trailing slash
//! locale = "pt_PT"                # og:locale
//! services_path = "servicos"      # URL segment for service pages
//! industries_path = "setores"     # URL segment for industry pages
//!
//! [organization]
//! country = "PT"
//! # telephone = "+351 289 000 000"
//! # email = "ola@example.pt"
//! # street_address = "Rua de Santo António 1"
//! # locality = "Faro"
//! # postal_code = "8000-283"
//!
//! [links]
//! case_studies = 3                # Case studies per page
//! other_services = 4              # Other services at the same location
//! nearby_locations = 8            # Locations in the same region
//! other_regions = 6               # Locations outside the region
//!
//! [variation]
//! strategy = "first"              # "first" or "hashed"
//!
//! [metadata]
//! description_max_len = 160
//!
//! [processing]
//! max_processes = 4               # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::slug::is_valid_slug;
use crate::variation::SelectionStrategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Brand name used in titles, the intro closing sentence and the
    /// organization node.
    pub site_name: String,
    /// Absolute site origin, without trailing slash.
    pub base_url: String,
    /// Open Graph locale.
    pub locale: String,
    /// URL segment under which service pages live.
    pub services_path: String,
    /// URL segment under which industry pages live.
    pub industries_path: String,
    pub organization: OrganizationConfig,
    pub links: LinksConfig,
    pub variation: VariationConfig,
    pub metadata: MetadataConfig,
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "Agência Digital".to_string(),
            base_url: "https://www.example.pt".to_string(),
            locale: "pt_PT".to_string(),
            services_path: "servicos".to_string(),
            industries_path: "setores".to_string(),
            organization: OrganizationConfig::default(),
            links: LinksConfig::default(),
            variation: VariationConfig::default(),
            metadata: MetadataConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site_name must not be empty".into(),
            ));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ConfigError::Validation(
                "base_url must start with http:// or https://".into(),
            ));
        }
        if self.base_url.ends_with('/') {
            return Err(ConfigError::Validation(
                "base_url must not end with '/'".into(),
            ));
        }
        for (key, value) in [
            ("services_path", &self.services_path),
            ("industries_path", &self.industries_path),
        ] {
            if !is_valid_slug(value) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a lowercase slug, got {value:?}"
                )));
            }
        }
        if self.services_path == self.industries_path {
            return Err(ConfigError::Validation(
                "services_path and industries_path must differ".into(),
            ));
        }
        if self.metadata.description_max_len < 50 {
            return Err(ConfigError::Validation(
                "metadata.description_max_len must be at least 50".into(),
            ));
        }
        Ok(())
    }

    /// Absolute URL for a site-relative path (`"/servicos/"`).
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Business identity used in the organization node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrganizationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            telephone: None,
            email: None,
            street_address: None,
            locality: None,
            postal_code: None,
            country: "PT".to_string(),
        }
    }
}

/// Caps on each cross-link set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksConfig {
    pub case_studies: usize,
    pub other_services: usize,
    pub nearby_locations: usize,
    pub other_regions: usize,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            case_studies: 3,
            other_services: 4,
            nearby_locations: 8,
            other_regions: 6,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VariationConfig {
    pub strategy: SelectionStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataConfig {
    /// Meta descriptions longer than this are cut at a word boundary.
    pub description_max_len: usize,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            description_max_len: 160,
        }
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load config from `config.toml` in the content root.
///
/// A missing file yields the stock defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join("config.toml");
    let merged = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        let overlay: toml::Value = toml::from_str(&content)?;
        merge_toml(stock_defaults_value(), overlay)
    } else {
        stock_defaults_value()
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# localpages configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Brand name: used in page titles, the intro's closing sentence and the
# organization node of the structured data.
site_name = "Agência Digital"

# Absolute site origin, used for canonical URLs and the sitemap.
# Must start with http:// or https:// and have no trailing slash.
base_url = "https://www.example.pt"

# Open Graph locale.
locale = "pt_PT"

# URL segments: pages are written to /<services_path>/<service>/<location>/
# and /<industries_path>/<industry>/<location>/.
services_path = "servicos"
industries_path = "setores"

# ---------------------------------------------------------------------------
# Organization (structured data). Absent fields are omitted from the output.
# ---------------------------------------------------------------------------
[organization]
country = "PT"
# telephone = "+351 289 000 000"
# email = "ola@example.pt"
# street_address = "Rua de Santo António 1"
# locality = "Faro"
# postal_code = "8000-283"

# ---------------------------------------------------------------------------
# Cross-link caps per page
# ---------------------------------------------------------------------------
[links]
case_studies = 3
other_services = 4
nearby_locations = 8
other_regions = 6

# ---------------------------------------------------------------------------
# Hero variation selection
# ---------------------------------------------------------------------------
[variation]
# "first"  - always the first hero variation of a service
# "hashed" - stable pick from sha256(service/location)
strategy = "first"

# ---------------------------------------------------------------------------
# Metadata
# ---------------------------------------------------------------------------
[metadata]
# Meta descriptions are cut at a word boundary beyond this length.
description_max_len = 160

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
