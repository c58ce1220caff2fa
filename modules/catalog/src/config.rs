//! Catalog module configuration.

use serde::{Deserialize, Serialize};

/// Paging and startup behavior for the catalog module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Page size used when the client does not pass `size`.
    pub default_page_size: u64,
    /// Upper bound for the `size` parameter; larger requests are clamped.
    pub max_page_size: u64,
    /// Seed a handful of demo books and categories at startup.
    pub seed_demo_data: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 50,
            seed_demo_data: true,
        }
    }
}
