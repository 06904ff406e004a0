//! Kopiverse catalog
//!
//! Reads coffee lots and brewed beverages out of a SPARQL graph store and
//! reshapes them into role-specific catalog pages.
//!
//! # Architecture
//!
//! - `sparql`: endpoint client, binding rows, literal escaping
//! - `rdf`: namespace prefixes for the kopiverse ontology
//! - `query`: filter composition and per-view query templates
//! - `projection`: binding row → fixed-shape view record
//! - `catalog`: request orchestration, recommendations, filter options
//! - `config`: endpoint and catalog settings
//!
//! Every page is sourced fresh from the graph store; nothing is cached.
//! Failed round-trips degrade to empty result sets so a page with partial
//! data is always produced instead of an error.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use kopiverse::{Catalog, CatalogConfig, FilterSet, Role};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::connect(CatalogConfig::default())?;
//!
//! let filters = FilterSet::builder().keyword("arabika").build()?;
//! let page = catalog.role_page(Role::Grower, &filters).await?;
//! println!("{} lots", page.records.len());
//!
//! let detail = catalog.detail_page("GayoWineLot").await?;
//! println!("{} similar items", detail.recommendations.len());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod projection;
pub mod query;
pub mod rdf;
pub mod sparql;

pub use catalog::{
    Catalog, CatalogError, CatalogResult, DetailPage, FilterOptions, InventoryStats,
    Recommendation, Role, RolePage,
};

pub use config::{CatalogConfig, ConfigError, ConfigResult};

pub use projection::{
    project, BaristaRecord, DetailRecord, GrowerRecord, ProjectionError, ProjectionResult,
    RoasterRecord, StockLevel, ViewKind, ViewRecord,
};

pub use query::{FilterError, FilterSet, FilterSetBuilder, Template};

pub use rdf::NamespaceManager;

pub use sparql::{BindingRow, GraphSource, SparqlClient, SparqlError, SparqlResult};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, env!("CARGO_PKG_VERSION"));
    }
}
