//! Catalog pages
//!
//! [`Catalog`] runs one request end to end: compose filters, fill the view's
//! template, query the store, project every row, and for the detail page
//! resolve similar items. Each page is sourced independently and every
//! round-trip failure degrades to missing data rather than an error.

mod options;
mod recommend;

pub use options::{list_options, FilterOptions};
pub use recommend::recommend;
pub use crate::projection::Recommendation;

use crate::config::{CatalogConfig, ConfigError};
use crate::projection::{format, project, DetailRecord, ProjectionError, ViewKind, ViewRecord};
use crate::query::{inventory_stats, FilterError, FilterSet, Template, DETAIL};
use crate::rdf::{NamespaceManager, PrefixError};
use crate::sparql::{GraphSource, SparqlClient, SparqlError};
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

/// Catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Detail lookup matched nothing
    #[error("Item not found: {0}")]
    NotFound(String),

    /// Identifier is not a plain ontology local name
    #[error("Invalid item identifier: {0}")]
    InvalidIdentifier(#[from] PrefixError),

    /// Role name not recognised
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// A row lacked a binding its template guarantees
    #[error("Malformed result row: {0}")]
    Projection(#[from] ProjectionError),

    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("SPARQL error: {0}")]
    Sparql(#[from] SparqlError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog audiences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Grower,
    Roaster,
    Barista,
}

impl Role {
    pub fn view(self) -> ViewKind {
        match self {
            Role::Grower => ViewKind::Grower,
            Role::Roaster => ViewKind::Roaster,
            Role::Barista => ViewKind::Barista,
        }
    }

    /// Page heading
    pub fn title(self) -> &'static str {
        match self {
            Role::Grower => "Grower Dashboard: Farm Showcase",
            Role::Roaster => "Roaster Dashboard: Sourcing & Profiling",
            Role::Barista => "Barista: Brewing Guide",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Grower => "grower",
            Role::Roaster => "roaster",
            Role::Barista => "barista",
        }
    }
}

impl FromStr for Role {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grower" | "petani" => Ok(Role::Grower),
            "roaster" => Ok(Role::Roaster),
            "barista" => Ok(Role::Barista),
            _ => Err(CatalogError::UnknownRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roaster KPIs over the whole inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryStats {
    /// Sum of stock × price
    pub total_asset: String,
    /// Sum of stock
    pub total_kg: String,
}

/// Everything the presentation layer needs for a role listing
#[derive(Debug, Clone, Serialize)]
pub struct RolePage {
    pub role: Role,
    pub title: String,
    pub records: Vec<ViewRecord>,
    /// Roaster page only, and only when the totals query succeeded
    pub stats: Option<InventoryStats>,
    /// Filters the page was built with
    pub filters: FilterSet,
    pub options: FilterOptions,
}

/// One item and its similar-item suggestions
#[derive(Debug, Clone, Serialize)]
pub struct DetailPage {
    pub item: DetailRecord,
    pub recommendations: Vec<Recommendation>,
}

/// Catalog over a graph source
pub struct Catalog<S = SparqlClient> {
    source: S,
    ns: NamespaceManager,
    recommendation_limit: usize,
}

impl Catalog<SparqlClient> {
    /// Catalog over the SPARQL endpoint named in `config`
    pub fn connect(config: CatalogConfig) -> CatalogResult<Self> {
        config.validate()?;
        let client = SparqlClient::new(&config)?;
        Ok(Self::with_source(client, &config))
    }
}

impl<S: GraphSource> Catalog<S> {
    /// Catalog over an arbitrary source
    pub fn with_source(source: S, config: &CatalogConfig) -> Self {
        Self {
            source,
            ns: NamespaceManager::new(config.namespace.clone()),
            recommendation_limit: config.recommendation_limit,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Listing page for `role`
    pub async fn role_page(&self, role: Role, filters: &FilterSet) -> CatalogResult<RolePage> {
        let options = self.filter_options().await;

        let view = role.view();
        let query = Template::for_view(view).render(&self.ns, filters);
        let rows = self.source.select_or_empty(&query).await;
        let records = rows
            .iter()
            .map(|row| project(row, view))
            .collect::<Result<Vec<_>, _>>()?;

        let stats = match role {
            Role::Roaster => self.inventory_stats().await,
            _ => None,
        };

        info!(role = %role, records = records.len(), "assembled role page");
        Ok(RolePage {
            role,
            title: role.title().to_string(),
            records,
            stats,
            filters: filters.clone(),
            options,
        })
    }

    /// Detail page for the item with local name `id`
    pub async fn detail_page(&self, id: &str) -> CatalogResult<DetailPage> {
        let subject = self.ns.resource(id)?;
        let rows = self
            .source
            .select_or_empty(&DETAIL.render_for(&self.ns, &subject))
            .await;

        let Some(first) = rows.first() else {
            return Err(CatalogError::NotFound(id.to_string()));
        };
        if rows.len() > 1 {
            warn!(id, rows = rows.len(), "detail lookup matched more than one row, using the first");
        }

        let item = match project(first, ViewKind::Detail)? {
            ViewRecord::Detail(item) => *item,
            other => {
                return Err(ProjectionError::MissingRequired {
                    view: other.kind(),
                    var: DETAIL.subject.to_string(),
                }
                .into())
            }
        };

        let recommendations = recommend(
            &self.source,
            &self.ns,
            &item.iri,
            item.origin_iri.as_deref(),
            self.recommendation_limit,
        )
        .await;

        info!(id, recommendations = recommendations.len(), "assembled detail page");
        Ok(DetailPage {
            item,
            recommendations,
        })
    }

    /// Origin and process labels for filter controls
    pub async fn filter_options(&self) -> FilterOptions {
        list_options(&self.source, &self.ns).await
    }

    /// Inventory totals, `None` when the query fails or returns nothing usable
    pub async fn inventory_stats(&self) -> Option<InventoryStats> {
        let rows = self.source.select_or_empty(&inventory_stats(&self.ns)).await;
        let row = rows.first()?;

        let total = format::parse_number(row.get("grandTotal"));
        let stock = format::parse_number(row.get("totalStock"));
        match (total, stock) {
            (Some(total), Some(stock)) => Some(InventoryStats {
                total_asset: format::rupiah(total),
                total_kg: format!("{} Kg", format::quantity(stock)),
            }),
            _ => {
                warn!("inventory totals missing or not numeric");
                None
            }
        }
    }
}
