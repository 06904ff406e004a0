//! HTTP client for a SPARQL query endpoint

use super::results::{parse_json_results, BindingRow};
use super::{SparqlError, SparqlResult};
use crate::config::CatalogConfig;
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, warn};

/// Media type of SPARQL 1.1 query results in JSON
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Anything that can answer a SPARQL SELECT query with binding rows.
///
/// Implemented by:
/// - `SparqlClient`: a remote endpoint over HTTP
/// - scripted sources in tests
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Execute a SELECT query
    async fn select(&self, query: &str) -> SparqlResult<Vec<BindingRow>>;

    /// Execute a SELECT query, absorbing any failure into an empty row set.
    ///
    /// This is the failure policy every catalog round-trip uses: the error is
    /// logged and the caller carries on with no rows.
    async fn select_or_empty(&self, query: &str) -> Vec<BindingRow> {
        match self.select(query).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "graph query failed, continuing with no rows");
                Vec::new()
            }
        }
    }
}

/// Client for a remote SPARQL endpoint (e.g. Fuseki's `/query` service)
pub struct SparqlClient {
    client: Client,
    endpoint: String,
}

impl SparqlClient {
    /// Create a client for the endpoint named in `config`
    pub fn new(config: &CatalogConfig) -> SparqlResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SparqlError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// The endpoint URL queries are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GraphSource for SparqlClient {
    async fn select(&self, query: &str) -> SparqlResult<Vec<BindingRow>> {
        debug!(endpoint = %self.endpoint, query, "submitting SPARQL query");

        let body = format!("query={}", utf8_percent_encode(query, NON_ALPHANUMERIC));
        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, mime::APPLICATION_WWW_FORM_URLENCODED.as_ref())
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .body(body)
            .send()
            .await
            .map_err(|e| SparqlError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SparqlError::Status(resp.status().as_u16()));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| SparqlError::Network(e.to_string()))?;
        let rows = parse_json_results(&bytes)?;

        debug!(rows = rows.len(), "SPARQL query returned");
        Ok(rows)
    }
}
