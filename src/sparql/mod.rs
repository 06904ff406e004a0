//! SPARQL endpoint access
//!
//! This module talks to the remote graph store over the SPARQL 1.1 protocol
//! and turns `application/sparql-results+json` documents into [`BindingRow`]s.
//!
//! # Example
//!
//! ```rust,no_run
//! use kopiverse::sparql::{GraphSource, SparqlClient};
//! use kopiverse::CatalogConfig;
//!
//! # async fn run() -> kopiverse::SparqlResult<()> {
//! let client = SparqlClient::new(&CatalogConfig::default())?;
//!
//! let query = r#"
//!     PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
//!     SELECT ?label WHERE { ?s rdfs:label ?label }
//! "#;
//!
//! // Failures are logged and come back as an empty row set.
//! let rows = client.select_or_empty(query).await;
//! # Ok(())
//! # }
//! ```

mod client;
pub mod escape;
mod results;

pub use client::{GraphSource, SparqlClient, SPARQL_RESULTS_JSON};
pub use results::{parse_json_results, BindingRow};

use thiserror::Error;

/// SPARQL errors
#[derive(Error, Debug)]
pub enum SparqlError {
    /// Endpoint unreachable, timed out or dropped the connection
    #[error("Network error: {0}")]
    Network(String),

    /// Endpoint answered with a non-success status
    #[error("Endpoint returned HTTP {0}")]
    Status(u16),

    /// Response body is not a valid SPARQL results document
    #[error("Result parse error: {0}")]
    Parse(String),

    /// Response is a valid document of the wrong form (e.g. ASK for a SELECT)
    #[error("Unexpected result form: {0}")]
    UnexpectedForm(String),

    /// Client could not be built
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type SparqlResult<T> = Result<T, SparqlError>;
