//! Namespace and prefix management for catalog queries
//!
//! Every query the catalog sends starts with the same `PREFIX` prologue, and
//! identifiers arriving from outside are expanded against the ontology
//! namespace here.

use crate::sparql::escape::is_local_name;
use oxrdf::NamedNode;
use std::collections::BTreeMap;
use thiserror::Error;

/// `rdfs:` namespace
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// `xsd:` namespace
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// Prefix errors
#[derive(Error, Debug)]
pub enum PrefixError {
    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// Not usable as the local part of an IRI
    #[error("Invalid local name: {0:?}")]
    InvalidLocalName(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

/// Namespace manager seeded with the ontology and `rdfs`/`xsd` prefixes
#[derive(Debug, Clone)]
pub struct NamespaceManager {
    /// Prefix → IRI mappings, ordered so the prologue is stable
    prefixes: BTreeMap<String, String>,
}

impl NamespaceManager {
    /// Create a manager whose default prefix is `ontology`
    pub fn new(ontology: impl Into<String>) -> Self {
        let mut prefixes = BTreeMap::new();
        prefixes.insert(String::new(), ontology.into());
        prefixes.insert("rdfs".to_string(), RDFS.to_string());
        prefixes.insert("xsd".to_string(), XSD.to_string());

        Self { prefixes }
    }

    /// The default (`:`) namespace
    pub fn ontology(&self) -> &str {
        self.prefixes.get("").map(String::as_str).unwrap_or_default()
    }

    /// Turn an externally supplied local name into a checked ontology IRI
    pub fn resource(&self, local_name: &str) -> PrefixResult<NamedNode> {
        if !is_local_name(local_name) {
            return Err(PrefixError::InvalidLocalName(local_name.to_string()));
        }
        NamedNode::new(format!("{}{}", self.ontology(), local_name))
            .map_err(|e| PrefixError::InvalidIri(e.to_string()))
    }

    /// `PREFIX` declarations for the start of a query
    pub fn prologue(&self) -> String {
        self.prefixes
            .iter()
            .map(|(prefix, iri)| format!("PREFIX {}: <{}>\n", prefix, iri))
            .collect()
    }
}
