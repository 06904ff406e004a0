//! RDF vocabulary helpers for the kopiverse ontology
//!
//! # Example
//!
//! ```rust
//! use kopiverse::rdf::NamespaceManager;
//!
//! let ns = NamespaceManager::new("http://kopiverse.org/ontology#");
//! let lot = ns.resource("GayoWineLot").unwrap();
//! assert_eq!(lot.as_str(), "http://kopiverse.org/ontology#GayoWineLot");
//! assert!(ns.resource("bad id").is_err());
//! ```

mod namespace;

pub use namespace::{NamespaceManager, PrefixError, PrefixResult, RDFS, XSD};
